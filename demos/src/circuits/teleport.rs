//! Quantum teleportation.
//!
//! Qubit roles: `msg` carries the state to send, `alice` and `bob` share a
//! Bell pair. After Alice's basis change, Bob's qubit holds the message up
//! to a Pauli correction selected by Alice's two measurement results.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use qalgo_hal::BlochVector;
use qalgo_ir::{Circuit, ClbitId, IrResult, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{DemoError, DemoResult};

/// Message qubit.
pub const MSG: QubitId = QubitId(0);
/// Alice's half of the Bell pair.
pub const ALICE: QubitId = QubitId(1);
/// Bob's half of the Bell pair, which receives the message.
pub const BOB: QubitId = QubitId(2);

/// Classical bit holding Bob's final measurement.
pub const BOB_CLBIT: usize = 2;

/// How Bob's qubit is corrected after Alice's basis change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    /// Measure Alice's qubits and apply `X`/`Z` conditioned on the results.
    #[default]
    Classical,
    /// Deferred measurement: `CX(alice, bob)` and `CZ(msg, bob)`.
    Coherent,
    /// No correction; Bob is left with a mixed state.
    None,
}

impl CorrectionMode {
    /// All modes, in display order.
    pub const ALL: [CorrectionMode; 3] = [Self::Classical, Self::Coherent, Self::None];

    /// Whether the circuit before Bob's measurement is unitary.
    pub fn is_unitary(self) -> bool {
        !matches!(self, Self::Classical)
    }

    /// Whether Bob's qubit ends up holding the message.
    pub fn corrects(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for CorrectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classical => "classical",
            Self::Coherent => "coherent",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for CorrectionMode {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classical" => Ok(Self::Classical),
            "coherent" | "deferred" => Ok(Self::Coherent),
            "none" | "off" => Ok(Self::None),
            other => Err(DemoError::InvalidInput(format!(
                "unknown correction mode '{other}' (expected classical, coherent or none)"
            ))),
        }
    }
}

/// Basis in which Bob's qubit is read out.
///
/// A missing `X` correction shows up in the `Z` basis, a missing `Z`
/// correction only in the `X` basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureBasis {
    /// Computational basis.
    #[default]
    Z,
    /// Hadamard basis: |+⟩ reads 0, |−⟩ reads 1.
    X,
}

impl fmt::Display for MeasureBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Z => f.write_str("Z"),
            Self::X => f.write_str("X"),
        }
    }
}

/// The state `cos(θ/2)|0⟩ + e^{iφ} sin(θ/2)|1⟩` to teleport.
///
/// Deserializes from either a preset name or a `{theta, phi}` map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InputRepr")]
pub struct TeleportInput {
    /// Polar angle θ.
    pub theta: f64,
    /// Azimuthal angle φ.
    pub phi: f64,
}

impl TeleportInput {
    /// |0⟩
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// |1⟩
    pub const ONE: Self = Self::new(PI, 0.0);
    /// |+⟩
    pub const PLUS: Self = Self::new(PI / 2.0, 0.0);
    /// |−⟩
    pub const MINUS: Self = Self::new(PI / 2.0, PI);
    /// |+i⟩
    pub const PLUS_I: Self = Self::new(PI / 2.0, PI / 2.0);

    /// Named presets accepted by [`FromStr`].
    pub const PRESETS: [(&'static str, Self); 5] = [
        ("zero", Self::ZERO),
        ("one", Self::ONE),
        ("plus", Self::PLUS),
        ("minus", Self::MINUS),
        ("plus_i", Self::PLUS_I),
    ];

    /// Create an input state from Bloch-sphere angles.
    pub const fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// Probability of reading 1 when measuring this state.
    pub fn probability_of_one(&self) -> f64 {
        (self.theta / 2.0).sin().powi(2)
    }

    /// Probability of reading 1 when measuring in `basis`.
    pub fn probability_of_one_in(&self, basis: MeasureBasis) -> f64 {
        match basis {
            MeasureBasis::Z => self.probability_of_one(),
            MeasureBasis::X => (1.0 - self.theta.sin() * self.phi.cos()) / 2.0,
        }
    }

    fn check_finite(self) -> DemoResult<Self> {
        if self.theta.is_finite() && self.phi.is_finite() {
            Ok(self)
        } else {
            Err(DemoError::InvalidInput(format!(
                "teleport angles must be finite, got theta={}, phi={}",
                self.theta, self.phi
            )))
        }
    }

    /// Bloch vector of the input state.
    pub fn bloch_vector(&self) -> BlochVector {
        BlochVector::from_angles(self.theta, self.phi)
    }

    /// Preset name, if the angles match one.
    pub fn preset_name(&self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, preset)| preset == self)
            .map(|(name, _)| *name)
    }
}

impl Default for TeleportInput {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for TeleportInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.preset_name() {
            Some(name) => write!(f, "{name} (θ={:.4}, φ={:.4})", self.theta, self.phi),
            None => write!(f, "θ={:.4}, φ={:.4}", self.theta, self.phi),
        }
    }
}

impl FromStr for TeleportInput {
    type Err = DemoError;

    /// Parse a preset name (`zero`, `one`, `plus`, `minus`, `plus_i`) or a
    /// `theta,phi` pair in radians.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((_, preset)) = Self::PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*preset);
        }

        let invalid = || {
            DemoError::InvalidInput(format!(
                "invalid teleport input '{s}' (expected a preset or 'theta,phi')"
            ))
        };
        let (theta, phi) = s.split_once(',').ok_or_else(invalid)?;
        let theta: f64 = theta.trim().parse().map_err(|_| invalid())?;
        let phi: f64 = phi.trim().parse().map_err(|_| invalid())?;
        Self::new(theta, phi).check_finite()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputRepr {
    Named(String),
    Angles { theta: f64, phi: f64 },
}

impl TryFrom<InputRepr> for TeleportInput {
    type Error = DemoError;

    fn try_from(repr: InputRepr) -> Result<Self, Self::Error> {
        match repr {
            InputRepr::Named(name) => name.parse(),
            InputRepr::Angles { theta, phi } => Self::new(theta, phi).check_finite(),
        }
    }
}

/// Build the teleportation circuit for `input` with the given correction.
///
/// Bob's qubit is always measured into `c[2]`; with classical correction
/// Alice's qubits are measured into `c[0]` (msg) and `c[1]` (alice) first.
pub fn teleport_circuit(input: TeleportInput, mode: CorrectionMode) -> IrResult<Circuit> {
    teleport_circuit_in_basis(input, mode, MeasureBasis::Z)
}

/// Like [`teleport_circuit`], with Bob read out in `basis`.
pub fn teleport_circuit_in_basis(
    input: TeleportInput,
    mode: CorrectionMode,
    basis: MeasureBasis,
) -> IrResult<Circuit> {
    let name = match basis {
        MeasureBasis::Z => format!("teleport_{mode}"),
        MeasureBasis::X => format!("teleport_{mode}_x"),
    };
    let mut circuit = Circuit::new(name);
    circuit.add_qreg("msg", 1);
    circuit.add_qreg("alice", 1);
    circuit.add_qreg("bob", 1);
    circuit.add_creg("c", 3);

    // State to send
    circuit.u(input.theta, input.phi, 0.0, MSG)?;

    // Shared Bell pair
    circuit.h(ALICE)?.cx(ALICE, BOB)?;
    circuit.barrier_all()?;

    // Alice's basis change
    circuit.cx(MSG, ALICE)?.h(MSG)?;
    circuit.barrier_all()?;

    match mode {
        CorrectionMode::Classical => {
            circuit.measure(MSG, ClbitId(0))?.measure(ALICE, ClbitId(1))?;
            circuit.x_if(BOB, ClbitId(1))?.z_if(BOB, ClbitId(0))?;
        }
        CorrectionMode::Coherent => {
            circuit.cx(ALICE, BOB)?.cz(MSG, BOB)?;
        }
        CorrectionMode::None => {}
    }

    if basis == MeasureBasis::X {
        circuit.h(BOB)?;
    }
    circuit.measure(BOB, ClbitId(2))?;
    Ok(circuit)
}

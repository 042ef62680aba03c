//! Quantum Phase Estimation.
//!
//! Estimates the eigenphase φ of a single-qubit phase gate `P(2πφ)` acting
//! on its |1⟩ eigenstate. Counting qubit `k` kicks back `2^k·φ`, and the
//! inverse QFT turns those phases into the binary digits of φ.

use std::f64::consts::PI;
use std::fmt;

use qalgo_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::circuits::qft::qft_dagger;
use crate::error::{DemoError, DemoResult};

/// Largest counting register accepted; qubit `k` applies `2^k` gates.
pub const MAX_COUNTING_QUBITS: u32 = 12;

/// The unitary whose eigenphase is estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTarget {
    /// The T gate, eigenphase 1/8.
    #[default]
    T,
    /// `P(2π·phase)` with `phase` in `[0, 1)`.
    Phase(f64),
}

impl PhaseTarget {
    /// Create a target from a phase, validating its range.
    pub fn phase(phase: f64) -> DemoResult<Self> {
        if !phase.is_finite() || !(0.0..1.0).contains(&phase) {
            return Err(DemoError::InvalidInput(format!(
                "phase must lie in [0, 1), got {phase}"
            )));
        }
        Ok(Self::Phase(phase))
    }

    /// The exact eigenphase, as a fraction of a full turn.
    pub fn true_phase(&self) -> f64 {
        match *self {
            // T = P(π/4)
            Self::T => 0.125,
            Self::Phase(phase) => phase,
        }
    }

    /// Angle of the controlled-phase gate applied once.
    pub fn angle(&self) -> f64 {
        match self {
            Self::T => PI / 4.0,
            Self::Phase(phase) => 2.0 * PI * phase,
        }
    }

    /// Whether `n` counting qubits can represent the phase exactly.
    pub fn is_exact(&self, counting_qubits: u32) -> bool {
        let scaled = self.true_phase() * f64::from(1u32 << counting_qubits);
        (scaled - scaled.round()).abs() < 1e-12
    }
}

impl fmt::Display for PhaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::T => write!(f, "T (φ = 1/8)"),
            Self::Phase(phase) => write!(f, "P(2π·{phase})"),
        }
    }
}

/// Check the counting register size.
pub fn check_counting_qubits(counting_qubits: u32) -> DemoResult<()> {
    if counting_qubits == 0 || counting_qubits > MAX_COUNTING_QUBITS {
        return Err(DemoError::InvalidInput(format!(
            "counting register must have 1..={MAX_COUNTING_QUBITS} qubits, got {counting_qubits}"
        )));
    }
    Ok(())
}

/// Build the phase-estimation circuit.
///
/// Qubits `0..n` form the counting register, qubit `n` holds the
/// eigenstate |1⟩. Counting qubit `k` is measured into `c[k]`, so the
/// resulting bitstring read as binary is `round(φ·2^n)`.
pub fn qpe_circuit(counting_qubits: u32, target: PhaseTarget) -> DemoResult<Circuit> {
    check_counting_qubits(counting_qubits)?;

    let mut circuit = Circuit::new(format!("qpe{counting_qubits}"));
    let counting = circuit.add_qreg("counting", counting_qubits);
    let eigen = circuit.add_qreg("eigen", 1);
    let clbits = circuit.add_creg("c", counting_qubits);
    let eigen = eigen[0];

    for &q in &counting {
        circuit.h(q)?;
    }
    circuit.x(eigen)?;

    let angle = target.angle();
    for (k, &control) in counting.iter().enumerate() {
        for _ in 0..(1u32 << k) {
            circuit.cp(angle, control, eigen)?;
        }
    }
    circuit.barrier_all()?;

    circuit.compose(&qft_dagger(counting_qubits)?, &counting, &[])?;
    circuit.barrier_all()?;

    circuit.measure_qubits(counting, clbits)?;
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_target() {
        let target = PhaseTarget::T;
        assert_eq!(target.true_phase(), 0.125);
        assert!((2.0 * PI * target.true_phase() - target.angle()).abs() < 1e-15);
        assert!(target.is_exact(3));
        assert!(!target.is_exact(2));
    }

    #[test]
    fn test_phase_validation() {
        assert!(PhaseTarget::phase(0.3).is_ok());
        assert!(PhaseTarget::phase(1.0).is_err());
        assert!(PhaseTarget::phase(-0.1).is_err());
        assert!(PhaseTarget::phase(f64::NAN).is_err());
    }

    #[test]
    fn test_qpe_circuit_shape() {
        let circuit = qpe_circuit(3, PhaseTarget::T).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_clbits(), 3);
        let ops = circuit.dag().count_ops();
        // 1 + 2 + 4 controlled phases, then 3 in the inverse QFT
        assert_eq!(ops.get("cp"), Some(&10));
        assert_eq!(ops.get("measure"), Some(&1));
    }

    #[test]
    fn test_rejects_empty_register() {
        assert!(matches!(
            qpe_circuit(0, PhaseTarget::T),
            Err(DemoError::InvalidInput(_))
        ));
        assert!(qpe_circuit(MAX_COUNTING_QUBITS + 1, PhaseTarget::T).is_err());
    }
}

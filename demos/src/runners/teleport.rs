//! Teleportation runner.

use qalgo_hal::{BlochVector, Counts, StatevectorBackend};
use qalgo_ir::Circuit;
use serde::Serialize;
use tracing::{debug, info};

use crate::circuits::teleport::{BOB, BOB_CLBIT, MeasureBasis, teleport_circuit_in_basis};
use crate::circuits::{CorrectionMode, TeleportInput, teleport_circuit};
use crate::config::{DEFAULT_SHOTS, DemoConfig};
use crate::error::DemoResult;
use crate::{
    print_bloch, print_counts, print_info, print_result, print_section, print_success,
    print_warning,
};

/// Bloch vectors of the sent and received states.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BlochComparison {
    /// Bloch vector of the input state.
    pub input: BlochVector,
    /// Bloch vector of Bob's qubit before his measurement.
    pub target: BlochVector,
    /// Euclidean distance between the two.
    pub distance: f64,
}

/// Bob's statistics in one measurement basis.
#[derive(Debug, Clone, Serialize)]
pub struct BasisCheck {
    /// Basis Bob was measured in.
    pub basis: MeasureBasis,
    /// Counts of Bob's bit alone.
    pub counts: Counts,
    /// Observed P(Bob reads 1).
    pub p_one_observed: f64,
    /// P(1) of the input state in the same basis.
    pub p_one_expected: f64,
}

impl BasisCheck {
    fn new(basis: MeasureBasis, counts: Counts, input: &TeleportInput) -> Self {
        let p_one_observed = counts.probability("1");
        Self {
            basis,
            counts,
            p_one_observed,
            p_one_expected: input.probability_of_one_in(basis),
        }
    }

    /// Observed and expected probabilities agree within `tolerance`.
    pub fn agrees(&self, tolerance: f64) -> bool {
        (self.p_one_observed - self.p_one_expected).abs() <= tolerance
    }
}

/// Outcome of a teleportation run.
#[derive(Debug, Clone, Serialize)]
pub struct TeleportReport {
    /// State that was sent.
    pub input: TeleportInput,
    /// Correction applied on Bob's side.
    pub mode: CorrectionMode,
    /// Shots executed.
    pub shots: u32,
    /// Counts over all three classical bits.
    pub counts: Counts,
    /// Counts of Bob's bit alone.
    pub target_counts: Counts,
    /// Observed P(Bob reads 1).
    pub p_one_observed: f64,
    /// sin²(θ/2) of the input state.
    pub p_one_expected: f64,
    /// Bob measured in the X basis, which exposes a missing Z correction.
    pub x_basis: BasisCheck,
    /// Observed and expected probabilities agree within tolerance in both
    /// bases.
    pub within_tolerance: bool,
    /// Present when the circuit before Bob's measurement is unitary.
    pub bloch: Option<BlochComparison>,
    /// Backend-reported execution time.
    pub execution_time_ms: Option<u64>,
}

impl TeleportReport {
    /// Whether Bob ended up with the input state.
    ///
    /// Needs both matching statistics and, when available, matching Bloch
    /// vectors.
    pub fn teleported(&self, tolerance: f64) -> bool {
        self.within_tolerance
            && self
                .bloch
                .is_none_or(|bloch| bloch.distance <= tolerance)
    }

    /// Print the report as styled text.
    pub fn print(&self, tolerance: f64) {
        print_section("Results");
        print_counts(&self.counts, self.execution_time_ms);

        print_section("Bob's qubit");
        print_counts(&self.target_counts, None);
        print_result("P(1) observed", format!("{:.4}", self.p_one_observed));
        print_result("P(1) expected", format!("{:.4}", self.p_one_expected));

        print_section("Bob's qubit, X basis");
        print_counts(&self.x_basis.counts, None);
        print_result("P(1) observed", format!("{:.4}", self.x_basis.p_one_observed));
        print_result("P(1) expected", format!("{:.4}", self.x_basis.p_one_expected));

        if let Some(bloch) = &self.bloch {
            print_section("Bloch vectors");
            print_bloch("input", &bloch.input);
            print_bloch("bob", &bloch.target);
            print_result("distance", format!("{:.4}", bloch.distance));
        } else {
            print_info("Bloch vectors need a unitary circuit; rerun with --mode coherent");
        }

        println!();
        if self.teleported(tolerance) {
            print_success("Bob's qubit matches the input state");
        } else if self.mode.corrects() {
            print_warning("Bob's qubit does not match the input state");
        } else {
            print_warning("Without corrections Bob holds a mixed state, not the input");
        }
    }
}

/// Runs the teleportation demo.
#[derive(Debug, Clone)]
pub struct TeleportRunner {
    /// State to send.
    pub input: TeleportInput,
    /// Correction applied on Bob's side.
    pub mode: CorrectionMode,
    /// Shots per run.
    pub shots: u32,
    /// Allowed deviation of P(1) from its expected value.
    pub tolerance: f64,
}

impl TeleportRunner {
    /// Create a runner for `input` with classical correction.
    pub fn new(input: TeleportInput) -> Self {
        Self {
            input,
            mode: CorrectionMode::Classical,
            shots: DEFAULT_SHOTS,
            tolerance: 0.05,
        }
    }

    /// Create a runner from a demo configuration.
    pub fn from_config(config: &DemoConfig) -> Self {
        Self::new(config.teleport.input)
            .with_mode(config.teleport.mode)
            .with_shots(config.shots)
            .with_tolerance(config.tolerance)
    }

    /// Set the correction mode.
    pub fn with_mode(mut self, mode: CorrectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of shots.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Set the tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// The circuit this runner executes.
    pub fn circuit(&self) -> DemoResult<Circuit> {
        Ok(teleport_circuit(self.input, self.mode)?)
    }

    /// Execute the circuit in both readout bases, and take Bloch vectors
    /// when it is unitary.
    pub fn run(&self, backend: &dyn StatevectorBackend) -> DemoResult<TeleportReport> {
        let circuit = self.circuit()?;
        info!(
            "Teleporting {} with {} correction, {} shots",
            self.input, self.mode, self.shots
        );

        let result = backend.run(&circuit, self.shots)?;
        let target_counts = result.counts.marginal(&[BOB_CLBIT]);
        let p_one_observed = target_counts.probability("1");
        let p_one_expected = self.input.probability_of_one();

        let x_circuit = teleport_circuit_in_basis(self.input, self.mode, MeasureBasis::X)?;
        let x_result = backend.run(&x_circuit, self.shots)?;
        let x_basis = BasisCheck::new(
            MeasureBasis::X,
            x_result.counts.marginal(&[BOB_CLBIT]),
            &self.input,
        );
        debug!(
            "X basis P(1) observed {:.4}, expected {:.4}",
            x_basis.p_one_observed, x_basis.p_one_expected
        );
        let within_tolerance = (p_one_observed - p_one_expected).abs() <= self.tolerance
            && x_basis.agrees(self.tolerance);

        let bloch = if self.mode.is_unitary() {
            let state = backend.statevector(&circuit)?;
            let input = self.input.bloch_vector();
            let target = state.bloch_vector(BOB.index())?;
            debug!("Bob's Bloch vector {target}, input {input}");
            Some(BlochComparison {
                input,
                target,
                distance: input.distance(&target),
            })
        } else {
            None
        };

        Ok(TeleportReport {
            input: self.input,
            mode: self.mode,
            shots: self.shots,
            counts: result.counts,
            target_counts,
            p_one_observed,
            p_one_expected,
            x_basis,
            within_tolerance,
            bloch,
            execution_time_ms: result.execution_time_ms,
        })
    }
}

//! Phase-estimation runner.

use qalgo_hal::{Backend, Counts};
use qalgo_ir::Circuit;
use serde::Serialize;
use tracing::info;

use crate::circuits::{PhaseTarget, qpe_circuit};
use crate::config::{DEFAULT_SHOTS, DemoConfig};
use crate::error::{DemoError, DemoResult};
use crate::{print_counts, print_info, print_result, print_section, print_success, print_warning};

/// Outcome of a phase-estimation run.
#[derive(Debug, Clone, Serialize)]
pub struct QpeReport {
    /// Unitary whose eigenphase was estimated.
    pub target: PhaseTarget,
    /// Size of the counting register.
    pub counting_qubits: u32,
    /// Shots executed.
    pub shots: u32,
    /// Measurement counts over the counting register.
    pub counts: Counts,
    /// Most frequent bitstring.
    pub most_frequent: String,
    /// That bitstring read as binary.
    pub measured_value: u64,
    /// `measured_value / 2^n`.
    pub estimated_phase: f64,
    /// The exact eigenphase.
    pub true_phase: f64,
    /// `|estimated - true|`.
    pub error: f64,
    /// Smallest phase step the register can resolve, `1/2^n`.
    pub resolution: f64,
    /// The true phase is a multiple of the resolution.
    pub exact: bool,
    /// Backend-reported execution time.
    pub execution_time_ms: Option<u64>,
}

impl QpeReport {
    /// Print the report as styled text.
    pub fn print(&self) {
        print_section("Results");
        print_counts(&self.counts, self.execution_time_ms);

        print_section("Estimate");
        print_result("most frequent", &self.most_frequent);
        print_result(
            "estimated phase",
            format!(
                "{} / {} = {:.6}",
                self.measured_value,
                1u64 << self.counting_qubits,
                self.estimated_phase
            ),
        );
        print_result("true phase", format!("{:.6}", self.true_phase));
        print_result("absolute error", format!("{:.6}", self.error));
        print_result("resolution", format!("{:.6}", self.resolution));

        println!();
        if self.exact && self.error < 1e-12 {
            print_success("Phase recovered exactly");
        } else if self.exact {
            print_warning("Phase is representable but was not recovered");
        } else {
            print_info("Phase is not a multiple of 1/2^n; add counting qubits to sharpen it");
        }
    }
}

/// Runs the phase-estimation demo.
#[derive(Debug, Clone)]
pub struct QpeRunner {
    /// Size of the counting register.
    pub counting_qubits: u32,
    /// Unitary whose eigenphase is estimated.
    pub target: PhaseTarget,
    /// Shots per run.
    pub shots: u32,
}

impl QpeRunner {
    /// Create a runner estimating the T gate's phase.
    pub fn new(counting_qubits: u32) -> Self {
        Self {
            counting_qubits,
            target: PhaseTarget::T,
            shots: DEFAULT_SHOTS,
        }
    }

    /// Create a runner from a demo configuration.
    pub fn from_config(config: &DemoConfig) -> DemoResult<Self> {
        Ok(Self::new(config.qpe.counting_qubits)
            .with_target(config.qpe.target()?)
            .with_shots(config.shots))
    }

    /// Set the unitary to estimate.
    pub fn with_target(mut self, target: PhaseTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the number of shots.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// The circuit this runner executes.
    pub fn circuit(&self) -> DemoResult<Circuit> {
        qpe_circuit(self.counting_qubits, self.target)
    }

    /// Execute the circuit and read the phase off the most frequent outcome.
    pub fn run(&self, backend: &dyn Backend) -> DemoResult<QpeReport> {
        let circuit = self.circuit()?;
        info!(
            "Estimating phase of {} with {} counting qubits, {} shots",
            self.target, self.counting_qubits, self.shots
        );

        let result = backend.run(&circuit, self.shots)?;
        let (most_frequent, measured_value) = {
            let (bits, _) = result.counts.most_frequent().ok_or(DemoError::NoCounts)?;
            let value = u64::from_str_radix(bits, 2)
                .map_err(|_| DemoError::InvalidInput(format!("non-binary outcome '{bits}'")))?;
            (bits.to_string(), value)
        };

        let scale = f64::from(1u32 << self.counting_qubits);
        let estimated_phase = measured_value as f64 / scale;
        let true_phase = self.target.true_phase();

        Ok(QpeReport {
            target: self.target,
            counting_qubits: self.counting_qubits,
            shots: self.shots,
            counts: result.counts,
            most_frequent,
            measured_value,
            estimated_phase,
            true_phase,
            error: (estimated_phase - true_phase).abs(),
            resolution: 1.0 / scale,
            exact: self.target.is_exact(self.counting_qubits),
            execution_time_ms: result.execution_time_ms,
        })
    }
}

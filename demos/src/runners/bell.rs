//! Bell-state runner.

use qalgo_hal::{Backend, Counts};
use qalgo_ir::Circuit;
use serde::Serialize;
use tracing::info;

use crate::circuits::bell_circuit;
use crate::config::{DEFAULT_SHOTS, DemoConfig};
use crate::error::DemoResult;
use crate::{print_counts, print_result, print_section, print_success, print_warning};

/// Outcome of a Bell-state run.
#[derive(Debug, Clone, Serialize)]
pub struct BellReport {
    /// Shots executed.
    pub shots: u32,
    /// Raw counts.
    pub counts: Counts,
    /// Observed P(00).
    pub p00: f64,
    /// Observed P(11).
    pub p11: f64,
    /// Observed P(01) + P(10).
    pub p_anticorrelated: f64,
    /// P(00) and P(11) both lie within tolerance of 1/2.
    pub balanced: bool,
    /// No anticorrelated outcome was observed.
    pub correlated: bool,
    /// Backend-reported execution time.
    pub execution_time_ms: Option<u64>,
}

impl BellReport {
    /// Whether the run shows the expected Bell statistics.
    pub fn passed(&self) -> bool {
        self.balanced && self.correlated
    }

    /// Print the report as styled text.
    pub fn print(&self) {
        print_section("Results");
        print_counts(&self.counts, self.execution_time_ms);

        print_section("Analysis");
        print_result("P(00)", format!("{:.4}", self.p00));
        print_result("P(11)", format!("{:.4}", self.p11));
        print_result("P(01) + P(10)", format!("{:.4}", self.p_anticorrelated));
        println!();
        if self.passed() {
            print_success("Qubits are perfectly correlated and evenly split between 00 and 11");
        } else if !self.correlated {
            print_warning("Anticorrelated outcomes observed");
        } else {
            print_warning("00/11 split is outside the tolerance");
        }
    }
}

/// Runs the Bell-state demo.
#[derive(Debug, Clone)]
pub struct BellRunner {
    /// Shots per run.
    pub shots: u32,
    /// Allowed deviation of P(00) and P(11) from 1/2.
    pub tolerance: f64,
}

impl BellRunner {
    /// Create a runner with default settings.
    pub fn new() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            tolerance: 0.05,
        }
    }

    /// Create a runner from a demo configuration.
    pub fn from_config(config: &DemoConfig) -> Self {
        Self::new()
            .with_shots(config.shots)
            .with_tolerance(config.tolerance)
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
        Ok(bell_circuit()?)
    }

    /// Execute the circuit and summarise the counts.
    pub fn run(&self, backend: &dyn Backend) -> DemoResult<BellReport> {
        let circuit = self.circuit()?;
        info!("Running Bell circuit with {} shots on {}", self.shots, backend.name());
        let result = backend.run(&circuit, self.shots)?;
        let counts = result.counts;

        let p00 = counts.probability("00");
        let p11 = counts.probability("11");
        let p_anticorrelated = counts.probability("01") + counts.probability("10");

        Ok(BellReport {
            shots: self.shots,
            p00,
            p11,
            p_anticorrelated,
            balanced: (p00 - 0.5).abs() <= self.tolerance && (p11 - 0.5).abs() <= self.tolerance,
            correlated: counts.get("01") == 0 && counts.get("10") == 0,
            counts,
            execution_time_ms: result.execution_time_ms,
        })
    }
}

impl Default for BellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qalgo_adapter_sim::SimulatorBackend;

    #[test]
    fn test_bell_runner() {
        let backend = SimulatorBackend::new().with_seed(11);
        let report = BellRunner::new().with_shots(2000).run(&backend).unwrap();
        assert_eq!(report.counts.total_shots(), 2000);
        assert!(report.correlated);
        assert!(report.balanced);
        assert!(report.passed());
        assert_eq!(report.p_anticorrelated, 0.0);
    }

    #[test]
    fn test_zero_shots_is_an_error() {
        let backend = SimulatorBackend::new();
        assert!(BellRunner::new().with_shots(0).run(&backend).is_err());
    }
}

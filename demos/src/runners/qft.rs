//! QFT runner.

use std::f64::consts::PI;

use num_complex::Complex64;
use qalgo_hal::{Counts, StatevectorBackend, StatevectorResult};
use qalgo_ir::Circuit;
use serde::Serialize;
use tracing::info;

use crate::circuits::qft::{check_qft_size, qft_demo_circuit};
use crate::config::{DEFAULT_SHOTS, DemoConfig};
use crate::error::DemoResult;
use crate::{
    print_amplitudes, print_counts, print_result, print_section, print_success, print_warning,
};

/// One row of the amplitude table.
#[derive(Debug, Clone, Serialize)]
pub struct AmplitudeRow {
    /// Basis index.
    pub index: usize,
    /// Ket label, highest qubit first.
    pub label: String,
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
    /// |amplitude|
    pub magnitude: f64,
    /// Phase as a fraction of a full turn, in `[0, 1)`.
    pub phase: f64,
}

impl AmplitudeRow {
    fn new(state: &StatevectorResult, index: usize, amplitude: Complex64) -> Self {
        let magnitude = amplitude.norm();
        let phase = if magnitude < 1e-12 {
            0.0
        } else {
            let turns = amplitude.arg() / (2.0 * PI);
            // Snap values that round to a full turn back to 0
            let turns = turns.rem_euclid(1.0);
            if (1.0 - turns) < 1e-12 { 0.0 } else { turns }
        };
        Self {
            index,
            label: state.basis_label(index),
            re: amplitude.re,
            im: amplitude.im,
            magnitude,
            phase,
        }
    }
}

/// Outcome of a QFT run.
#[derive(Debug, Clone, Serialize)]
pub struct QftReport {
    /// Register size.
    pub num_qubits: u32,
    /// Prepared basis state.
    pub input: u64,
    /// Ket label of the prepared state.
    pub input_label: String,
    /// Statevector after the transform.
    pub amplitudes: Vec<AmplitudeRow>,
    /// The statevector equals `Σ_k e^{2πi·x·k/N}|k⟩/√N`.
    pub matches_fourier: bool,
    /// Shots executed.
    pub shots: u32,
    /// Measurement counts.
    pub counts: Counts,
    /// Largest deviation of an observed probability from `1/N`.
    pub max_deviation: f64,
    /// Every outcome lies within tolerance of `1/N`.
    pub uniform: bool,
    /// Backend-reported execution time.
    pub execution_time_ms: Option<u64>,
}

impl QftReport {
    /// Whether both the statevector and the counts look right.
    pub fn passed(&self) -> bool {
        self.matches_fourier && self.uniform
    }

    /// Print the report as styled text.
    pub fn print(&self) {
        print_section("Statevector");
        print_amplitudes(&self.amplitudes);

        print_section("Results");
        print_counts(&self.counts, self.execution_time_ms);
        print_result("max |P(k) - 1/N|", format!("{:.4}", self.max_deviation));

        println!();
        if self.matches_fourier {
            print_success(&format!(
                "Amplitudes follow e^(2πi·{}·k/{})/√{}",
                self.input,
                1u64 << self.num_qubits,
                1u64 << self.num_qubits
            ));
        } else {
            print_warning("Amplitudes differ from the Fourier basis state");
        }
        if self.uniform {
            print_success("Measurement outcomes are uniform");
        } else {
            print_warning("Measurement outcomes are not uniform within tolerance");
        }
    }
}

/// The Fourier basis state `Σ_k e^{2πi·x·k/N}|k⟩/√N`.
pub fn fourier_state(num_qubits: u32, input: u64) -> DemoResult<StatevectorResult> {
    check_qft_size(num_qubits)?;
    let dim = 1usize << num_qubits;
    let norm = 1.0 / (dim as f64).sqrt();
    let amplitudes = (0..dim)
        .map(|k| {
            // Reduce x·k mod N first to keep the angle small
            let turns = ((input as u128 * k as u128) % dim as u128) as f64 / dim as f64;
            Complex64::from_polar(norm, 2.0 * PI * turns)
        })
        .collect();
    Ok(StatevectorResult::new(amplitudes)?)
}

/// Runs the QFT demo.
#[derive(Debug, Clone)]
pub struct QftRunner {
    /// Register size.
    pub num_qubits: u32,
    /// Basis state prepared before the transform.
    pub input: u64,
    /// Shots per run.
    pub shots: u32,
    /// Allowed deviation of each outcome probability from `1/N`.
    pub tolerance: f64,
}

impl QftRunner {
    /// Create a runner for QFT on `|input⟩`.
    pub fn new(num_qubits: u32, input: u64) -> Self {
        Self {
            num_qubits,
            input,
            shots: DEFAULT_SHOTS,
            tolerance: 0.05,
        }
    }

    /// Create a runner from a demo configuration.
    pub fn from_config(config: &DemoConfig) -> Self {
        Self::new(config.qft.num_qubits, config.qft.input)
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
        qft_demo_circuit(self.num_qubits, self.input)
    }

    /// Take the statevector, then sample the same circuit.
    pub fn run(&self, backend: &dyn StatevectorBackend) -> DemoResult<QftReport> {
        let circuit = self.circuit()?;
        info!(
            "Running QFT{} on |{}⟩ with {} shots",
            self.num_qubits, self.input, self.shots
        );

        let state = backend.statevector(&circuit)?;
        let amplitudes = state
            .amplitudes()
            .iter()
            .enumerate()
            .map(|(index, &amp)| AmplitudeRow::new(&state, index, amp))
            .collect();
        let expected = fourier_state(self.num_qubits, self.input)?;
        let matches_fourier = state.approx_eq(&expected, 1e-9, false);

        let result = backend.run(&circuit, self.shots)?;
        let dim = 1usize << self.num_qubits;
        let uniform_p = 1.0 / dim as f64;
        let width = self.num_qubits as usize;
        let max_deviation = (0..dim)
            .map(|k| (result.counts.probability(&format!("{k:0width$b}")) - uniform_p).abs())
            .fold(0.0, f64::max);

        Ok(QftReport {
            num_qubits: self.num_qubits,
            input: self.input,
            input_label: state.basis_label(self.input as usize),
            amplitudes,
            matches_fourier,
            shots: self.shots,
            counts: result.counts,
            max_deviation,
            uniform: max_deviation <= self.tolerance,
            execution_time_ms: result.execution_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qalgo_adapter_sim::SimulatorBackend;

    #[test]
    fn test_fourier_state_of_zero_is_uniform() {
        let state = fourier_state(3, 0).unwrap();
        let expected = 1.0 / 8.0_f64.sqrt();
        for amp in state.amplitudes() {
            assert!((amp - Complex64::new(expected, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_qft_on_four_alternates_sign() {
        let backend = SimulatorBackend::new().with_seed(1);
        let report = QftRunner::new(3, 4).run(&backend).unwrap();
        assert!(report.matches_fourier);
        assert!(report.uniform);
        assert_eq!(report.input_label, "|100⟩");
        for row in &report.amplitudes {
            let expected_phase = if row.index % 2 == 0 { 0.0 } else { 0.5 };
            assert!((row.phase - expected_phase).abs() < 1e-9, "{row:?}");
            assert!((row.magnitude - 1.0 / 8.0_f64.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_out_of_range_input() {
        let backend = SimulatorBackend::new();
        assert!(QftRunner::new(3, 8).run(&backend).is_err());
    }
}

//! Integration tests for the demo suite.
//!
//! Every run uses a seeded simulator so that sampled counts are
//! reproducible.

use std::f64::consts::PI;

use qalgo_adapter_sim::SimulatorBackend;
use qalgo_demos::circuits::qft::prepare_basis;
use qalgo_demos::circuits::{
    CorrectionMode, PhaseTarget, TeleportInput, bell_circuit, qft, qft_dagger, qpe_circuit,
    teleport_circuit,
};
use qalgo_demos::runners::{BellRunner, QftRunner, QpeRunner, TeleportRunner};
use qalgo_demos::{DemoConfig, DemoError};
use qalgo_hal::{Backend, StatevectorBackend, StatevectorResult};
use qalgo_ir::{Circuit, QubitId};

fn backend(seed: u64) -> SimulatorBackend {
    SimulatorBackend::new().with_seed(seed)
}

/// Bell counts are split between 00 and 11 and never anticorrelated.
#[test]
fn test_bell_statistics() {
    for seed in [1, 2, 3] {
        let report = BellRunner::new()
            .with_shots(4000)
            .run(&backend(seed))
            .unwrap();
        assert_eq!(report.counts.get("01"), 0);
        assert_eq!(report.counts.get("10"), 0);
        assert!((report.p00 - 0.5).abs() < 0.05, "P(00) = {}", report.p00);
        assert!((report.p11 - 0.5).abs() < 0.05, "P(11) = {}", report.p11);
    }
}

/// The Bell statevector is (|00⟩ + |11⟩)/√2.
#[test]
fn test_bell_statevector() {
    let state = backend(0).statevector(&bell_circuit().unwrap()).unwrap();
    let p = state.probabilities();
    assert!((p[0] - 0.5).abs() < 1e-12);
    assert!((p[3] - 0.5).abs() < 1e-12);
    assert!(p[1].abs() < 1e-12 && p[2].abs() < 1e-12);
    assert!(state.bloch_vector(0).unwrap().length() < 1e-12);
}

/// Corrected teleportation reproduces the input statistics in both readout
/// bases for every preset.
#[test]
fn test_teleport_presets() {
    for (name, input) in TeleportInput::PRESETS {
        for mode in [CorrectionMode::Classical, CorrectionMode::Coherent] {
            let report = TeleportRunner::new(input)
                .with_mode(mode)
                .with_shots(2000)
                .run(&backend(17))
                .unwrap();
            assert!(
                report.within_tolerance,
                "{name} / {mode}: Z observed {} expected {}, X observed {} expected {}",
                report.p_one_observed,
                report.p_one_expected,
                report.x_basis.p_one_observed,
                report.x_basis.p_one_expected
            );
        }
    }
}

/// Coherent correction lands the exact input Bloch vector on Bob's qubit.
#[test]
fn test_teleport_coherent_bloch_vectors() {
    let inputs = [
        TeleportInput::new(0.3, 1.1),
        TeleportInput::new(2.0, -0.7),
        TeleportInput::new(PI / 3.0, PI),
    ];
    for input in inputs {
        let circuit = teleport_circuit(input, CorrectionMode::Coherent).unwrap();
        let state = backend(0).statevector(&circuit).unwrap();
        let bob = state.bloch_vector(2).unwrap();
        assert!(bob.distance(&input.bloch_vector()) < 1e-9, "{input}: {bob}");
    }
}

/// Without corrections Bob's qubit is maximally mixed, whatever was sent.
#[test]
fn test_teleport_without_correction_is_mixed() {
    for (_, input) in TeleportInput::PRESETS {
        let circuit = teleport_circuit(input, CorrectionMode::None).unwrap();
        let state = backend(0).statevector(&circuit).unwrap();
        assert!(state.bloch_vector(2).unwrap().length() < 1e-9);
    }
}

/// The classical variant cannot be simulated as a single statevector.
#[test]
fn test_teleport_classical_statevector_unsupported() {
    let circuit = teleport_circuit(TeleportInput::PLUS, CorrectionMode::Classical).unwrap();
    assert!(backend(0).statevector(&circuit).is_err());
}

/// QFT3 on |0⟩ gives 1/√8 on every basis state.
#[test]
fn test_qft3_on_zero_is_uniform() {
    let report = QftRunner::new(3, 0).run(&backend(5)).unwrap();
    assert!(report.matches_fourier);
    let expected = 1.0 / 8.0_f64.sqrt();
    for row in &report.amplitudes {
        assert!((row.re - expected).abs() < 1e-12, "{row:?}");
        assert!(row.im.abs() < 1e-12, "{row:?}");
    }
}

/// QFT3 on |100⟩ gives the alternating-sign Fourier state.
#[test]
fn test_qft3_default_input() {
    let config = DemoConfig::default();
    let report = QftRunner::from_config(&config).run(&backend(6)).unwrap();
    assert_eq!(report.input, 4);
    assert!(report.passed());
    assert_eq!(report.counts.len(), 8);
}

/// QPE of the T gate with three counting qubits reads exactly 001.
#[test]
fn test_qpe_t_gate() {
    let report = QpeRunner::new(3).with_shots(1024).run(&backend(8)).unwrap();
    assert_eq!(report.most_frequent, "001");
    assert_eq!(report.counts.len(), 1);
    assert_eq!(report.estimated_phase, 0.125);
    assert_eq!(report.true_phase, 0.125);
}

/// More counting qubits keep an exact phase exact.
#[test]
fn test_qpe_more_counting_qubits() {
    for n in 3..=6 {
        let report = QpeRunner::new(n).run(&backend(u64::from(n))).unwrap();
        assert_eq!(report.estimated_phase, 0.125);
        assert_eq!(report.measured_value, 1 << (n - 3));
    }
}

/// An exactly representable custom phase is recovered exactly.
#[test]
fn test_qpe_custom_phase() {
    let target = PhaseTarget::phase(0.625).unwrap();
    let report = QpeRunner::new(3)
        .with_target(target)
        .run(&backend(10))
        .unwrap();
    assert_eq!(report.most_frequent, "101");
    assert!(report.exact);
}

/// The QPE circuit measures only the counting register.
#[test]
fn test_qpe_circuit_counts_width() {
    let circuit = qpe_circuit(4, PhaseTarget::T).unwrap();
    let result = backend(3).run(&circuit, 256).unwrap();
    assert!(result.counts.iter().all(|(bits, _)| bits.len() == 4));
}

fn basis_then(n: u32, x: u64, tail: &[&Circuit]) -> Circuit {
    let mut circuit = Circuit::with_size("roundtrip", n, 0);
    let qubits: Vec<_> = (0..n).map(QubitId).collect();
    prepare_basis(&mut circuit, &qubits, x).unwrap();
    for part in tail {
        circuit.compose(part, &qubits, &[]).unwrap();
    }
    circuit
}

/// QFT followed by its inverse returns every basis state.
#[test]
fn test_qft_roundtrip_all_basis_states() {
    let sim = backend(0);
    for n in 1..=4u32 {
        let forward = qft(n, true).unwrap();
        let inverse = qft_dagger(n).unwrap();
        for x in 0..(1u64 << n) {
            let circuit = basis_then(n, x, &[&forward, &inverse]);
            let state = sim.statevector(&circuit).unwrap();
            let expected = StatevectorResult::basis(n as usize, x as usize).unwrap();
            assert!(state.approx_eq(&expected, 1e-10, false), "n={n}, x={x}");
        }
    }
}

/// The explicit inverse QFT acts like the generic circuit inverse.
#[test]
fn test_qft_dagger_matches_inverse() {
    let sim = backend(0);
    for n in 1..=4u32 {
        let explicit = qft_dagger(n).unwrap();
        let generic = qft(n, true).unwrap().inverse().unwrap();
        for x in 0..(1u64 << n) {
            let a = sim.statevector(&basis_then(n, x, &[&explicit])).unwrap();
            let b = sim.statevector(&basis_then(n, x, &[&generic])).unwrap();
            assert!(a.approx_eq(&b, 1e-10, false), "n={n}, x={x}");
        }
    }
}

/// Out-of-range demo parameters surface as input errors.
#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        QftRunner::new(3, 8).run(&backend(0)),
        Err(DemoError::InvalidInput(_))
    ));
    assert!(matches!(
        QpeRunner::new(0).run(&backend(0)),
        Err(DemoError::InvalidInput(_))
    ));
    assert!(matches!(
        BellRunner::new().with_shots(0).run(&backend(0)),
        Err(DemoError::Hal(_))
    ));
}

/// A fixed seed makes whole runs reproducible.
#[test]
fn test_seeded_runs_repeat() {
    let a = TeleportRunner::new(TeleportInput::PLUS)
        .run(&backend(99))
        .unwrap();
    let b = TeleportRunner::new(TeleportInput::PLUS)
        .run(&backend(99))
        .unwrap();
    assert_eq!(a.counts, b.counts);
}

//! Property-based tests for the QFT and teleportation demos.

use proptest::prelude::*;
use qalgo_adapter_sim::SimulatorBackend;
use qalgo_demos::circuits::qft::prepare_basis;
use qalgo_demos::circuits::{CorrectionMode, TeleportInput, qft, qft_dagger, teleport_circuit};
use qalgo_demos::runners::{TeleportRunner, fourier_state};
use qalgo_hal::{StatevectorBackend, StatevectorResult};
use qalgo_ir::{Circuit, QubitId};

fn arb_basis_state() -> impl Strategy<Value = (u32, u64)> {
    (1_u32..=6).prop_flat_map(|n| (Just(n), 0..(1_u64 << n)))
}

fn arb_input() -> impl Strategy<Value = TeleportInput> {
    (0.0..std::f64::consts::PI, -3.2_f64..3.2).prop_map(|(t, p)| TeleportInput::new(t, p))
}

fn prepared(n: u32, x: u64) -> (Circuit, Vec<QubitId>) {
    let mut circuit = Circuit::with_size("prop", n, 0);
    let qubits: Vec<_> = (0..n).map(QubitId).collect();
    prepare_basis(&mut circuit, &qubits, x).unwrap();
    (circuit, qubits)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn qft_then_inverse_is_identity((n, x) in arb_basis_state()) {
        let (mut circuit, qubits) = prepared(n, x);
        circuit.compose(&qft(n, true).unwrap(), &qubits, &[]).unwrap();
        circuit.compose(&qft_dagger(n).unwrap(), &qubits, &[]).unwrap();

        let state = SimulatorBackend::new().statevector(&circuit).unwrap();
        let expected = StatevectorResult::basis(n as usize, x as usize).unwrap();
        prop_assert!(state.approx_eq(&expected, 1e-9, false));
    }

    #[test]
    fn qft_produces_fourier_state((n, x) in arb_basis_state()) {
        let (mut circuit, qubits) = prepared(n, x);
        circuit.compose(&qft(n, true).unwrap(), &qubits, &[]).unwrap();

        let state = SimulatorBackend::new().statevector(&circuit).unwrap();
        prop_assert!(state.approx_eq(&fourier_state(n, x).unwrap(), 1e-9, false));
    }

    #[test]
    fn coherent_teleport_preserves_bloch_vector(input in arb_input()) {
        let circuit = teleport_circuit(input, CorrectionMode::Coherent).unwrap();
        let state = SimulatorBackend::new().statevector(&circuit).unwrap();
        let bob = state.bloch_vector(2).unwrap();
        prop_assert!(bob.distance(&input.bloch_vector()) < 1e-9);
    }

    #[test]
    fn classical_teleport_matches_probability(input in arb_input(), seed in any::<u64>()) {
        let report = TeleportRunner::new(input)
            .with_shots(4000)
            .with_tolerance(0.06)
            .run(&SimulatorBackend::new().with_seed(seed))
            .unwrap();
        prop_assert!(
            report.within_tolerance,
            "observed {} expected {}",
            report.p_one_observed,
            report.p_one_expected
        );
    }
}

//! Property-based tests for statevector normalisation and sampling.

use proptest::prelude::*;
use qalgo_adapter_sim::SimulatorBackend;
use qalgo_hal::{Backend, StatevectorBackend};
use qalgo_ir::{Circuit, ClbitId, QubitId};

#[derive(Debug, Clone)]
enum Op {
    H(u32),
    Ry(f64, u32),
    U(f64, f64, f64, u32),
    CX(u32, u32),
    CP(f64, u32, u32),
    Swap(u32, u32),
}

fn arb_op(n: u32) -> impl Strategy<Value = Op> {
    let angle = -6.3_f64..6.3;
    prop_oneof![
        (0..n).prop_map(Op::H),
        (angle.clone(), 0..n).prop_map(|(t, q)| Op::Ry(t, q)),
        (angle.clone(), angle.clone(), angle.clone(), 0..n)
            .prop_map(|(t, p, l, q)| Op::U(t, p, l, q)),
        (0..n, 0..n).prop_map(|(a, b)| Op::CX(a, b)),
        (angle, 0..n, 0..n).prop_map(|(t, a, b)| Op::CP(t, a, b)),
        (0..n, 0..n).prop_map(|(a, b)| Op::Swap(a, b)),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5).prop_flat_map(|n| {
        prop::collection::vec(arb_op(n), 0..=25).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", n, n);
            for op in ops {
                let _ = match op {
                    Op::H(q) => circuit.h(QubitId(q)),
                    Op::Ry(t, q) => circuit.ry(t, QubitId(q)),
                    Op::U(t, p, l, q) => circuit.u(t, p, l, QubitId(q)),
                    Op::CX(a, b) => circuit.cx(QubitId(a), QubitId(b)),
                    Op::CP(t, a, b) => circuit.cp(t, QubitId(a), QubitId(b)),
                    Op::Swap(a, b) => circuit.swap(QubitId(a), QubitId(b)),
                };
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn unitary_circuits_stay_normalised(circuit in arb_circuit()) {
        let sv = SimulatorBackend::new().statevector(&circuit).unwrap();
        prop_assert!((sv.norm() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn inverse_restores_zero_state(circuit in arb_circuit()) {
        let mut round_trip = circuit.clone();
        let inverse = circuit.inverse().unwrap();
        let qubits: Vec<_> = (0..circuit.num_qubits() as u32).map(QubitId).collect();
        let clbits: Vec<_> = (0..circuit.num_clbits() as u32).map(ClbitId).collect();
        round_trip.compose(&inverse, &qubits, &clbits).unwrap();

        let sv = SimulatorBackend::new().statevector(&round_trip).unwrap();
        prop_assert!((sv.probabilities()[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn counts_sum_to_shots(circuit in arb_circuit(), shots in 1_u32..500, seed in any::<u64>()) {
        let mut measured = circuit;
        measured.measure_all().unwrap();
        let result = SimulatorBackend::new().with_seed(seed).run(&measured, shots).unwrap();
        prop_assert_eq!(result.counts.total_shots(), u64::from(shots));
        for (bits, _) in result.counts.iter() {
            prop_assert_eq!(bits.len(), measured.num_clbits());
        }
    }
}

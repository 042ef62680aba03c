//! Property-based tests for circuit transforms.

use proptest::prelude::*;
use qalgo_ir::{Circuit, QubitId, StandardGate};

#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    T(u32),
    Rz(f64, u32),
    U(f64, f64, f64, u32),
    CX(u32, u32),
    CP(f64, u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        // Ops with a repeated qubit are rejected by the circuit and skipped.
        let _ = match self {
            GateOp::H(q) => circuit.h(QubitId(q)),
            GateOp::T(q) => circuit.t(QubitId(q)),
            GateOp::Rz(theta, q) => circuit.rz(theta, QubitId(q)),
            GateOp::U(t, p, l, q) => circuit.u(t, p, l, QubitId(q)),
            GateOp::CX(a, b) => circuit.cx(QubitId(a), QubitId(b)),
            GateOp::CP(theta, a, b) => circuit.cp(theta, QubitId(a), QubitId(b)),
        };
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let angle = -6.3_f64..6.3;
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::T),
        (angle.clone(), 0..num_qubits).prop_map(|(t, q)| GateOp::Rz(t, q)),
        (angle.clone(), angle.clone(), angle.clone(), 0..num_qubits)
            .prop_map(|(t, p, l, q)| GateOp::U(t, p, l, q)),
        (0..num_qubits, 0..num_qubits).prop_map(|(a, b)| GateOp::CX(a, b)),
        (angle, 0..num_qubits, 0..num_qubits).prop_map(|(t, a, b)| GateOp::CP(t, a, b)),
    ]
}

fn arb_unitary_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=5).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=20).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", num_qubits, 0);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

fn gate_kinds(circuit: &Circuit) -> Vec<(StandardGate, Vec<QubitId>)> {
    circuit
        .instructions()
        .filter_map(|inst| inst.as_gate().map(|g| (g.kind, inst.qubits.clone())))
        .collect()
}

proptest! {
    #[test]
    fn inverse_is_an_involution(circuit in arb_unitary_circuit()) {
        let twice = circuit.inverse().unwrap().inverse().unwrap();
        prop_assert_eq!(gate_kinds(&twice), gate_kinds(&circuit));
    }

    #[test]
    fn inverse_preserves_shape(circuit in arb_unitary_circuit()) {
        let inverse = circuit.inverse().unwrap();
        prop_assert_eq!(inverse.num_qubits(), circuit.num_qubits());
        prop_assert_eq!(inverse.gate_count(), circuit.gate_count());
        prop_assert_eq!(inverse.depth(), circuit.depth());
    }
}

//! Property-based tests for QASM3 emission.

use proptest::prelude::*;
use qalgo_ir::{Circuit, ClbitId, QubitId};
use qalgo_qasm3::emit;

#[derive(Debug, Clone)]
enum Op {
    H(u32),
    Rz(f64, u32),
    CX(u32, u32),
    Measure(u32),
    XIf(u32, u32),
}

fn arb_op(num_qubits: u32) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..num_qubits).prop_map(Op::H),
        (-3.0_f64..3.0, 0..num_qubits).prop_map(|(t, q)| Op::Rz(t, q)),
        (0..num_qubits, 0..num_qubits).prop_map(|(a, b)| Op::CX(a, b)),
        (0..num_qubits).prop_map(Op::Measure),
        (0..num_qubits, 0..num_qubits).prop_map(|(q, c)| Op::XIf(q, c)),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5).prop_flat_map(|n| {
        prop::collection::vec(arb_op(n), 0..=15).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", n, n);
            for op in ops {
                let _ = match op {
                    Op::H(q) => circuit.h(QubitId(q)),
                    Op::Rz(t, q) => circuit.rz(t, QubitId(q)),
                    Op::CX(a, b) => circuit.cx(QubitId(a), QubitId(b)),
                    Op::Measure(q) => circuit.measure(QubitId(q), ClbitId(q)),
                    Op::XIf(q, c) => circuit.x_if(QubitId(q), ClbitId(c)),
                };
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn one_statement_per_instruction(circuit in arb_circuit()) {
        let qasm = emit(&circuit).unwrap();
        let statements = qasm
            .lines()
            .skip_while(|line| !line.is_empty())
            .skip(1)
            .skip_while(|line| !line.is_empty())
            .filter(|line| !line.is_empty())
            .count();
        prop_assert_eq!(statements, circuit.dag().num_ops());
    }

    #[test]
    fn declares_every_wire(circuit in arb_circuit()) {
        let qasm = emit(&circuit).unwrap();
        let qubit_decl = format!("qubit[{}] q;", circuit.num_qubits());
        let bit_decl = format!("bit[{}] c;", circuit.num_clbits());
        prop_assert!(qasm.contains(&qubit_decl));
        prop_assert!(qasm.contains(&bit_decl));
    }
}

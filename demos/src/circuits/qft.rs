//! Quantum Fourier Transform circuits.
//!
//! With the final swaps, `qft(n)` maps |x⟩ to
//! `Σ_k e^{2πi·x·k/2^n} |k⟩ / √2^n` in little-endian qubit order.

use std::f64::consts::PI;

use qalgo_ir::{Circuit, IrResult, QubitId};

use crate::error::{DemoError, DemoResult};

/// Largest register the demo QFT builders accept.
pub const MAX_QFT_QUBITS: u32 = 16;

/// Build the `n`-qubit QFT.
///
/// Works from the highest qubit down: Hadamard on the target, then a
/// controlled phase `π/2^(target-q)` from every lower qubit `q`. With
/// `swaps`, the qubit order is reversed at the end.
pub fn qft(num_qubits: u32, swaps: bool) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size(format!("qft{num_qubits}"), num_qubits, 0);
    for target in (0..num_qubits).rev() {
        circuit.h(QubitId(target))?;
        for control in 0..target {
            circuit.cp(
                PI / f64::from(1u32 << (target - control)),
                QubitId(control),
                QubitId(target),
            )?;
        }
    }
    if swaps {
        swap_registers(&mut circuit, num_qubits)?;
    }
    Ok(circuit)
}

/// Build the inverse `n`-qubit QFT.
///
/// Swaps first, then for each qubit `j` in ascending order the negative
/// phases from every lower qubit followed by a Hadamard on `j`.
pub fn qft_dagger(num_qubits: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size(format!("qft{num_qubits}_dg"), num_qubits, 0);
    swap_registers(&mut circuit, num_qubits)?;
    for target in 0..num_qubits {
        for control in 0..target {
            circuit.cp(
                -PI / f64::from(1u32 << (target - control)),
                QubitId(control),
                QubitId(target),
            )?;
        }
        circuit.h(QubitId(target))?;
    }
    Ok(circuit)
}

fn swap_registers(circuit: &mut Circuit, num_qubits: u32) -> IrResult<()> {
    for q in 0..num_qubits / 2 {
        circuit.swap(QubitId(q), QubitId(num_qubits - 1 - q))?;
    }
    Ok(())
}

/// Apply `X` to every qubit whose bit is set in `value`.
///
/// Bit `k` of `value` selects `qubits[k]`.
pub fn prepare_basis(circuit: &mut Circuit, qubits: &[QubitId], value: u64) -> DemoResult<()> {
    let width = qubits.len();
    if width < 64 && value >> width != 0 {
        return Err(DemoError::InvalidInput(format!(
            "basis state {value} does not fit in {width} qubits"
        )));
    }
    for (k, &qubit) in qubits.iter().enumerate() {
        if (value >> k) & 1 == 1 {
            circuit.x(qubit)?;
        }
    }
    Ok(())
}

/// Check the register size for the demo builders.
pub fn check_qft_size(num_qubits: u32) -> DemoResult<()> {
    if num_qubits == 0 || num_qubits > MAX_QFT_QUBITS {
        return Err(DemoError::InvalidInput(format!(
            "QFT register must have 1..={MAX_QFT_QUBITS} qubits, got {num_qubits}"
        )));
    }
    Ok(())
}

/// Prepare `|input⟩`, apply the QFT with swaps and measure every qubit.
pub fn qft_demo_circuit(num_qubits: u32, input: u64) -> DemoResult<Circuit> {
    check_qft_size(num_qubits)?;
    let mut circuit = Circuit::with_size(format!("qft{num_qubits}_on_{input}"), num_qubits, 0);
    let qubits: Vec<_> = (0..num_qubits).map(QubitId).collect();
    prepare_basis(&mut circuit, &qubits, input)?;
    circuit.compose(&qft(num_qubits, true)?, &qubits, &[])?;
    circuit.measure_all()?;
    Ok(circuit)
}

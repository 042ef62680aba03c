//! Bell-state preparation.
//!
//! `H` followed by `CX` turns |00⟩ into (|00⟩ + |11⟩)/√2, so both qubits
//! always read the same value.

use qalgo_ir::{Circuit, IrResult, QubitId};

/// Build the two-qubit Bell circuit with both qubits measured.
pub fn bell_circuit() -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("bell", 2, 2);
    circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
    circuit.measure_all()?;
    Ok(circuit)
}

//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{ClassicalCondition, Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation, possibly classically conditioned.
    Gate(Gate),
    /// Measurement in the computational basis.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (no effect on the state).
    Barrier,
}

/// A complete instruction with operands.
///
/// For conditional gates `clbits` holds the bits the condition reads, so
/// the DAG orders the gate after the measurements that write them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits written (measure) or read (conditional gate).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        let gate = gate.into();
        let clbits = gate
            .condition
            .as_ref()
            .map(|c| c.clbits.clone())
            .unwrap_or_default();
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits,
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a classically conditioned gate instruction.
    pub fn conditional_gate(
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
        condition: ClassicalCondition,
    ) -> Self {
        Self::gate(Gate::standard(gate).with_condition(condition), qubits)
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a multi-qubit measurement instruction, pairing qubits and bits in order.
    pub fn measure_all(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::RegisterSizeMismatch {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a reset.
    pub fn is_reset(&self) -> bool {
        matches!(self.kind, InstructionKind::Reset)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Check if this is a classically conditioned gate.
    pub fn is_conditional(&self) -> bool {
        self.as_gate().is_some_and(Gate::is_conditional)
    }

    /// Check whether the instruction acts as a unitary (or no-op) on the state.
    pub fn is_unitary(&self) -> bool {
        match &self.kind {
            InstructionKind::Gate(g) => !g.is_conditional(),
            InstructionKind::Barrier => true,
            InstructionKind::Measure | InstructionKind::Reset => false,
        }
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// The adjoint of a unitary instruction.
    pub fn inverse(&self) -> IrResult<Self> {
        match &self.kind {
            InstructionKind::Gate(g) if !g.is_conditional() => {
                Ok(Self::gate(g.kind.inverse(), self.qubits.iter().copied()))
            }
            InstructionKind::Barrier => Ok(self.clone()),
            _ => Err(IrError::NonUnitary(self.name().to_string())),
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert!(inst.is_unitary());
        assert_eq!(inst.qubits.len(), 1);
        assert!(inst.clbits.is_empty());
        assert_eq!(inst.name(), "h");
    }

    #[test]
    fn test_conditional_gate_reads_clbits() {
        let inst = Instruction::conditional_gate(
            StandardGate::X,
            [QubitId(2)],
            ClassicalCondition::bit(ClbitId(1)),
        );
        assert!(inst.is_conditional());
        assert!(!inst.is_unitary());
        assert_eq!(inst.clbits, vec![ClbitId(1)]);
        assert!(matches!(inst.inverse(), Err(IrError::NonUnitary(_))));
    }

    #[test]
    fn test_measure_all_size_mismatch() {
        let err = Instruction::measure_all([QubitId(0), QubitId(1)], [ClbitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::RegisterSizeMismatch {
                qubits: 2,
                clbits: 1
            }
        ));
    }

    #[test]
    fn test_inverse_of_phase() {
        let inst = Instruction::two_qubit_gate(StandardGate::CP(0.5), QubitId(0), QubitId(1));
        let inv = inst.inverse().unwrap();
        assert_eq!(inv.as_gate().unwrap().kind, StandardGate::CP(-0.5));
        assert_eq!(inv.qubits, inst.qubits);

        let m = Instruction::measure(QubitId(0), ClbitId(0));
        assert!(m.inverse().is_err());
    }
}

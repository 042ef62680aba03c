//! High-level circuit builder API.

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{ClassicalCondition, Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId, Register};

/// A quantum circuit.
///
/// Gates are appended through the fluent methods below; every call
/// validates its operands and returns `&mut Self` so calls can be chained
/// with `?`. A circuit is plain data: executing it is the job of a
/// backend.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    qregs: Vec<Register>,
    cregs: Vec<Register>,
    dag: CircuitDag,
    next_qubit_id: u32,
    next_clbit_id: u32,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qregs: vec![],
            cregs: vec![],
            dag: CircuitDag::new(),
            next_qubit_id: 0,
            next_clbit_id: 0,
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Add a single anonymous qubit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        self.dag.add_qubit(id);
        id
    }

    /// Add a named quantum register.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let register = Register::new(name, self.next_qubit_id, size);
        let ids = register.qubits();
        for &id in &ids {
            self.dag.add_qubit(id);
        }
        self.next_qubit_id += size;
        self.qregs.push(register);
        ids
    }

    /// Add a single anonymous classical bit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.next_clbit_id);
        self.next_clbit_id += 1;
        self.dag.add_clbit(id);
        id
    }

    /// Add a named classical register.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let register = Register::new(name, self.next_clbit_id, size);
        let ids = register.clbits();
        for &id in &ids {
            self.dag.add_clbit(id);
        }
        self.next_clbit_id += size;
        self.cregs.push(register);
        ids
    }

    fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(StandardGate::P(theta), qubit))
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(
            StandardGate::U(theta, phi, lambda),
            qubit,
        ))
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CY, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(
            StandardGate::CP(theta),
            control,
            target,
        ))
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(
            StandardGate::CRz(theta),
            control,
            target,
        ))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Classically conditioned gates
    // =========================================================================

    /// Apply a gate only when `condition` holds at execution time.
    pub fn gate_if(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
        condition: ClassicalCondition,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::conditional_gate(gate, qubits, condition))
    }

    /// Apply X to `qubit` when `clbit` reads 1.
    pub fn x_if(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.gate_if(StandardGate::X, [qubit], ClassicalCondition::bit(clbit))
    }

    /// Apply Z to `qubit` when `clbit` reads 1.
    pub fn z_if(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.gate_if(StandardGate::Z, [qubit], ClassicalCondition::bit(clbit))
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure qubits into classical bits pairwise.
    pub fn measure_qubits(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::measure_all(qubits, clbits)?)
    }

    /// Measure every qubit `k` into classical bit `k`, adding bits as needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.num_clbits() < self.num_qubits() {
            self.add_clbit();
        }
        let qubits: Vec<_> = self.dag.qubits().collect();
        let clbits: Vec<_> = self.dag.clbits().take(qubits.len()).collect();
        self.measure_qubits(qubits, clbits)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.dag.qubits().collect();
        self.barrier(qubits)
    }

    // =========================================================================
    // Whole-circuit transforms
    // =========================================================================

    /// Append `other` onto this circuit.
    ///
    /// Qubit `k` of `other` is mapped to `qubits[k]` and classical bit `k`
    /// to `clbits[k]`.
    pub fn compose(
        &mut self,
        other: &Circuit,
        qubits: &[QubitId],
        clbits: &[ClbitId],
    ) -> IrResult<&mut Self> {
        if qubits.len() != other.num_qubits() || clbits.len() != other.num_clbits() {
            return Err(IrError::RegisterSizeMismatch {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        for (_, inst) in other.dag.topological_ops() {
            let mut mapped = inst.clone();
            mapped.qubits = inst.qubits.iter().map(|q| qubits[q.index()]).collect();
            mapped.clbits = inst.clbits.iter().map(|c| clbits[c.index()]).collect();
            if let InstructionKind::Gate(gate) = &mut mapped.kind {
                if let Some(cond) = &mut gate.condition {
                    cond.clbits = cond.clbits.iter().map(|c| clbits[c.index()]).collect();
                }
            }
            self.push(mapped)?;
        }
        Ok(self)
    }

    /// The adjoint circuit: every instruction inverted, in reverse order.
    ///
    /// Fails with [`IrError::NonUnitary`] if the circuit measures, resets or
    /// conditions on classical bits.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let mut inverse = Circuit {
            name: format!("{}_dg", self.name),
            qregs: self.qregs.clone(),
            cregs: self.cregs.clone(),
            dag: CircuitDag::new(),
            next_qubit_id: self.next_qubit_id,
            next_clbit_id: self.next_clbit_id,
        };
        for q in self.dag.qubits() {
            inverse.dag.add_qubit(q);
        }
        for c in self.dag.clbits() {
            inverse.dag.add_clbit(c);
        }

        let ops: Vec<_> = self.dag.topological_ops().map(|(_, inst)| inst).collect();
        for inst in ops.into_iter().rev() {
            inverse.push(inst.inverse()?)?;
        }
        Ok(inverse)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.dag.num_qubits()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.dag.num_clbits()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Number of gate instructions (measurements and barriers excluded).
    pub fn gate_count(&self) -> usize {
        self.instructions().filter(|inst| inst.is_gate()).count()
    }

    /// Check whether the circuit contains only unitary instructions.
    pub fn is_unitary(&self) -> bool {
        self.instructions().all(Instruction::is_unitary)
    }

    /// Check whether the circuit contains any measurement.
    pub fn has_measurements(&self) -> bool {
        self.instructions().any(Instruction::is_measure)
    }

    /// Instructions in execution order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Named quantum registers.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// Named classical registers.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// Display label of a qubit: its register slot if named, `qN` otherwise.
    pub fn qubit_label(&self, qubit: QubitId) -> String {
        self.qregs
            .iter()
            .find_map(|r| r.label(qubit.0))
            .unwrap_or_else(|| qubit.to_string())
    }
}

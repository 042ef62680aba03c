//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Start of a wire.
    In(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            DagNode::In(_) => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

/// An edge in the circuit DAG, carrying one wire from one node to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// Append-only DAG of circuit operations.
///
/// Each wire starts at an `In` node and threads through every operation
/// touching it. Operations are only ever appended, so insertion order is a
/// valid topological order and is the order reported by
/// [`CircuitDag::topological_ops`].
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    qubits: Vec<QubitId>,
    clbits: Vec<ClbitId>,
    /// Last node on each wire.
    wire_front: FxHashMap<WireId, NodeIndex>,
    /// Operation nodes in insertion order.
    op_order: Vec<NodeIndex>,
    /// Layer index of every operation node (1-based).
    layers: FxHashMap<NodeIndex, usize>,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qubit wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        let wire = WireId::Qubit(qubit);
        if self.wire_front.contains_key(&wire) {
            return;
        }
        let node = self.graph.add_node(DagNode::In(wire));
        self.wire_front.insert(wire, node);
        self.qubits.push(qubit);
    }

    /// Add a classical wire. Adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        let wire = WireId::Clbit(clbit);
        if self.wire_front.contains_key(&wire) {
            return;
        }
        let node = self.graph.add_node(DagNode::In(wire));
        self.wire_front.insert(wire, node);
        self.clbits.push(clbit);
    }

    /// Validate and append an instruction.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            _ => None,
        };

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.wire_front.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if !self.wire_front.contains_key(&WireId::Clbit(clbit)) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }

        let wires: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();

        let op_node = self.graph.add_node(DagNode::Op(instruction));

        let mut layer = 0;
        for wire in wires {
            let prev = self.wire_front[&wire];
            layer = layer.max(self.layers.get(&prev).copied().unwrap_or(0));
            self.graph.add_edge(prev, op_node, DagEdge { wire });
            self.wire_front.insert(wire, op_node);
        }

        self.layers.insert(op_node, layer + 1);
        self.op_order.push(op_node);
        Ok(op_node)
    }

    /// Iterate over operations in topological (insertion) order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.op_order
            .iter()
            .filter_map(|&idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Check whether a measurement is the last operation on its qubits.
    ///
    /// Barriers after the measurement are ignored.
    pub fn is_terminal(&self, node: NodeIndex) -> bool {
        let Some(inst) = self.get_instruction(node) else {
            return false;
        };
        let mut stack: Vec<NodeIndex> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|e| matches!(e.weight().wire, WireId::Qubit(q) if inst.qubits.contains(&q)))
            .map(|e| e.target())
            .collect();
        while let Some(next) = stack.pop() {
            match self.graph[next].instruction() {
                Some(later) if later.is_barrier() => stack.extend(
                    self.graph
                        .edges_directed(next, Direction::Outgoing)
                        .filter(|e| matches!(e.weight().wire, WireId::Qubit(q) if inst.qubits.contains(&q)))
                        .map(|e| e.target()),
                ),
                Some(_) => return false,
                None => {}
            }
        }
        true
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.op_order.len()
    }

    /// Count operations by name.
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for (_, inst) in self.topological_ops() {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Calculate the circuit depth (longest chain of operations on any wire path).
    pub fn depth(&self) -> usize {
        self.layers.values().copied().max().unwrap_or(0)
    }

    /// Iterate over qubits in the order they were added.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// Iterate over classical bits in the order they were added.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbits.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{ClassicalCondition, StandardGate};

    fn two_qubit_dag() -> CircuitDag {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_clbits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_add_qubit_twice() {
        let mut dag = two_qubit_dag();
        dag.add_qubit(QubitId(0));
        assert_eq!(dag.num_qubits(), 2);
    }

    #[test]
    fn test_bell_state_depth() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 2);
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = two_qubit_dag();
        let err = dag
            .apply(Instruction::gate(StandardGate::CX, [QubitId(0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut dag = two_qubit_dag();
        let err = dag
            .apply(Instruction::single_qubit_gate(StandardGate::X, QubitId(5)))
            .unwrap_err();
        assert_eq!(err.to_string(), "Qubit q5 not found in circuit (gate: x)");
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut dag = two_qubit_dag();
        let err = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CZ,
                QubitId(1),
                QubitId(1),
            ))
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_conditional_gate_follows_measurement() {
        let mut dag = two_qubit_dag();
        dag.add_clbit(ClbitId(0));

        let m = dag
            .apply(Instruction::measure(QubitId(0), ClbitId(0)))
            .unwrap();
        dag.apply(Instruction::conditional_gate(
            StandardGate::X,
            [QubitId(1)],
            ClassicalCondition::bit(ClbitId(0)),
        ))
        .unwrap();

        // The condition on c0 orders the X after the measure.
        assert_eq!(dag.depth(), 2);
        assert!(dag.is_terminal(m));
    }

    #[test]
    fn test_terminal_measurement_detection() {
        let mut dag = two_qubit_dag();
        dag.add_clbit(ClbitId(0));

        let m = dag
            .apply(Instruction::measure(QubitId(0), ClbitId(0)))
            .unwrap();
        dag.apply(Instruction::barrier([QubitId(0), QubitId(1)]))
            .unwrap();
        assert!(dag.is_terminal(m));

        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        assert!(!dag.is_terminal(m));
    }

    #[test]
    fn test_count_ops() {
        let mut dag = two_qubit_dag();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        let counts = dag.count_ops();
        assert_eq!(counts["h"], 2);
        assert_eq!(counts["cx"], 1);
    }
}

//! Qubit and classical bit addressing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Index of a qubit within a circuit.
///
/// Qubit `k` contributes `2^k` to a computational basis index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The qubit index as a `usize`, for addressing amplitude bits.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl TryFrom<usize> for QubitId {
    type Error = IrError;

    fn try_from(id: usize) -> IrResult<Self> {
        u32::try_from(id)
            .map(QubitId)
            .map_err(|_| IrError::IndexOverflow(id))
    }
}

/// Index of a classical bit within a circuit.
///
/// Bit `k` contributes `2^k` to the integer value of the classical register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// The bit index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

impl TryFrom<usize> for ClbitId {
    type Error = IrError;

    fn try_from(id: usize) -> IrResult<Self> {
        u32::try_from(id)
            .map(ClbitId)
            .map_err(|_| IrError::IndexOverflow(id))
    }
}

/// A named, contiguous slice of a circuit's qubits or classical bits.
///
/// Registers only label wires; addressing always goes through
/// [`QubitId`] / [`ClbitId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Register name, e.g. `"counting"`.
    pub name: String,
    /// Index of the first wire in the register.
    pub start: u32,
    /// Number of wires.
    pub size: u32,
}

impl Register {
    /// Create a register covering `start..start + size`.
    pub fn new(name: impl Into<String>, start: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            start,
            size,
        }
    }

    /// Check whether a wire index belongs to this register.
    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index < self.start + self.size
    }

    /// Label for a wire index, e.g. `bob[0]`, if it belongs here.
    pub fn label(&self, index: u32) -> Option<String> {
        self.contains(index)
            .then(|| format!("{}[{}]", self.name, index - self.start))
    }

    /// The qubit ids covered by this register.
    pub fn qubits(&self) -> Vec<QubitId> {
        (self.start..self.start + self.size).map(QubitId).collect()
    }

    /// The classical bit ids covered by this register.
    pub fn clbits(&self) -> Vec<ClbitId> {
        (self.start..self.start + self.size).map(ClbitId).collect()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(QubitId(3).to_string(), "q3");
        assert_eq!(ClbitId(0).to_string(), "c0");
    }

    #[test]
    fn test_id_from_usize() {
        assert_eq!(QubitId::try_from(7usize).unwrap(), QubitId(7));
        assert_eq!(ClbitId::try_from(2usize).unwrap().index(), 2);
    }

    #[test]
    fn test_register_labels() {
        let reg = Register::new("counting", 2, 3);
        assert_eq!(reg.label(2).as_deref(), Some("counting[0]"));
        assert_eq!(reg.label(4).as_deref(), Some("counting[2]"));
        assert!(reg.label(5).is_none());
        assert_eq!(reg.qubits(), vec![QubitId(2), QubitId(3), QubitId(4)]);
        assert_eq!(reg.to_string(), "counting[3]");
    }
}

//! Error types for the QASM3 emitter.

use thiserror::Error;

/// Errors that can occur while emitting a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// A classical condition that reads no bits.
    #[error("Gate '{0}' carries a condition over zero classical bits")]
    EmptyCondition(String),

    /// A condition value with bits set beyond the condition's width.
    #[error("Condition value {value} does not fit in {width} bit(s)")]
    ConditionOverflow {
        /// The compared value.
        value: u64,
        /// Number of bits the condition reads.
        width: usize,
    },
}

/// Result type for emitting.
pub type EmitResult<T> = Result<T, EmitError>;

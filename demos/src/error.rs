//! Error types for the demos crate.

use qalgo_hal::HalError;
use qalgo_ir::IrError;
use qalgo_qasm3::EmitError;
use thiserror::Error;

/// Errors raised while building, running or configuring a demo.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DemoError {
    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// The backend rejected or failed the circuit.
    #[error("Backend error: {0}")]
    Hal(#[from] HalError),

    /// The circuit could not be rendered as OpenQASM.
    #[error("QASM emission error: {0}")]
    Emit(#[from] EmitError),

    /// A demo parameter is out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend returned an empty distribution.
    #[error("Backend returned no measurement outcomes")]
    NoCounts,

    /// The demo configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;

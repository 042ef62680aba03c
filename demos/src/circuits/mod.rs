//! Circuit builders for the demos.
//!
//! Builders only describe circuits; nothing here executes them.

pub mod bell;
pub mod qft;
pub mod qpe;
pub mod teleport;

pub use bell::bell_circuit;
pub use qft::{prepare_basis, qft, qft_dagger, qft_demo_circuit};
pub use qpe::{PhaseTarget, qpe_circuit};
pub use teleport::{
    CorrectionMode, MeasureBasis, TeleportInput, teleport_circuit, teleport_circuit_in_basis,
};

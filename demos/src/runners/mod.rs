//! Demo runners: execute a builder's circuit and summarise the outcome.

pub mod bell;
pub mod qft;
pub mod qpe;
pub mod teleport;

pub use bell::{BellReport, BellRunner};
pub use qft::{AmplitudeRow, QftReport, QftRunner, fourier_state};
pub use qpe::{QpeReport, QpeRunner};
pub use teleport::{BasisCheck, BlochComparison, TeleportReport, TeleportRunner};

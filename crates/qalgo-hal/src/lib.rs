//! qalgo Hardware Abstraction Layer
//!
//! The contract between circuit-building code and whatever executes
//! circuits. The demos only ever talk to a backend through these traits,
//! so the simulator can be swapped without touching them.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for validating and running circuits
//! - [`StatevectorBackend`] for backends that expose final amplitudes
//! - [`Capabilities`] to describe what a backend can run
//! - Result types: [`ExecutionResult`], [`Counts`], [`StatevectorResult`]
//!   and [`BlochVector`]
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use qalgo_hal::Backend;
//! use qalgo_adapter_sim::SimulatorBackend;
//! use qalgo_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! let result = backend.run(&circuit, 1024)?;
//!
//! if let Some((bitstring, count)) = result.counts.most_frequent() {
//!     println!("Most frequent: {bitstring} ({count} times)");
//! }
//! ```
//!
//! # Bitstring Order
//!
//! Count keys list the highest classical bit first, so `"001"` means
//! `c[0] = 1` and reads as the integer 1. Amplitude indices are little
//! endian in the same way: qubit `k` contributes `2^k`.

pub mod backend;
pub mod capability;
pub mod error;
pub mod result;
pub mod statevector;

pub use backend::{Backend, BackendConfig, BackendFactory, StatevectorBackend, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use result::{Counts, ExecutionResult};
pub use statevector::{BlochVector, StatevectorResult};

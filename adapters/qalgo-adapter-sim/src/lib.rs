//! qalgo Local Statevector Simulator
//!
//! Exact statevector simulation behind the [`qalgo_hal::Backend`] and
//! [`qalgo_hal::StatevectorBackend`] traits.
//!
//! # Execution Model
//!
//! - Circuits whose measurements are all terminal are simulated once and
//!   the final distribution is sampled `shots` times.
//! - Circuits with mid-circuit measurement, reset or classically
//!   conditioned gates run one trajectory per shot, collapsing the state at
//!   every measurement and evaluating conditions against the classical
//!   register built so far. The unitary prefix is shared between shots.
//!
//! # Memory
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//!
//! # Example
//!
//! ```rust
//! use qalgo_adapter_sim::SimulatorBackend;
//! use qalgo_hal::Backend;
//! use qalgo_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! let result = backend.run(&circuit, 1000)?;
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};

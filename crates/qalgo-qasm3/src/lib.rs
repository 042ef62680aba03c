//! `OpenQASM` 3 emitter for qalgo circuits
//!
//! Renders a [`qalgo_ir::Circuit`] as `OpenQASM` 3.0 source so a demo can
//! print the program it is about to run.
//!
//! # Supported Features
//!
//! | Feature | Example |
//! |---------|---------|
//! | Version and stdgates include | `OPENQASM 3.0;` |
//! | Qubit declarations | `qubit[3] q;`, `qubit[1] msg;` |
//! | Classical bits | `bit[3] c;` |
//! | Standard gates | `h q[0];`, `cx q[0], q[1];` |
//! | Angles as pi fractions | `cp(pi/4) q[0], q[3];` |
//! | Measurements | `c[0] = measure q[0];` |
//! | Classical conditions | `if (c[1] == 1) x q[2];` |
//! | Barriers and reset | `barrier q[0], q[1];` |
//!
//! # Example
//!
//! ```rust
//! use qalgo_ir::{Circuit, QubitId};
//! use qalgo_qasm3::emit;
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
//!
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.contains("OPENQASM 3.0;"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! # Ok::<(), qalgo_ir::IrError>(())
//! ```

mod emitter;
mod error;

pub use emitter::emit;
pub use error::{EmitError, EmitResult};

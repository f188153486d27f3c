//! Circuit intermediate representation for benchpress.
//!
//! A [`Circuit`] is an ordered list of [`Instruction`]s over a fixed set of
//! qubits and classical bits. It is what the corpus loader produces, what a
//! compiler consumes and returns, and what the validator and the metric
//! extractors inspect.
//!
//! # Example
//!
//! ```rust
//! use benchpress_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.gate_count("cx"), 1);
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod analysis;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{Circuit, Register};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, Gate, GateKind, GateSignature, OpaqueGate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};

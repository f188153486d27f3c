//! Compilers for benchpress.
//!
//! Everything the harness needs from a compiler is the [`Compiler`] trait:
//! borrow a circuit, return a new one for a [`Backend`](benchpress_target::Backend)
//! at an [`OptimizationLevel`]. Two implementations ship here:
//!
//! - [`BaselineCompiler`]: a small in-tree pipeline (unroll, trivial layout,
//!   shortest-path routing, basis translation, peephole clean-up) so the
//!   suite runs without any third-party toolchain
//! - [`ExternalCompiler`]: any program that reads OpenQASM on stdin and writes
//!   the compiled OpenQASM on stdout
//!
//! # Example
//!
//! ```rust
//! use benchpress_compile::{BaselineCompiler, Compiler, OptimizationLevel};
//! use benchpress_ir::{Circuit, QubitId};
//! use benchpress_target::{Backend, TopologySpec};
//!
//! let mut circuit = Circuit::with_size("far", 4, 0);
//! circuit.cx(QubitId(0), QubitId(3)).unwrap();
//!
//! let backend = Backend::flexible(4, &TopologySpec::Line).unwrap();
//! let compiled = BaselineCompiler
//!     .compile(&circuit, &backend, OptimizationLevel::O1)
//!     .unwrap();
//! assert!(compiled.gate_count("cz") > 1);
//! ```

pub mod baseline;
pub mod compiler;
mod decompose;
pub mod error;
pub mod external;
pub mod level;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod property;

pub use baseline::BaselineCompiler;
pub use compiler::Compiler;
pub use error::{CompileError, CompileResult};
pub use external::ExternalCompiler;
pub use level::OptimizationLevel;
pub use manager::PassManager;
pub use pass::{Pass, PassKind};
pub use property::{Layout, PropertySet};

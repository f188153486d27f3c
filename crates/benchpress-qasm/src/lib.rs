//! OpenQASM corpus loader for benchpress.
//!
//! Reads the OpenQASM 2.0 files that make up the benchmark corpora, plus the
//! OpenQASM 3 subset that newer corpora use, into [`benchpress_ir::Circuit`]s.
//! Circuits can be written back out as OpenQASM 2.0 with [`emit_qasm2`], which
//! is how circuits are handed to external compilers.
//!
//! | Feature | Example |
//! |---------|---------|
//! | Registers | `qreg q[5];`, `qubit[5] q;`, `creg c[5];`, `bit[5] c;` |
//! | Standard gates | `h q[0];`, `cu1(pi/4) q[0], q[1];` |
//! | Broadcasting | `h q;`, `cx a, b;` |
//! | Gate definitions | `gate maj a, b, c { cx c, b; cx c, a; ccx a, b, c; }` |
//! | Opaque gates | `opaque magic a, b;` |
//! | Conditions | `if (c == 1) x q[0];` |
//! | Measurement | `measure q -> c;`, `c = measure q;` |
//!
//! # Example
//!
//! ```rust
//! use benchpress_qasm::{emit_qasm2, parse};
//!
//! let circuit = parse(r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#).unwrap();
//!
//! assert_eq!(circuit.gate_count("cx"), 1);
//! assert_eq!(parse(&emit_qasm2(&circuit)).unwrap(), circuit);
//! ```

pub mod ast;
mod emitter;
mod error;
mod lexer;
mod loader;
mod parser;

pub use emitter::emit_qasm2;
pub use error::{ParseError, ParseResult};
pub use loader::{LoadedCircuit, load_qasm_file};
pub use parser::{parse, parse_ast};

//! Error types for compilation.

use benchpress_ir::IrError;
use benchpress_qasm::ParseError;
use thiserror::Error;

/// Errors raised by a compiler.
///
/// A compile failure is a benchmark failure: callers propagate it unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Routing ran before a layout was chosen.
    #[error("Missing layout: run a layout pass first")]
    MissingLayout,

    /// The circuit has more qubits than the target.
    #[error("Circuit requires {required} qubits but target has {available}")]
    CircuitTooLarge { required: usize, available: u32 },

    /// No path between two physical qubits.
    #[error("Routing failed: no path between physical qubits {qubit1} and {qubit2}")]
    RoutingFailed { qubit1: u32, qubit2: u32 },

    /// The target's native gate set cannot be reached.
    #[error("Unsupported target: {0}")]
    UnsupportedTarget(String),

    /// A gate the compiler has no decomposition for.
    #[error("Cannot decompose gate '{name}' on {num_qubits} qubits")]
    UnsupportedGate { name: String, num_qubits: u32 },

    /// The external compiler could not be started or talked to.
    #[error("Failed to run external compiler '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external compiler exited unsuccessfully.
    #[error("External compiler '{command}' failed ({status}): {stderr}")]
    External {
        command: String,
        status: String,
        stderr: String,
    },

    /// The backend could not be serialized for the external compiler.
    #[error("Failed to serialize backend: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Compiler output is not a valid circuit.
    #[error("Invalid compiler output: {0}")]
    Output(#[from] ParseError),

    /// Building the output circuit failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

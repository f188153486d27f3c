//! Configuration errors raised while resolving targets.

use thiserror::Error;

/// A requested backend, topology or qubit count that cannot be satisfied.
///
/// Raised before any compilation is attempted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The topology has fewer qubit slots than the circuit needs.
    #[error("Topology '{topology}' has {slots} qubits, but {required} are required")]
    TopologyTooSmall {
        topology: String,
        slots: u32,
        required: u32,
    },

    /// A backend was requested for zero qubits.
    #[error("A backend needs at least one qubit")]
    EmptyBackend,

    /// No backend is registered under this name.
    #[error("Unknown backend '{name}' (available: {})", available.join(", "))]
    UnknownBackend {
        name: String,
        available: Vec<String>,
    },

    /// The backend is smaller than the circuit.
    #[error("Backend '{backend}' has {available} qubits, but the circuit needs {required}")]
    InsufficientQubits {
        backend: String,
        available: u32,
        required: u32,
    },

    /// Malformed topology description.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// The two-qubit gate is not a known two-qubit gate.
    #[error("'{0}' is not a two-qubit gate")]
    InvalidTwoQubitGate(String),
}

/// Result type for target resolution.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

//! Error types for the corpus loader.

use std::path::PathBuf;

use benchpress_ir::IrError;
use thiserror::Error;

/// Errors that can occur while reading or parsing a circuit file.
///
/// Every syntax or semantic error carries the 1-based source line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The file could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Missing or unsupported version header.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Include of a file other than the standard gate libraries.
    #[error("Line {line}: cannot include '{file}'")]
    UnsupportedInclude { line: usize, file: String },

    /// Undefined identifier.
    #[error("Line {line}: undefined identifier '{name}'")]
    UndefinedIdentifier { line: usize, name: String },

    /// Duplicate declaration.
    #[error("Line {line}: '{name}' is already declared")]
    DuplicateDeclaration { line: usize, name: String },

    /// Unknown gate.
    #[error("Line {line}: unknown gate '{name}'")]
    UnknownGate { line: usize, name: String },

    /// Wrong number of qubit arguments.
    #[error("Line {line}: gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        line: usize,
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of parameters.
    #[error("Line {line}: gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        line: usize,
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Index out of bounds.
    #[error("Line {line}: index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        line: usize,
        register: String,
        index: u64,
        size: u32,
    },

    /// Register operands of different sizes in one broadcast statement.
    #[error("Line {line}: register sizes {left} and {right} do not match")]
    RegisterSizeMismatch {
        line: usize,
        left: usize,
        right: usize,
    },

    /// Parameter expression that cannot be evaluated.
    #[error("Line {line}: {message}")]
    Expression { line: usize, message: String },

    /// Construct outside the supported subset.
    #[error("Line {line}: unsupported construct: {what}")]
    Unsupported { line: usize, what: String },

    /// IR error during circuit construction.
    #[error("Line {line}: {source}")]
    CircuitError {
        line: usize,
        #[source]
        source: IrError,
    },
}

impl ParseError {
    /// Source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io { .. }
            | ParseError::UnexpectedEof(_)
            | ParseError::InvalidVersion(_) => None,
            ParseError::LexerError { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UnsupportedInclude { line, .. }
            | ParseError::UndefinedIdentifier { line, .. }
            | ParseError::DuplicateDeclaration { line, .. }
            | ParseError::UnknownGate { line, .. }
            | ParseError::WrongQubitCount { line, .. }
            | ParseError::WrongParameterCount { line, .. }
            | ParseError::IndexOutOfBounds { line, .. }
            | ParseError::RegisterSizeMismatch { line, .. }
            | ParseError::Expression { line, .. }
            | ParseError::Unsupported { line, .. }
            | ParseError::CircuitError { line, .. } => Some(*line),
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

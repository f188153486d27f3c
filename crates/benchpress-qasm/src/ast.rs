//! Abstract syntax tree for OpenQASM programs.

/// A parsed program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Version string from the header, e.g. `2.0`.
    pub version: String,
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

/// A statement tagged with the line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub line: usize,
}

/// Top-level statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `include "file";`
    Include(String),
    /// `qreg q[n];` or `qubit[n] q;`
    QuantumDecl { name: String, size: u32 },
    /// `creg c[n];` or `bit[n] c;`
    ClassicalDecl { name: String, size: u32 },
    /// `gate name(params) qubits { body }`
    GateDef(GateDef),
    /// `opaque name(params) qubits;`
    OpaqueDef {
        name: String,
        params: Vec<String>,
        qubits: Vec<String>,
    },
    /// Gate application.
    GateCall(GateCall),
    /// `measure q -> c;` or `c = measure q;`
    Measure { qubits: Operand, clbits: Operand },
    /// `reset q;`
    Reset(Operand),
    /// `barrier q, r;`
    Barrier(Vec<Operand>),
    /// `if (c == n) qop;`
    If {
        register: String,
        value: u64,
        body: Box<Statement>,
    },
}

/// A user gate definition.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDef {
    pub name: String,
    pub params: Vec<String>,
    pub qubits: Vec<String>,
    pub body: Vec<GateCall>,
}

/// A gate application.
#[derive(Debug, Clone, PartialEq)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub args: Vec<Operand>,
    pub line: usize,
}

/// A register, or a single bit of one.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub name: String,
    pub index: Option<u64>,
}

impl Operand {
    /// A whole register.
    pub fn register(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    /// One element of a register.
    pub fn indexed(name: impl Into<String>, index: u64) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}

/// Constant parameter expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Int(u64),
    Float(f64),
    Pi,
    Tau,
    Euler,
    Identifier(String),
    Neg(Box<Expression>),
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    FnCall {
        name: String,
        args: Vec<Expression>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Standard gates with known semantics.
///
/// Angles are concrete radians; benchmark circuits never carry free parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Echoed cross-resonance gate.
    ECR,
    /// Controlled rotation around X.
    CRx(f64),
    /// Controlled rotation around Y.
    CRy(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),
    /// Controlled U gate without global phase.
    CU3(f64, f64, f64),
    /// Controlled sqrt(X).
    CSX,
    /// XX Ising interaction.
    RXX(f64),
    /// YY Ising interaction.
    RYY(f64),
    /// ZZ Ising interaction.
    RZZ(f64),
    /// ZX cross-resonance interaction.
    RZX(f64),

    // Three-qubit gates
    /// Toffoli gate.
    CCX,
    /// Fredkin gate.
    CSwap,
}

impl StandardGate {
    /// Canonical lower-case name, as written in OpenQASM.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(..) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::ECR => "ecr",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::CU3(..) => "cu3",
            StandardGate::CSX => "csx",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::RZX(_) => "rzx",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Number of qubits this gate acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(..) => 1,
            StandardGate::CCX | StandardGate::CSwap => 3,
            _ => 2,
        }
    }

    /// Angle parameters in declaration order.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(a)
            | StandardGate::Ry(a)
            | StandardGate::Rz(a)
            | StandardGate::P(a)
            | StandardGate::CRx(a)
            | StandardGate::CRy(a)
            | StandardGate::CRz(a)
            | StandardGate::CP(a)
            | StandardGate::RXX(a)
            | StandardGate::RYY(a)
            | StandardGate::RZZ(a)
            | StandardGate::RZX(a) => vec![a],
            StandardGate::U(a, b, c) | StandardGate::CU3(a, b, c) => vec![a, b, c],
            _ => vec![],
        }
    }

    /// Look up the signature of a gate name, including the usual OpenQASM aliases.
    pub fn signature(name: &str) -> Option<GateSignature> {
        let (params, qubits) = match name {
            "id" | "i" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" | "sxdg" => {
                (0, 1)
            }
            "rx" | "ry" | "rz" | "p" | "phase" | "u1" => (1, 1),
            "u2" => (2, 1),
            "u" | "u3" | "U" => (3, 1),
            "cx" | "CX" | "cnot" | "cy" | "cz" | "ch" | "swap" | "iswap" | "ecr" | "csx" => (0, 2),
            "crx" | "cry" | "crz" | "cp" | "cphase" | "cu1" | "rxx" | "ryy" | "rzz" | "rzx" => {
                (1, 2)
            }
            "cu3" => (3, 2),
            "ccx" | "toffoli" | "cswap" | "fredkin" => (0, 3),
            _ => return None,
        };
        Some(GateSignature { params, qubits })
    }

    /// Build a standard gate from a name and its evaluated parameters.
    ///
    /// Returns `None` for unknown names or a wrong parameter count.
    pub fn from_name(name: &str, params: &[f64]) -> Option<Self> {
        let gate = match (name, params) {
            ("id" | "i", []) => StandardGate::I,
            ("x", []) => StandardGate::X,
            ("y", []) => StandardGate::Y,
            ("z", []) => StandardGate::Z,
            ("h", []) => StandardGate::H,
            ("s", []) => StandardGate::S,
            ("sdg", []) => StandardGate::Sdg,
            ("t", []) => StandardGate::T,
            ("tdg", []) => StandardGate::Tdg,
            ("sx", []) => StandardGate::SX,
            ("sxdg", []) => StandardGate::SXdg,
            ("rx", &[a]) => StandardGate::Rx(a),
            ("ry", &[a]) => StandardGate::Ry(a),
            ("rz", &[a]) => StandardGate::Rz(a),
            ("p" | "phase" | "u1", &[a]) => StandardGate::P(a),
            ("u2", &[phi, lambda]) => StandardGate::U(FRAC_PI_2, phi, lambda),
            ("u" | "u3" | "U", &[theta, phi, lambda]) => StandardGate::U(theta, phi, lambda),
            ("cx" | "CX" | "cnot", []) => StandardGate::CX,
            ("cy", []) => StandardGate::CY,
            ("cz", []) => StandardGate::CZ,
            ("ch", []) => StandardGate::CH,
            ("swap", []) => StandardGate::Swap,
            ("iswap", []) => StandardGate::ISwap,
            ("ecr", []) => StandardGate::ECR,
            ("csx", []) => StandardGate::CSX,
            ("crx", &[a]) => StandardGate::CRx(a),
            ("cry", &[a]) => StandardGate::CRy(a),
            ("crz", &[a]) => StandardGate::CRz(a),
            ("cp" | "cphase" | "cu1", &[a]) => StandardGate::CP(a),
            ("cu3", &[theta, phi, lambda]) => StandardGate::CU3(theta, phi, lambda),
            ("rxx", &[a]) => StandardGate::RXX(a),
            ("ryy", &[a]) => StandardGate::RYY(a),
            ("rzz", &[a]) => StandardGate::RZZ(a),
            ("rzx", &[a]) => StandardGate::RZX(a),
            ("ccx" | "toffoli", []) => StandardGate::CCX,
            ("cswap" | "fredkin", []) => StandardGate::CSwap,
            _ => return None,
        };
        Some(gate)
    }
}

/// Parameter and qubit counts of a named gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSignature {
    /// Number of angle parameters.
    pub params: usize,
    /// Number of qubit operands.
    pub qubits: u32,
}

/// A gate the IR has no semantics for, kept by name.
///
/// Produced for `opaque` declarations and for unknown operations in compiler output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueGate {
    /// Gate name.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: u32,
    /// Evaluated parameters.
    pub params: Vec<f64>,
}

impl OpaqueGate {
    /// Create a new opaque gate.
    pub fn new(name: impl Into<String>, num_qubits: u32, params: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params,
        }
    }
}

/// The kind of gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate.
    Standard(StandardGate),
    /// An opaque gate.
    Opaque(OpaqueGate),
}

impl GateKind {
    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Opaque(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Opaque(g) => g.num_qubits,
        }
    }

    /// Get the parameters.
    pub fn params(&self) -> Vec<f64> {
        match self {
            GateKind::Standard(g) => g.params(),
            GateKind::Opaque(g) => g.params.clone(),
        }
    }
}

/// Classical condition for a gate: apply only if `register == value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalCondition {
    /// The name of the classical register.
    pub register: String,
    /// The value to compare against.
    pub value: u64,
}

impl ClassicalCondition {
    /// Create a new classical condition.
    pub fn new(register: impl Into<String>, value: u64) -> Self {
        Self {
            register: register.into(),
            value,
        }
    }
}

/// A gate with an optional classical condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The gate kind.
    pub kind: GateKind,
    /// Classical condition, if any.
    pub condition: Option<ClassicalCondition>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            condition: None,
        }
    }

    /// Create a new opaque gate.
    pub fn opaque(gate: OpaqueGate) -> Self {
        Self {
            kind: GateKind::Opaque(gate),
            condition: None,
        }
    }

    /// Attach a classical condition.
    #[must_use]
    pub fn with_condition(mut self, condition: ClassicalCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// The standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            GateKind::Opaque(_) => None,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

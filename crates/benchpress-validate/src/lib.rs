//! Validation of compiled circuits.
//!
//! A compiled circuit conforms to a backend when it fits on the device, every
//! gate is native, and every two-qubit gate acts on a coupled pair.
//! Measurements, resets, barriers and delays are accepted on any qubit.
//!
//! Validation never fails with an error: a non-conforming circuit yields a
//! [`ValidationReport`] listing each [`Violation`].
//!
//! ```rust
//! use benchpress_ir::{Circuit, QubitId};
//! use benchpress_target::{Backend, TopologySpec};
//! use benchpress_validate::circuit_validator;
//!
//! let backend = Backend::flexible(3, &TopologySpec::Line).unwrap();
//! let mut circuit = Circuit::with_size("far", 3, 0);
//! circuit.cz(QubitId(0), QubitId(2)).unwrap();
//! assert!(!circuit_validator(&circuit, &backend));
//! ```

use std::fmt;

use benchpress_ir::{Circuit, Instruction};
use benchpress_target::Backend;
use serde::Serialize;
use tracing::debug;

/// One way a circuit fails to conform to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Violation {
    /// The circuit declares more qubits than the backend has.
    CircuitTooWide { circuit_qubits: u32, backend_qubits: u32 },
    /// An operation names a qubit the backend does not have.
    QubitOutOfRange { index: usize, gate: String, qubit: u32 },
    /// A gate on three or more qubits.
    TooManyQubits { index: usize, gate: String, num_qubits: u32 },
    /// A two-qubit gate on an uncoupled pair.
    DisconnectedPair { index: usize, gate: String, pair: (u32, u32) },
    /// A gate outside the native set.
    UnsupportedGate { index: usize, gate: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::CircuitTooWide {
                circuit_qubits,
                backend_qubits,
            } => write!(
                f,
                "circuit has {circuit_qubits} qubits but the backend has {backend_qubits}"
            ),
            Violation::QubitOutOfRange { index, gate, qubit } => {
                write!(f, "#{index} {gate}: qubit {qubit} is not on the backend")
            }
            Violation::TooManyQubits {
                index,
                gate,
                num_qubits,
            } => write!(f, "#{index} {gate}: acts on {num_qubits} qubits"),
            Violation::DisconnectedPair { index, gate, pair } => write!(
                f,
                "#{index} {gate}: qubits {} and {} are not coupled",
                pair.0, pair.1
            ),
            Violation::UnsupportedGate { index, gate } => {
                write!(f, "#{index} {gate}: not a native gate")
            }
        }
    }
}

/// Outcome of validating one circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// True when there are no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations in circuit order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violations.as_slice() {
            [] => write!(f, "valid"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more)", rest.len()),
        }
    }
}

/// Instructions accepted on any backend.
const ALWAYS_ALLOWED: &[&str] = &["measure", "reset", "barrier", "delay"];

/// Check `circuit` against `backend`.
pub fn validate(circuit: &Circuit, backend: &Backend) -> ValidationReport {
    let mut violations = Vec::new();
    let circuit_qubits = circuit.num_qubits() as u32;
    if circuit_qubits > backend.num_qubits() {
        violations.push(Violation::CircuitTooWide {
            circuit_qubits,
            backend_qubits: backend.num_qubits(),
        });
    }

    for (index, instruction) in circuit.instructions().iter().enumerate() {
        check_instruction(index, instruction, backend, &mut violations);
    }

    if !violations.is_empty() {
        debug!(
            "{} on {}: {} violations",
            circuit.name(),
            backend.name(),
            violations.len()
        );
    }
    ValidationReport { violations }
}

fn check_instruction(
    index: usize,
    instruction: &Instruction,
    backend: &Backend,
    violations: &mut Vec<Violation>,
) {
    let name = instruction.name();
    let mut in_range = true;
    for qubit in &instruction.qubits {
        if qubit.0 >= backend.num_qubits() {
            in_range = false;
            violations.push(Violation::QubitOutOfRange {
                index,
                gate: name.to_string(),
                qubit: qubit.0,
            });
        }
    }

    if !instruction.is_gate() || ALWAYS_ALLOWED.contains(&name) {
        return;
    }

    if !backend.supports(name) {
        violations.push(Violation::UnsupportedGate {
            index,
            gate: name.to_string(),
        });
    }

    match instruction.qubits.as_slice() {
        [a, b] if in_range && !backend.is_connected(a.0, b.0) => {
            violations.push(Violation::DisconnectedPair {
                index,
                gate: name.to_string(),
                pair: (a.0, b.0),
            });
        }
        qubits if qubits.len() > 2 => violations.push(Violation::TooManyQubits {
            index,
            gate: name.to_string(),
            num_qubits: qubits.len() as u32,
        }),
        _ => {}
    }
}

/// True when `circuit` conforms to `backend`.
pub fn circuit_validator(circuit: &Circuit, backend: &Backend) -> bool {
    validate(circuit, backend).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchpress_ir::{ClbitId, QubitId, StandardGate};
    use benchpress_target::TopologySpec;

    fn ring(n: u32) -> Backend {
        Backend::flexible(n, &TopologySpec::Ring).unwrap()
    }

    #[test]
    fn test_adjacent_native_circuit_valid() {
        let backend = ring(5);
        let mut circuit = Circuit::with_size("ok", 5, 1);
        circuit.rz(0.3, QubitId(0)).unwrap();
        circuit.sx(QubitId(0)).unwrap();
        circuit.cz(QubitId(4), QubitId(0)).unwrap();
        circuit.cz(QubitId(2), QubitId(3)).unwrap();
        circuit.barrier([QubitId(0), QubitId(2)]).unwrap();
        circuit.reset(QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();

        let report = validate(&circuit, &backend);
        assert!(report.is_valid(), "{report}");
        assert!(circuit_validator(&circuit, &backend));
    }

    #[test]
    fn test_disconnected_pair_rejected() {
        let backend = ring(5);
        let mut circuit = Circuit::with_size("bad", 5, 0);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        circuit.cz(QubitId(0), QubitId(2)).unwrap();

        let report = validate(&circuit, &backend);
        assert_eq!(
            report.violations(),
            [Violation::DisconnectedPair {
                index: 1,
                gate: "cz".into(),
                pair: (0, 2)
            }]
        );
        assert_eq!(report.to_string(), "#1 cz: qubits 0 and 2 are not coupled");
    }

    #[test]
    fn test_non_native_gate_rejected() {
        let backend = ring(3);
        let mut circuit = Circuit::with_size("h", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let report = validate(&circuit, &backend);
        assert_eq!(report.violations().len(), 2);
        assert!(matches!(
            report.violations()[0],
            Violation::UnsupportedGate { index: 0, .. }
        ));
        assert!(report.to_string().ends_with("(and 1 more)"));
    }

    #[test]
    fn test_too_wide_and_out_of_range() {
        let backend = ring(3);
        let mut circuit = Circuit::with_size("wide", 4, 0);
        circuit.cz(QubitId(2), QubitId(3)).unwrap();
        let report = validate(&circuit, &backend);
        assert_eq!(
            report.violations(),
            [
                Violation::CircuitTooWide {
                    circuit_qubits: 4,
                    backend_qubits: 3
                },
                Violation::QubitOutOfRange {
                    index: 0,
                    gate: "cz".into(),
                    qubit: 3
                },
            ]
        );
    }

    #[test]
    fn test_three_qubit_gate_rejected() {
        let backend = Backend::flexible(3, &TopologySpec::Full)
            .unwrap()
            .with_native_gates("cx", ["u", "ccx"])
            .unwrap();
        let mut circuit = Circuit::with_size("ccx", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        let report = validate(&circuit, &backend);
        assert!(matches!(
            report.violations(),
            [Violation::TooManyQubits { num_qubits: 3, .. }]
        ));

        let mut circuit = Circuit::with_size("cswap", 3, 0);
        circuit
            .gate(StandardGate::CSwap, [QubitId(0), QubitId(1), QubitId(2)])
            .unwrap();
        assert_eq!(validate(&circuit, &backend).violations().len(), 2);
    }

    #[test]
    fn test_report_serializes() {
        let backend = ring(4);
        let mut circuit = Circuit::with_size("bad", 4, 0);
        circuit.cz(QubitId(0), QubitId(2)).unwrap();
        let json = serde_json::to_value(validate(&circuit, &backend)).unwrap();
        assert_eq!(json["violations"][0]["kind"], "disconnected_pair");
        assert_eq!(json["violations"][0]["pair"][1], 2);
    }
}

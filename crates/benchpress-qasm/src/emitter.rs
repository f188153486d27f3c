//! OpenQASM 2.0 emitter.

use std::collections::BTreeMap;
use std::fmt::Write;

use benchpress_ir::{Circuit, ClbitId, GateKind, Instruction, InstructionKind, QubitId};

/// Definitions for gates outside `qelib1.inc`, written ahead of their first use.
const EXTRA_DEFINITIONS: &[(&str, &str)] = &[
    (
        "rzx",
        "gate rzx(theta) a, b { h b; cx a, b; rz(theta) b; cx a, b; h b; }",
    ),
    (
        "ryy",
        "gate ryy(theta) a, b { rx(pi/2) a; rx(pi/2) b; cx a, b; rz(theta) b; cx a, b; rx(-pi/2) a; rx(-pi/2) b; }",
    ),
    (
        "ecr",
        "gate ecr a, b { rzx(pi/4) a, b; x a; rzx(-pi/4) a, b; }",
    ),
    (
        "iswap",
        "gate iswap a, b { s a; s b; h a; cx a, b; cx b, a; h b; }",
    ),
];

/// Emit a circuit as OpenQASM 2.0 source.
///
/// Registers keep their declared names. Gates outside `qelib1.inc` get inline
/// definitions and opaque gates get `opaque` declarations, so the output is
/// self-contained. Delays have no OpenQASM 2 form and are written as comments.
pub fn emit_qasm2(circuit: &Circuit) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n");

    let used: Vec<&str> = circuit.instructions().iter().map(Instruction::name).collect();
    let needs = |name: &str| used.contains(&name);
    for (name, definition) in EXTRA_DEFINITIONS {
        // ecr is defined in terms of rzx.
        if needs(name) || (*name == "rzx" && needs("ecr")) {
            out.push_str(definition);
            out.push('\n');
        }
    }

    let mut opaques: BTreeMap<&str, (usize, u32)> = BTreeMap::new();
    for inst in circuit.instructions() {
        if let Some(GateKind::Opaque(g)) = inst.as_gate().map(|g| &g.kind) {
            opaques.entry(g.name.as_str()).or_insert((g.params.len(), g.num_qubits));
        }
    }
    for (name, (params, qubits)) in &opaques {
        let params: Vec<_> = (0..*params).map(|i| format!("p{i}")).collect();
        let qubits: Vec<_> = (0..*qubits).map(|i| format!("a{i}")).collect();
        if params.is_empty() {
            let _ = writeln!(out, "opaque {name} {};", qubits.join(", "));
        } else {
            let _ = writeln!(out, "opaque {name}({}) {};", params.join(", "), qubits.join(", "));
        }
    }

    let names = BitNames::new(circuit);
    if circuit.qregs().is_empty() && circuit.num_qubits() > 0 {
        let _ = writeln!(out, "qreg q[{}];", circuit.num_qubits());
    }
    for reg in circuit.qregs() {
        let _ = writeln!(out, "qreg {}[{}];", reg.name, reg.size);
    }
    if circuit.cregs().is_empty() && circuit.num_clbits() > 0 {
        let _ = writeln!(out, "creg c[{}];", circuit.num_clbits());
    }
    for reg in circuit.cregs() {
        let _ = writeln!(out, "creg {}[{}];", reg.name, reg.size);
    }

    for inst in circuit.instructions() {
        emit_instruction(&mut out, inst, &names);
    }
    out
}

fn emit_instruction(out: &mut String, inst: &Instruction, names: &BitNames) {
    let qubits: Vec<String> = inst.qubits.iter().map(|q| names.qubit(*q)).collect();
    match &inst.kind {
        InstructionKind::Gate(gate) => {
            if let Some(cond) = &gate.condition {
                let _ = write!(out, "if ({} == {}) ", cond.register, cond.value);
            }
            let params = gate.kind.params();
            if params.is_empty() {
                let _ = writeln!(out, "{} {};", gate.name(), qubits.join(", "));
            } else {
                let params: Vec<String> = params.iter().map(|p| format_angle(*p)).collect();
                let _ = writeln!(
                    out,
                    "{}({}) {};",
                    gate.name(),
                    params.join(", "),
                    qubits.join(", ")
                );
            }
        }
        InstructionKind::Measure => {
            for (q, c) in qubits.iter().zip(&inst.clbits) {
                let _ = writeln!(out, "measure {q} -> {};", names.clbit(*c));
            }
        }
        InstructionKind::Reset => {
            for q in &qubits {
                let _ = writeln!(out, "reset {q};");
            }
        }
        InstructionKind::Barrier => {
            if !qubits.is_empty() {
                let _ = writeln!(out, "barrier {};", qubits.join(", "));
            }
        }
        InstructionKind::Delay { duration } => {
            let _ = writeln!(out, "// delay({duration}) {};", qubits.join(", "));
        }
    }
}

/// Shortest decimal text that reads back to the same angle.
fn format_angle(value: f64) -> String {
    let text = format!("{value}");
    if text.contains('.') || text.contains('e') || text.contains("inf") || text.contains("NaN") {
        text
    } else {
        format!("{text}.0")
    }
}

/// Register-qualified names for every bit of a circuit.
struct BitNames {
    qubits: Vec<String>,
    clbits: Vec<String>,
}

impl BitNames {
    fn new(circuit: &Circuit) -> Self {
        let qubits = circuit
            .qubits()
            .iter()
            .map(|q| match (&q.register, q.index) {
                (Some(reg), Some(i)) => format!("{reg}[{i}]"),
                _ => format!("q[{}]", q.id.0),
            })
            .collect();
        let clbits = circuit
            .clbits()
            .iter()
            .map(|c| match (&c.register, c.index) {
                (Some(reg), Some(i)) => format!("{reg}[{i}]"),
                _ => format!("c[{}]", c.id.0),
            })
            .collect();
        Self { qubits, clbits }
    }

    fn qubit(&self, q: QubitId) -> String {
        self.qubits
            .get(q.index())
            .cloned()
            .unwrap_or_else(|| format!("q[{}]", q.0))
    }

    fn clbit(&self, c: ClbitId) -> String {
        self.clbits
            .get(c.index())
            .cloned()
            .unwrap_or_else(|| format!("c[{}]", c.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use benchpress_ir::{ClassicalCondition, Gate, OpaqueGate, StandardGate};

    #[test]
    fn test_emit_bell() {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();

        let qasm = emit_qasm2(&circuit);
        assert!(qasm.starts_with("OPENQASM 2.0;"));
        assert!(qasm.contains("qreg q[2];"));
        assert!(qasm.contains("creg c[2];"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("measure q[0] -> c[0];"));
    }

    #[test]
    fn test_emit_parameters_and_conditions() {
        let mut circuit = Circuit::with_size("params", 1, 1);
        circuit.rz(2.0, QubitId(0)).unwrap();
        let gate = Gate::standard(StandardGate::X).with_condition(ClassicalCondition::new("c", 1));
        circuit.push(Instruction::gate(gate, [QubitId(0)])).unwrap();

        let qasm = emit_qasm2(&circuit);
        assert!(qasm.contains("rz(2.0) q[0];"));
        assert!(qasm.contains("if (c == 1) x q[0];"));
    }

    #[test]
    fn test_non_qelib_gates_are_defined() {
        let mut circuit = Circuit::with_size("ecr", 2, 0);
        circuit.gate(StandardGate::ECR, [QubitId(0), QubitId(1)]).unwrap();
        let qasm = emit_qasm2(&circuit);
        let rzx = qasm.find("gate rzx").unwrap();
        let ecr = qasm.find("gate ecr").unwrap();
        assert!(rzx < ecr);
        assert!(!qasm.contains("gate iswap"));

        // Reading it back keeps the native gate.
        assert_eq!(parse(&qasm).unwrap().instructions(), circuit.instructions());
    }

    #[test]
    fn test_opaque_declarations() {
        let mut circuit = Circuit::with_size("opaque", 2, 0);
        let gate = Gate::opaque(OpaqueGate::new("magic", 2, vec![0.5]));
        circuit.push(Instruction::gate(gate, [QubitId(1), QubitId(0)])).unwrap();
        let qasm = emit_qasm2(&circuit);
        assert!(qasm.contains("opaque magic(p0) a0, a1;"));
        assert!(qasm.contains("magic(0.5) q[1], q[0];"));
        assert_eq!(parse(&qasm).unwrap().instructions(), circuit.instructions());
    }
}

//! Three-qubit gate unrolling.

use benchpress_ir::{Circuit, ClassicalCondition, QubitId, StandardGate};

use crate::decompose::{emit, unroll_3q};
use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::{empty_copy, unsupported};
use crate::property::PropertySet;

/// Rewrites `ccx` and `cswap` into one- and two-qubit gates.
///
/// Opaque gates on three or more qubits cannot be rewritten and fail.
pub struct UnrollThreeQubit;

impl Pass for UnrollThreeQubit {
    fn name(&self) -> &'static str {
        "UnrollThreeQubit"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet<'_>) -> CompileResult<()> {
        let mut out = empty_copy(circuit);
        for instruction in circuit.instructions() {
            match instruction.as_gate() {
                Some(gate) if instruction.qubits.len() >= 3 => {
                    let standard = gate.as_standard().ok_or_else(|| unsupported(instruction))?;
                    unroll_into(&mut out, *standard, &instruction.qubits, gate.condition.as_ref())?;
                }
                _ => {
                    out.push(instruction.clone())?;
                }
            }
        }
        *circuit = out;
        Ok(())
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet<'_>) -> bool {
        circuit
            .instructions()
            .iter()
            .any(|i| i.is_gate() && i.qubits.len() >= 3)
    }
}

fn unroll_into(
    out: &mut Circuit,
    gate: StandardGate,
    qubits: &[QubitId],
    condition: Option<&ClassicalCondition>,
) -> CompileResult<()> {
    match unroll_3q(&gate) {
        Some(steps) => {
            for (step, operands) in steps {
                let operands: Vec<_> = operands.iter().map(|&i| qubits[i]).collect();
                unroll_into(out, step, &operands, condition)?;
            }
        }
        None => emit(out, gate, qubits.iter().copied(), condition)?,
    }
    Ok(())
}

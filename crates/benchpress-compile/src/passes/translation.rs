//! Basis translation.

use benchpress_ir::{Circuit, ClassicalCondition, Instruction, QubitId, StandardGate};
use benchpress_target::Backend;

use crate::decompose::{emit, to_cx, u_angles, zsx};
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::{empty_copy, is_opaque, unsupported};
use crate::property::PropertySet;

/// Rewrites two-qubit gates into the target's `cx` or `cz`.
///
/// Gates already native are kept. Targets whose native two-qubit gate is
/// neither `cx` nor `cz` are rejected.
pub struct TwoQubitTranslation;

impl Pass for TwoQubitTranslation {
    fn name(&self) -> &'static str {
        "TwoQubitTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet<'_>) -> CompileResult<()> {
        let target = properties.target;
        let native = match target.two_q_gate() {
            "cx" => StandardGate::CX,
            "cz" => StandardGate::CZ,
            other => {
                return Err(CompileError::UnsupportedTarget(format!(
                    "cannot translate to two-qubit gate '{other}'"
                )));
            }
        };

        let mut out = empty_copy(circuit);
        for instruction in circuit.instructions() {
            if !(instruction.is_gate() && instruction.qubits.len() == 2) {
                out.push(instruction.clone())?;
                continue;
            }
            if is_opaque(instruction) {
                keep_if_native(&mut out, instruction, target)?;
                continue;
            }
            if let Some(gate) = instruction.as_gate() {
                if let Some(standard) = gate.as_standard() {
                    lower(
                        &mut out,
                        *standard,
                        &instruction.qubits,
                        gate.condition.as_ref(),
                        native,
                    )?;
                }
            }
        }
        *circuit = out;
        Ok(())
    }

    fn should_run(&self, circuit: &Circuit, properties: &PropertySet<'_>) -> bool {
        let native = properties.target.two_q_gate();
        circuit
            .instructions()
            .iter()
            .any(|i| i.is_multi_qubit_gate() && i.name() != native)
    }
}

fn lower(
    out: &mut Circuit,
    gate: StandardGate,
    qubits: &[QubitId],
    condition: Option<&ClassicalCondition>,
    native: StandardGate,
) -> CompileResult<()> {
    if gate == native || gate.num_qubits() != 2 {
        emit(out, gate, qubits.iter().copied(), condition)?;
        return Ok(());
    }
    if gate == StandardGate::CX {
        // native is cz
        emit(out, StandardGate::H, [qubits[1]], condition)?;
        emit(out, StandardGate::CZ, qubits.iter().copied(), condition)?;
        emit(out, StandardGate::H, [qubits[1]], condition)?;
        return Ok(());
    }
    let steps = to_cx(&gate).ok_or_else(|| CompileError::UnsupportedGate {
        name: gate.name().to_string(),
        num_qubits: gate.num_qubits(),
    })?;
    for (step, operands) in steps {
        let operands: Vec<_> = operands.iter().map(|&i| qubits[i]).collect();
        lower(out, step, &operands, condition, native)?;
    }
    Ok(())
}

/// Rewrites single-qubit gates into the target's basis.
///
/// Native gates are kept. Others become `u(θ, φ, λ)` when the target has `u`,
/// or `rz`/`sx` sequences when it has both. Identity gates are dropped.
pub struct SingleQubitTranslation;

#[derive(Clone, Copy)]
enum OneQubitBasis {
    U,
    ZSX,
}

impl OneQubitBasis {
    fn for_target(target: &Backend) -> Option<Self> {
        if target.supports("u") {
            Some(Self::U)
        } else if target.supports("rz") && target.supports("sx") {
            Some(Self::ZSX)
        } else {
            None
        }
    }
}

impl Pass for SingleQubitTranslation {
    fn name(&self) -> &'static str {
        "SingleQubitTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet<'_>) -> CompileResult<()> {
        let target = properties.target;
        let basis = OneQubitBasis::for_target(target);

        let mut out = empty_copy(circuit);
        for instruction in circuit.instructions() {
            let Some(gate) = instruction.as_gate() else {
                out.push(instruction.clone())?;
                continue;
            };
            if instruction.qubits.len() != 1 || target.supports(gate.name()) {
                out.push(instruction.clone())?;
                continue;
            }
            let standard = gate.as_standard().ok_or_else(|| unsupported(instruction))?;
            if *standard == StandardGate::I {
                continue;
            }
            let (theta, phi, lambda) = u_angles(standard).ok_or_else(|| unsupported(instruction))?;
            let qubit = instruction.qubits[0];
            let condition = gate.condition.as_ref();
            match basis {
                Some(OneQubitBasis::U) => {
                    emit(&mut out, StandardGate::U(theta, phi, lambda), [qubit], condition)?;
                }
                Some(OneQubitBasis::ZSX) => {
                    for step in zsx(theta, phi, lambda) {
                        emit(&mut out, step, [qubit], condition)?;
                    }
                }
                None => {
                    return Err(CompileError::UnsupportedTarget(format!(
                        "no single-qubit basis to express '{}' in [{}]",
                        gate.name(),
                        target.basis_gates().join(", ")
                    )));
                }
            }
        }
        *circuit = out;
        Ok(())
    }

    fn should_run(&self, circuit: &Circuit, properties: &PropertySet<'_>) -> bool {
        circuit.instructions().iter().any(|i| {
            i.is_gate() && i.qubits.len() == 1 && !properties.target.supports(i.name())
        })
    }
}

fn keep_if_native(out: &mut Circuit, instruction: &Instruction, target: &Backend) -> CompileResult<()> {
    if target.supports(instruction.name()) {
        out.push(instruction.clone())?;
        Ok(())
    } else {
        Err(unsupported(instruction))
    }
}

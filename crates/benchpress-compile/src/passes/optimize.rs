//! Peephole clean-up passes.

use benchpress_ir::{Circuit, Instruction, StandardGate};

use crate::decompose::is_zero_angle;
use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::empty_copy;
use crate::property::PropertySet;

/// Removes adjacent gate pairs that multiply to the identity.
///
/// Covers self-inverse gates (`x`, `h`, `cx`, `cz`, `swap`, ...) and the
/// `s`/`sdg`, `t`/`tdg`, `sx`/`sxdg` pairs. Conditional gates are never touched.
pub struct CancelInversePairs;

impl Pass for CancelInversePairs {
    fn name(&self) -> &'static str {
        "CancelInversePairs"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet<'_>) -> CompileResult<()> {
        let mut window = Window::new(circuit.num_qubits());
        for instruction in circuit.instructions() {
            if let Some(idx) = window.previous(instruction) {
                if window.get(idx).is_some_and(|prev| cancels(prev, instruction)) {
                    window.remove(idx);
                    continue;
                }
            }
            window.push(instruction.clone());
        }
        *circuit = window.finish(circuit)?;
        Ok(())
    }
}

/// Folds runs of `rz` (or `p`) on one qubit into a single rotation.
///
/// Rotations by a multiple of 2π disappear.
pub struct MergeRotations;

impl Pass for MergeRotations {
    fn name(&self) -> &'static str {
        "MergeRotations"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet<'_>) -> CompileResult<()> {
        let mut window = Window::new(circuit.num_qubits());
        for instruction in circuit.instructions() {
            let Some(angle) = rotation(instruction) else {
                window.push(instruction.clone());
                continue;
            };

            let merged = window.previous(instruction).and_then(|idx| {
                let prev = window.get(idx)?;
                let prev_angle = rotation(prev)?;
                (prev.name() == instruction.name()).then(|| (idx, prev_angle + angle))
            });

            match merged {
                Some((idx, total)) if is_zero_angle(total) => window.remove(idx),
                Some((idx, total)) => {
                    let gate = match instruction.standard_gate() {
                        Some(StandardGate::P(_)) => StandardGate::P(total),
                        _ => StandardGate::Rz(total),
                    };
                    window.replace(idx, Instruction::single_qubit_gate(gate, instruction.qubits[0]));
                }
                None if is_zero_angle(angle) => {}
                None => window.push(instruction.clone()),
            }
        }
        *circuit = window.finish(circuit)?;
        Ok(())
    }
}

/// Instructions kept so far plus, per qubit, the stack of kept instructions touching it.
struct Window {
    kept: Vec<Option<Instruction>>,
    last: Vec<Vec<usize>>,
}

impl Window {
    fn new(num_qubits: usize) -> Self {
        Self {
            kept: Vec::new(),
            last: vec![Vec::new(); num_qubits],
        }
    }

    /// The kept instruction that is last on every qubit of `instruction`, if one is.
    fn previous(&self, instruction: &Instruction) -> Option<usize> {
        let first = instruction.qubits.first()?;
        let idx = *self.last[first.index()].last()?;
        instruction
            .qubits
            .iter()
            .all(|q| self.last[q.index()].last() == Some(&idx))
            .then_some(idx)
    }

    fn get(&self, idx: usize) -> Option<&Instruction> {
        self.kept.get(idx).and_then(Option::as_ref)
    }

    fn push(&mut self, instruction: Instruction) {
        let idx = self.kept.len();
        for q in &instruction.qubits {
            self.last[q.index()].push(idx);
        }
        self.kept.push(Some(instruction));
    }

    fn replace(&mut self, idx: usize, instruction: Instruction) {
        self.kept[idx] = Some(instruction);
    }

    fn remove(&mut self, idx: usize) {
        if let Some(removed) = self.kept[idx].take() {
            for q in &removed.qubits {
                self.last[q.index()].pop();
            }
        }
    }

    fn finish(self, template: &Circuit) -> CompileResult<Circuit> {
        let mut out = empty_copy(template);
        for instruction in self.kept.into_iter().flatten() {
            out.push(instruction)?;
        }
        Ok(out)
    }
}

/// An unconditioned standard gate.
fn plain_gate(instruction: &Instruction) -> Option<StandardGate> {
    let gate = instruction.as_gate()?;
    if gate.condition.is_some() {
        return None;
    }
    gate.as_standard().copied()
}

fn rotation(instruction: &Instruction) -> Option<f64> {
    match plain_gate(instruction)? {
        StandardGate::Rz(angle) | StandardGate::P(angle) => Some(angle),
        _ => None,
    }
}

fn inverse(gate: StandardGate) -> Option<StandardGate> {
    use StandardGate::*;
    let inv = match gate {
        I | X | Y | Z | H | CX | CY | CZ | CH | Swap | ECR | CCX | CSwap => gate,
        S => Sdg,
        Sdg => S,
        T => Tdg,
        Tdg => T,
        SX => SXdg,
        SXdg => SX,
        _ => return None,
    };
    Some(inv)
}

fn cancels(prev: &Instruction, next: &Instruction) -> bool {
    let (Some(a), Some(b)) = (plain_gate(prev), plain_gate(next)) else {
        return false;
    };
    if inverse(a) != Some(b) {
        return false;
    }
    if prev.qubits == next.qubits {
        return true;
    }
    let symmetric = matches!(a, StandardGate::CZ | StandardGate::Swap);
    symmetric && prev.qubits.len() == 2 && prev.qubits[0] == next.qubits[1] && prev.qubits[1] == next.qubits[0]
}

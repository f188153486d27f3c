//! Gate decomposition tables.
//!
//! Every rule is exact up to global phase. Operands are given as positions in
//! the decomposed gate's qubit list.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use benchpress_ir::{ClassicalCondition, Circuit, Gate, Instruction, IrResult, QubitId, StandardGate};

/// One gate of a decomposition and the operand positions it acts on.
pub(crate) type Step = (StandardGate, &'static [usize]);

const A: &[usize] = &[0];
const B: &[usize] = &[1];
const C: &[usize] = &[2];
const AB: &[usize] = &[0, 1];
const BA: &[usize] = &[1, 0];
const AC: &[usize] = &[0, 2];
const BC: &[usize] = &[1, 2];
const CB: &[usize] = &[2, 1];
const ABC: &[usize] = &[0, 1, 2];

/// Decomposition of a three-qubit gate into one- and two-qubit gates.
pub(crate) fn unroll_3q(gate: &StandardGate) -> Option<Vec<Step>> {
    use StandardGate::*;
    let steps = match gate {
        CCX => vec![
            (H, C),
            (CX, BC),
            (Tdg, C),
            (CX, AC),
            (T, C),
            (CX, BC),
            (Tdg, C),
            (CX, AC),
            (T, B),
            (T, C),
            (H, C),
            (CX, AB),
            (T, A),
            (Tdg, B),
            (CX, AB),
        ],
        CSwap => vec![(CX, CB), (CCX, ABC), (CX, CB)],
        _ => return None,
    };
    Some(steps)
}

/// One step of rewriting a two-qubit gate towards `cx`.
///
/// Steps may contain other two-qubit gates that need another round.
/// Returns `None` for `cx` itself and for non-two-qubit gates.
pub(crate) fn to_cx(gate: &StandardGate) -> Option<Vec<Step>> {
    use StandardGate::*;
    let steps = match *gate {
        CZ => vec![(H, B), (CX, AB), (H, B)],
        CY => vec![(Sdg, B), (CX, AB), (S, B)],
        CH => vec![
            (S, B),
            (H, B),
            (T, B),
            (CX, AB),
            (Tdg, B),
            (H, B),
            (Sdg, B),
        ],
        Swap => vec![(CX, AB), (CX, BA), (CX, AB)],
        ISwap => vec![(S, A), (S, B), (H, A), (CX, AB), (CX, BA), (H, B)],
        CP(theta) => vec![
            (P(theta / 2.0), A),
            (CX, AB),
            (P(-theta / 2.0), B),
            (CX, AB),
            (P(theta / 2.0), B),
        ],
        CRz(theta) => vec![(Rz(theta / 2.0), B), (CX, AB), (Rz(-theta / 2.0), B), (CX, AB)],
        CRy(theta) => vec![(Ry(theta / 2.0), B), (CX, AB), (Ry(-theta / 2.0), B), (CX, AB)],
        CRx(theta) => vec![
            (P(FRAC_PI_2), B),
            (CX, AB),
            (U(-theta / 2.0, 0.0, 0.0), B),
            (CX, AB),
            (U(theta / 2.0, -FRAC_PI_2, 0.0), B),
        ],
        CU3(theta, phi, lambda) => vec![
            (P((lambda + phi) / 2.0), A),
            (P((lambda - phi) / 2.0), B),
            (CX, AB),
            (U(-theta / 2.0, 0.0, -(phi + lambda) / 2.0), B),
            (CX, AB),
            (U(theta / 2.0, phi, 0.0), B),
        ],
        CSX => vec![(H, B), (CP(FRAC_PI_2), AB), (H, B)],
        RZZ(theta) => vec![(CX, AB), (Rz(theta), B), (CX, AB)],
        RXX(theta) => vec![
            (H, A),
            (H, B),
            (CX, AB),
            (Rz(theta), B),
            (CX, AB),
            (H, A),
            (H, B),
        ],
        RYY(theta) => vec![
            (Rx(FRAC_PI_2), A),
            (Rx(FRAC_PI_2), B),
            (CX, AB),
            (Rz(theta), B),
            (CX, AB),
            (Rx(-FRAC_PI_2), A),
            (Rx(-FRAC_PI_2), B),
        ],
        RZX(theta) => vec![(H, B), (CX, AB), (Rz(theta), B), (CX, AB), (H, B)],
        ECR => vec![(RZX(FRAC_PI_4), AB), (X, A), (RZX(-FRAC_PI_4), AB)],
        _ => return None,
    };
    Some(steps)
}

/// Euler angles `(θ, φ, λ)` of a single-qubit gate as `u(θ, φ, λ)`.
pub(crate) fn u_angles(gate: &StandardGate) -> Option<(f64, f64, f64)> {
    use StandardGate::*;
    let angles = match *gate {
        I => (0.0, 0.0, 0.0),
        X => (PI, 0.0, PI),
        Y => (PI, FRAC_PI_2, FRAC_PI_2),
        Z => (0.0, 0.0, PI),
        H => (FRAC_PI_2, 0.0, PI),
        S => (0.0, 0.0, FRAC_PI_2),
        Sdg => (0.0, 0.0, -FRAC_PI_2),
        T => (0.0, 0.0, FRAC_PI_4),
        Tdg => (0.0, 0.0, -FRAC_PI_4),
        SX => (FRAC_PI_2, -FRAC_PI_2, FRAC_PI_2),
        SXdg => (FRAC_PI_2, FRAC_PI_2, -FRAC_PI_2),
        Rx(theta) => (theta, -FRAC_PI_2, FRAC_PI_2),
        Ry(theta) => (theta, 0.0, 0.0),
        Rz(lambda) | P(lambda) => (0.0, 0.0, lambda),
        U(theta, phi, lambda) => (theta, phi, lambda),
        _ => return None,
    };
    Some(angles)
}

const ANGLE_EPS: f64 = 1e-12;

/// `u(θ, φ, λ)` as `rz`/`sx` gates.
pub(crate) fn zsx(theta: f64, phi: f64, lambda: f64) -> Vec<StandardGate> {
    if theta.abs() < ANGLE_EPS {
        return vec![StandardGate::Rz(phi + lambda)];
    }
    vec![
        StandardGate::Rz(lambda),
        StandardGate::SX,
        StandardGate::Rz(theta + PI),
        StandardGate::SX,
        StandardGate::Rz(phi + PI),
    ]
}

/// Whether an angle is a multiple of 2π.
pub(crate) fn is_zero_angle(angle: f64) -> bool {
    let wrapped = angle.rem_euclid(2.0 * PI);
    wrapped < ANGLE_EPS || 2.0 * PI - wrapped < ANGLE_EPS
}

/// Append a standard gate carrying an optional condition.
pub(crate) fn emit(
    out: &mut Circuit,
    gate: StandardGate,
    qubits: impl IntoIterator<Item = QubitId>,
    condition: Option<&ClassicalCondition>,
) -> IrResult<()> {
    let mut gate = Gate::standard(gate);
    gate.condition = condition.cloned();
    out.push(Instruction::gate(gate, qubits))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_arity(steps: &[Step]) -> u32 {
        steps.iter().map(|(g, _)| g.num_qubits()).max().unwrap_or(0)
    }

    #[test]
    fn test_operand_counts_match_gates() {
        let two_q = [
            StandardGate::CZ,
            StandardGate::CY,
            StandardGate::CH,
            StandardGate::Swap,
            StandardGate::ISwap,
            StandardGate::ECR,
            StandardGate::CSX,
            StandardGate::CP(0.3),
            StandardGate::CRx(0.3),
            StandardGate::CRy(0.3),
            StandardGate::CRz(0.3),
            StandardGate::CU3(0.1, 0.2, 0.3),
            StandardGate::RXX(0.3),
            StandardGate::RYY(0.3),
            StandardGate::RZZ(0.3),
            StandardGate::RZX(0.3),
        ];
        for gate in two_q {
            let steps = to_cx(&gate).unwrap();
            assert!(max_arity(&steps) <= 2, "{}", gate.name());
            for (g, ops) in &steps {
                assert_eq!(g.num_qubits() as usize, ops.len(), "{}", gate.name());
                assert!(ops.iter().all(|&i| i < 2));
            }
        }
        assert!(to_cx(&StandardGate::CX).is_none());
        assert!(to_cx(&StandardGate::H).is_none());
    }

    #[test]
    fn test_ccx_uses_six_cx() {
        let steps = unroll_3q(&StandardGate::CCX).unwrap();
        assert_eq!(steps.iter().filter(|(g, _)| *g == StandardGate::CX).count(), 6);
        assert!(unroll_3q(&StandardGate::CX).is_none());
    }

    #[test]
    fn test_zsx_shapes() {
        assert_eq!(zsx(0.0, 0.25, 0.5), vec![StandardGate::Rz(0.75)]);
        let full = zsx(FRAC_PI_2, 0.0, PI);
        assert_eq!(full.len(), 5);
        assert_eq!(full.iter().filter(|g| **g == StandardGate::SX).count(), 2);
    }

    #[test]
    fn test_zero_angle() {
        assert!(is_zero_angle(0.0));
        assert!(is_zero_angle(2.0 * PI));
        assert!(is_zero_angle(-4.0 * PI));
        assert!(!is_zero_angle(PI));
    }
}

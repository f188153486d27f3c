//! Circuits built in code rather than read from the corpus.
//!
//! Builder calls only fail on out-of-range operands, which these loops never
//! produce, so their results are discarded.

use std::f64::consts::PI;

use benchpress_ir::{Circuit, ClbitId, QubitId};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Quantum Fourier transform on `n` qubits, with the final qubit reversal.
pub fn qft(n: u32) -> Circuit {
    let mut circuit = Circuit::with_size(format!("qft_n{n}"), n, 0);
    for j in (0..n).rev() {
        let _ = circuit.h(QubitId(j));
        for k in (0..j).rev() {
            let lambda = PI / 2f64.powi((j - k) as i32);
            let _ = circuit.cp(lambda, QubitId(k), QubitId(j));
        }
    }
    for i in 0..n / 2 {
        let _ = circuit.swap(QubitId(i), QubitId(n - 1 - i));
    }
    circuit
}

/// Bernstein-Vazirani with the all-ones secret.
///
/// `n - 1` data qubits are measured; the last qubit is the ancilla.
pub fn bv_all_ones(n: u32) -> Circuit {
    let data = n.saturating_sub(1);
    let mut circuit = Circuit::with_size(format!("bv_all_ones_n{n}"), n, data);
    if n == 0 {
        return circuit;
    }
    let ancilla = QubitId(n - 1);
    let _ = circuit.x(ancilla);
    for q in 0..n {
        let _ = circuit.h(QubitId(q));
    }
    for q in 0..data {
        let _ = circuit.cx(QubitId(q), ancilla);
    }
    for q in 0..data {
        let _ = circuit.h(QubitId(q));
    }
    for q in 0..data {
        let _ = circuit.measure(QubitId(q), ClbitId(q));
    }
    circuit
}

/// A BV-shaped circuit whose CNOT ladders cancel.
///
/// Every CNOT onto the last qubit is undone by its mirror image, so a
/// compiler that simplifies well reduces it to one X and one Z.
pub fn trivial_bvlike(n: u32) -> Circuit {
    let mut circuit = Circuit::with_size(format!("bvlike_n{n}"), n, 0);
    if n < 2 {
        return circuit;
    }
    let last = QubitId(n - 1);
    for q in 0..n - 1 {
        let _ = circuit.cx(QubitId(q), last);
    }
    let _ = circuit.x(last);
    let _ = circuit.z(QubitId(n - 2));
    for q in (0..n - 1).rev() {
        let _ = circuit.cx(QubitId(q), last);
    }
    circuit
}

/// Hardware-efficient SU(2) ansatz with circular CX entanglement.
///
/// Each repetition is an RY layer, an RZ layer and a CX ring; a final
/// rotation layer closes the circuit. Angles are drawn from `seed`.
pub fn efficient_su2_circular(n: u32, reps: u32, seed: u64) -> Circuit {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut circuit = Circuit::with_size(format!("su2_circular_n{n}_r{reps}"), n, 0);

    let rotations = |circuit: &mut Circuit, rng: &mut SmallRng| {
        for q in 0..n {
            let _ = circuit.ry(rng.gen_range(0.0..2.0 * PI), QubitId(q));
        }
        for q in 0..n {
            let _ = circuit.rz(rng.gen_range(0.0..2.0 * PI), QubitId(q));
        }
    };

    for _ in 0..reps {
        rotations(&mut circuit, &mut rng);
        if n > 2 {
            let _ = circuit.cx(QubitId(n - 1), QubitId(0));
        }
        for q in 0..n.saturating_sub(1) {
            let _ = circuit.cx(QubitId(q), QubitId(q + 1));
        }
    }
    rotations(&mut circuit, &mut rng);
    circuit
}

/// Random quantum-volume circuit of width and depth `n`.
///
/// Every layer pairs the qubits at random and applies a two-qubit block of
/// rotations around one CX to each pair.
pub fn quantum_volume(n: u32, seed: u64) -> Circuit {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut circuit = Circuit::with_size(format!("qv_n{n}_{seed}"), n, n);

    for _layer in 0..n {
        let mut available: Vec<u32> = (0..n).collect();
        while available.len() >= 2 {
            let q1 = available.remove(rng.gen_range(0..available.len()));
            let q2 = available.remove(rng.gen_range(0..available.len()));
            let angles: [f64; 6] = std::array::from_fn(|_| rng.gen_range(0.0..2.0 * PI));

            let _ = circuit.rz(angles[0], QubitId(q1));
            let _ = circuit.ry(angles[1], QubitId(q1));
            let _ = circuit.rz(angles[2], QubitId(q2));
            let _ = circuit.ry(angles[3], QubitId(q2));
            let _ = circuit.cx(QubitId(q1), QubitId(q2));
            let _ = circuit.ry(angles[4], QubitId(q1));
            let _ = circuit.ry(angles[5], QubitId(q2));
        }
    }

    for q in 0..n {
        let _ = circuit.measure(QubitId(q), ClbitId(q));
    }
    circuit
}

//! Property tests for depth and operation counts on random circuits.

use benchpress_ir::{Circuit, QubitId, StandardGate};
use proptest::prelude::*;

const NUM_QUBITS: u32 = 5;

#[derive(Debug, Clone)]
enum Op {
    One(u32),
    Two(u32, u32),
    Barrier,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..NUM_QUBITS).prop_map(Op::One),
        3 => (0..NUM_QUBITS, 1..NUM_QUBITS)
            .prop_map(|(a, offset)| Op::Two(a, (a + offset) % NUM_QUBITS)),
        1 => Just(Op::Barrier),
    ]
}

fn build(ops: &[Op]) -> Circuit {
    let mut circuit = Circuit::with_size("random", NUM_QUBITS, 0);
    for op in ops {
        match *op {
            Op::One(q) => {
                circuit.gate(StandardGate::H, [QubitId(q)]).unwrap();
            }
            Op::Two(a, b) => {
                circuit.cx(QubitId(a), QubitId(b)).unwrap();
            }
            Op::Barrier => {
                circuit.barrier((0..NUM_QUBITS).map(QubitId)).unwrap();
            }
        }
    }
    circuit
}

proptest! {
    #[test]
    fn depth_bounded_by_gate_count(ops in prop::collection::vec(arb_op(), 0..60)) {
        let circuit = build(&ops);
        let gates = circuit.num_ops() - circuit.gate_count("barrier");
        prop_assert!(circuit.depth() <= gates);
    }

    #[test]
    fn filtered_depth_never_exceeds_full_depth(ops in prop::collection::vec(arb_op(), 0..60)) {
        let circuit = build(&ops);
        let two_q = circuit.depth_filtered(|i| i.name() == "cx");
        prop_assert!(two_q <= circuit.depth());
        prop_assert!(two_q <= circuit.gate_count("cx"));
        prop_assert_eq!(two_q, circuit.multi_qubit_depth());
    }

    #[test]
    fn counts_sum_to_num_ops(ops in prop::collection::vec(arb_op(), 0..60)) {
        let circuit = build(&ops);
        let total: usize = circuit.count_ops().values().sum();
        prop_assert_eq!(total, circuit.num_ops());
    }
}

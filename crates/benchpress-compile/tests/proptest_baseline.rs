//! Property tests: baseline output always fits the target.

use benchpress_compile::{BaselineCompiler, Compiler, OptimizationLevel};
use benchpress_ir::{Circuit, QubitId, StandardGate};
use benchpress_target::{Backend, TopologySpec};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    One(StandardGate, u32),
    Two(StandardGate, u32, u32),
    Three(StandardGate, u32, u32, u32),
}

impl Op {
    fn apply(self, circuit: &mut Circuit) {
        let result = match self {
            Op::One(g, q) => circuit.gate(g, [QubitId(q)]).map(drop),
            Op::Two(g, a, b) => circuit.gate(g, [QubitId(a), QubitId(b)]).map(drop),
            Op::Three(g, a, b, c) => circuit
                .gate(g, [QubitId(a), QubitId(b), QubitId(c)])
                .map(drop),
        };
        result.unwrap();
    }
}

fn arb_op(n: u32) -> impl Strategy<Value = Op> {
    let one = (
        prop_oneof![
            Just(StandardGate::H),
            Just(StandardGate::X),
            Just(StandardGate::T),
            Just(StandardGate::SX),
            (-3.0_f64..3.0).prop_map(StandardGate::Rz),
            (-3.0_f64..3.0).prop_map(StandardGate::Ry),
        ],
        0..n,
    )
        .prop_map(|(g, q)| Op::One(g, q));
    let two = (
        prop_oneof![
            Just(StandardGate::CX),
            Just(StandardGate::CZ),
            Just(StandardGate::Swap),
            Just(StandardGate::ECR),
            (-3.0_f64..3.0).prop_map(StandardGate::CP),
            (-3.0_f64..3.0).prop_map(StandardGate::RZZ),
        ],
        0..n,
        0..n,
    )
        .prop_filter("distinct operands", |(_, a, b)| a != b)
        .prop_map(|(g, a, b)| Op::Two(g, a, b));
    let three = (0..n, 0..n, 0..n)
        .prop_filter("distinct operands", |(a, b, c)| a != b && b != c && a != c)
        .prop_map(|(a, b, c)| Op::Three(StandardGate::CCX, a, b, c));
    prop_oneof![3 => one, 3 => two, 1 => three]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (3_u32..=8).prop_flat_map(|n| {
        prop::collection::vec(arb_op(n), 0..30).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("random", n, 0);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit.measure_all().unwrap();
            circuit
        })
    })
}

fn arb_topology() -> impl Strategy<Value = TopologySpec> {
    prop_oneof![
        Just(TopologySpec::Line),
        Just(TopologySpec::Ring),
        Just(TopologySpec::Star),
        Just(TopologySpec::Square),
        Just(TopologySpec::HeavyHex),
    ]
}

fn arb_level() -> impl Strategy<Value = OptimizationLevel> {
    prop::sample::select(OptimizationLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_output_fits_target(
        circuit in arb_circuit(),
        topology in arb_topology(),
        level in arb_level(),
        use_cx in any::<bool>(),
    ) {
        let mut backend = Backend::flexible(circuit.num_qubits() as u32, &topology).unwrap();
        if use_cx {
            backend = backend.with_native_gates("cx", ["u"]).unwrap();
        }
        let compiled = BaselineCompiler.compile(&circuit, &backend, level).unwrap();

        for inst in compiled.instructions().iter().filter(|i| i.is_gate()) {
            prop_assert!(backend.supports(inst.name()), "{} not native", inst.name());
            prop_assert!(inst.qubits.len() <= 2);
            if inst.qubits.len() == 2 {
                prop_assert!(backend.is_connected(inst.qubits[0].0, inst.qubits[1].0));
            }
        }
        prop_assert_eq!(compiled.gate_count("measure"), circuit.num_qubits());
        prop_assert_eq!(compiled.num_clbits(), circuit.num_clbits());
    }
}

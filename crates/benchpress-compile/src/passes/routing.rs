//! SWAP-based routing.

use benchpress_ir::{Circuit, Instruction, QubitId, StandardGate};
use tracing::debug;

use crate::decompose::emit;
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::unsupported;
use crate::property::{Layout, PropertySet};

/// Makes every two-qubit gate act on coupled physical qubits.
///
/// Gates are visited in order. When the operands of a two-qubit gate are not
/// coupled, the first operand is swapped along a shortest path until it sits
/// next to the second. The output is expressed on physical qubits and spans
/// the whole target.
pub struct ShortestPathRouting;

impl Pass for ShortestPathRouting {
    fn name(&self) -> &'static str {
        "ShortestPathRouting"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet<'_>) -> CompileResult<()> {
        let mut layout = properties
            .layout
            .clone()
            .ok_or(CompileError::MissingLayout)?;
        let coupling_map = properties.target.coupling_map();
        let mut out = circuit.empty_like(properties.target.num_qubits());
        let mut swaps = 0usize;

        for instruction in circuit.instructions() {
            if instruction.is_gate() && instruction.qubits.len() > 2 {
                return Err(unsupported(instruction));
            }

            if instruction.is_gate() && instruction.qubits.len() == 2 {
                let (l1, l2) = (instruction.qubits[0], instruction.qubits[1]);
                let p1 = physical(&layout, l1)?;
                let p2 = physical(&layout, l2)?;
                if !coupling_map.is_connected(p1, p2) {
                    let path = coupling_map
                        .shortest_path(p1, p2)
                        .ok_or(CompileError::RoutingFailed {
                            qubit1: p1,
                            qubit2: p2,
                        })?;
                    // Walk the first operand up to the neighbour of the second.
                    for hop in path.windows(2).take(path.len().saturating_sub(2)) {
                        emit(
                            &mut out,
                            StandardGate::Swap,
                            [QubitId(hop[0]), QubitId(hop[1])],
                            None,
                        )?;
                        layout.swap(hop[0], hop[1]);
                        swaps += 1;
                    }
                }
            }

            let qubits = instruction
                .qubits
                .iter()
                .map(|&q| physical(&layout, q).map(QubitId))
                .collect::<CompileResult<Vec<_>>>()?;
            out.push(Instruction {
                kind: instruction.kind.clone(),
                qubits,
                clbits: instruction.clbits.clone(),
            })?;
        }

        debug!("Inserted {} swaps", swaps);
        properties.final_layout = Some(layout);
        *circuit = out;
        Ok(())
    }
}

fn physical(layout: &Layout, logical: QubitId) -> CompileResult<u32> {
    layout
        .get_physical(logical)
        .ok_or(CompileError::MissingLayout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::OptimizationLevel;
    use crate::passes::TrivialLayout;
    use benchpress_target::{Backend, CouplingMap, TopologySpec};

    fn routed(circuit: &Circuit, backend: &Backend) -> (Circuit, Layout) {
        let mut props = PropertySet::new(backend, OptimizationLevel::O0);
        let mut circuit = circuit.clone();
        TrivialLayout.run(&mut circuit, &mut props).unwrap();
        ShortestPathRouting.run(&mut circuit, &mut props).unwrap();
        (circuit, props.final_layout.unwrap())
    }

    fn all_adjacent(circuit: &Circuit, backend: &Backend) -> bool {
        circuit
            .instructions()
            .iter()
            .filter(|i| i.is_multi_qubit_gate())
            .all(|i| backend.is_connected(i.qubits[0].0, i.qubits[1].0))
    }

    #[test]
    fn test_adjacent_gates_untouched() {
        let backend = Backend::flexible(4, &TopologySpec::Line).unwrap();
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(2), QubitId(1)).unwrap();

        let (out, _) = routed(&circuit, &backend);
        assert_eq!(out.num_qubits(), 4);
        assert_eq!(out.gate_count("swap"), 0);
        assert_eq!(out.gate_count("cx"), 2);
    }

    #[test]
    fn test_distant_gate_gets_swaps() {
        let backend = Backend::flexible(5, &TopologySpec::Line).unwrap();
        let mut circuit = Circuit::with_size("t", 5, 0);
        circuit.cx(QubitId(0), QubitId(4)).unwrap();
        circuit.cx(QubitId(0), QubitId(3)).unwrap();

        let (out, layout) = routed(&circuit, &backend);
        assert_eq!(out.gate_count("swap"), 3);
        assert!(all_adjacent(&out, &backend));
        // Logical 0 ended next to logical 4.
        assert_eq!(layout.get_physical(QubitId(0)), Some(3));
        assert_eq!(layout.get_physical(QubitId(1)), Some(0));
    }

    #[test]
    fn test_measure_follows_layout() {
        let backend = Backend::flexible(3, &TopologySpec::Line).unwrap();
        let mut circuit = Circuit::with_size("t", 3, 1);
        circuit.cx(QubitId(0), QubitId(2)).unwrap();
        circuit.measure(QubitId(0), benchpress_ir::ClbitId(0)).unwrap();

        let (out, _) = routed(&circuit, &backend);
        let measure = out.instructions().last().unwrap();
        assert!(measure.is_measure());
        assert_eq!(measure.qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_disconnected_target_fails() {
        let map = CouplingMap::from_edges(4, [(0, 1), (2, 3)]).unwrap();
        let backend = Backend::new("split", map, "cx", ["u"]).unwrap();
        let mut circuit = Circuit::with_size("t", 4, 0);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();

        let mut props = PropertySet::new(&backend, OptimizationLevel::O0);
        TrivialLayout.run(&mut circuit, &mut props).unwrap();
        assert!(matches!(
            ShortestPathRouting.run(&mut circuit, &mut props),
            Err(CompileError::RoutingFailed { qubit1: 0, qubit2: 3 })
        ));
    }

    #[test]
    fn test_missing_layout() {
        let backend = Backend::flexible(2, &TopologySpec::Line).unwrap();
        let mut props = PropertySet::new(&backend, OptimizationLevel::O0);
        let mut circuit = Circuit::with_size("t", 2, 0);
        assert!(matches!(
            ShortestPathRouting.run(&mut circuit, &mut props),
            Err(CompileError::MissingLayout)
        ));
    }
}

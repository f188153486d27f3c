//! Structural metrics over a circuit: operation counts and depths.

use std::collections::BTreeMap;

use crate::circuit::Circuit;
use crate::instruction::Instruction;

impl Circuit {
    /// Count of each operation name, including measurements and barriers.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in self.instructions() {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of operations with the given name.
    pub fn gate_count(&self, name: &str) -> usize {
        self.instructions()
            .iter()
            .filter(|inst| inst.name() == name)
            .count()
    }

    /// Number of gates acting on two or more qubits.
    pub fn num_multi_qubit_gates(&self) -> usize {
        self.instructions()
            .iter()
            .filter(|inst| inst.is_multi_qubit_gate())
            .count()
    }

    /// Circuit depth, not counting barriers.
    pub fn depth(&self) -> usize {
        self.depth_filtered(|inst| !inst.is_barrier())
    }

    /// Depth counting only multi-qubit gates.
    pub fn multi_qubit_depth(&self) -> usize {
        self.depth_filtered(Instruction::is_multi_qubit_gate)
    }

    /// Depth counting only instructions accepted by `counts`.
    ///
    /// Every instruction still synchronises the wires it touches (its qubits,
    /// its classical bits and the bits of its condition register); only counted
    /// instructions add a layer.
    pub fn depth_filtered(&self, counts: impl Fn(&Instruction) -> bool) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits()];
        let mut clbit_level = vec![0usize; self.num_clbits()];
        let mut depth = 0;

        for inst in self.instructions() {
            let condition_bits = inst
                .as_gate()
                .and_then(|g| g.condition.as_ref())
                .and_then(|c| self.creg(&c.register))
                .map(|r| r.range())
                .unwrap_or(0..0);

            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_level[q.index()])
                .chain(inst.clbits.iter().map(|c| clbit_level[c.index()]))
                .chain(condition_bits.clone().map(|c| clbit_level[c as usize]))
                .max();
            let Some(start) = start else {
                continue;
            };

            let level = start + usize::from(counts(inst));
            for q in &inst.qubits {
                qubit_level[q.index()] = level;
            }
            for c in &inst.clbits {
                clbit_level[c.index()] = level;
            }
            for c in condition_bits {
                clbit_level[c as usize] = level;
            }
            depth = depth.max(level);
        }

        depth
    }
}

#[cfg(test)]
mod tests {
    use crate::circuit::Circuit;
    use crate::gate::{ClassicalCondition, Gate, StandardGate};
    use crate::instruction::Instruction;
    use crate::qubit::{ClbitId, QubitId};

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_count_ops() {
        let mut circuit = Circuit::with_size("ops", 3, 0);
        circuit.h(q(0)).unwrap().cx(q(0), q(1)).unwrap().cx(q(1), q(2)).unwrap();
        circuit.measure_all().unwrap();

        let counts = circuit.count_ops();
        assert_eq!(counts["cx"], 2);
        assert_eq!(counts["h"], 1);
        assert_eq!(counts["measure"], 3);
        assert_eq!(counts["barrier"], 1);
        assert_eq!(circuit.gate_count("cz"), 0);
        assert_eq!(circuit.num_multi_qubit_gates(), 2);
    }

    #[test]
    fn test_depth_of_ghz() {
        let mut circuit = Circuit::with_size("ghz", 4, 0);
        circuit.h(q(0)).unwrap();
        for i in 0..3 {
            circuit.cx(q(i), q(i + 1)).unwrap();
        }
        assert_eq!(circuit.depth(), 4);
        assert_eq!(circuit.multi_qubit_depth(), 3);
    }

    #[test]
    fn test_filtered_ops_still_synchronise() {
        // cx(0,1) ; h(1) ; cx(1,2): h is skipped but cx(1,2) must follow cx(0,1).
        let mut circuit = Circuit::with_size("sync", 3, 0);
        circuit.cx(q(0), q(1)).unwrap().h(q(1)).unwrap().cx(q(1), q(2)).unwrap();
        assert_eq!(circuit.depth_filtered(|i| i.name() == "cx"), 2);

        // Parallel two-qubit gates share a layer.
        let mut circuit = Circuit::with_size("par", 4, 0);
        circuit.cx(q(0), q(1)).unwrap().cx(q(2), q(3)).unwrap();
        assert_eq!(circuit.depth_filtered(|i| i.name() == "cx"), 1);
    }

    #[test]
    fn test_barrier_does_not_add_depth() {
        let mut circuit = Circuit::with_size("bar", 2, 0);
        circuit.h(q(0)).unwrap();
        circuit.barrier([q(0), q(1)]).unwrap();
        circuit.h(q(1)).unwrap();
        // The barrier pulls q1 up to q0's level.
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_condition_register_orders_gates() {
        let mut circuit = Circuit::with_size("cond", 2, 1);
        circuit.h(q(0)).unwrap().measure(q(0), ClbitId(0)).unwrap();
        let gate = Gate::standard(StandardGate::X).with_condition(ClassicalCondition::new("c", 1));
        circuit.push(Instruction::gate(gate, [q(1)])).unwrap();
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_empty_circuit_depth() {
        assert_eq!(Circuit::with_size("empty", 5, 0).depth(), 0);
    }
}

//! Pass manager.

use benchpress_ir::Circuit;
use tracing::{debug, info, instrument};

use crate::error::CompileResult;
use crate::level::OptimizationLevel;
use crate::pass::Pass;
use crate::passes::{
    CancelInversePairs, MergeRotations, ShortestPathRouting, SingleQubitTranslation,
    TrivialLayout, TwoQubitTranslation, UnrollThreeQubit,
};
use crate::property::PropertySet;

/// Runs a sequence of passes in order.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create an empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// The baseline pipeline for an optimization level.
    ///
    /// | Level | Passes |
    /// |-------|--------|
    /// | 0 | unroll, layout, routing, translation |
    /// | 1 | + inverse-pair cancellation before layout |
    /// | 2, 3 | + rotation merging and cancellation after translation |
    pub fn preset(level: OptimizationLevel) -> Self {
        let mut pm = Self::new();
        pm.add_pass(UnrollThreeQubit);
        if level >= OptimizationLevel::O1 {
            pm.add_pass(CancelInversePairs);
        }
        pm.add_pass(TrivialLayout);
        pm.add_pass(ShortestPathRouting);
        pm.add_pass(TwoQubitTranslation);
        pm.add_pass(SingleQubitTranslation);
        if level >= OptimizationLevel::O2 {
            pm.add_pass(MergeRotations);
            pm.add_pass(CancelInversePairs);
        }
        pm
    }

    /// Append a pass.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on `circuit`.
    #[instrument(skip_all, fields(circuit = circuit.name(), target = properties.target.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet<'_>) -> CompileResult<()> {
        info!(
            "Running {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, depth: {}, ops: {}",
            circuit.depth(),
            circuit.num_ops()
        );
        Ok(())
    }

    /// Number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Whether there are no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchpress_ir::QubitId;
    use benchpress_target::{Backend, TopologySpec};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());

        let backend = Backend::flexible(2, &TopologySpec::Line).unwrap();
        let mut props = PropertySet::new(&backend, OptimizationLevel::O0);
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        pm.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit.num_ops(), 2);
    }

    #[test]
    fn test_preset_sizes() {
        assert_eq!(PassManager::preset(OptimizationLevel::O0).len(), 5);
        assert_eq!(PassManager::preset(OptimizationLevel::O1).len(), 6);
        assert_eq!(PassManager::preset(OptimizationLevel::O3).len(), 8);
    }
}

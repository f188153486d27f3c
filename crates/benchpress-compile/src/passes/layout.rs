//! Initial placement.

use benchpress_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{Layout, PropertySet};

/// Maps logical qubit i to physical qubit i.
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet<'_>) -> CompileResult<()> {
        let available = properties.target.num_qubits();
        let required = circuit.num_qubits();
        if required > available as usize {
            return Err(CompileError::CircuitTooLarge {
                required,
                available,
            });
        }
        properties.layout = Some(Layout::trivial(required as u32));
        Ok(())
    }

    fn should_run(&self, _circuit: &Circuit, properties: &PropertySet<'_>) -> bool {
        properties.layout.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::OptimizationLevel;
    use benchpress_target::{Backend, TopologySpec};

    #[test]
    fn test_trivial_layout() {
        let backend = Backend::flexible(5, &TopologySpec::Line).unwrap();
        let mut props = PropertySet::new(&backend, OptimizationLevel::O1);
        let mut circuit = Circuit::with_size("t", 3, 0);

        TrivialLayout.run(&mut circuit, &mut props).unwrap();
        assert_eq!(props.layout.as_ref().map(Layout::len), Some(3));
        assert!(!TrivialLayout.should_run(&circuit, &props));
    }

    #[test]
    fn test_circuit_too_large() {
        let backend = Backend::flexible(2, &TopologySpec::Line).unwrap();
        let mut props = PropertySet::new(&backend, OptimizationLevel::O1);
        let mut circuit = Circuit::with_size("t", 3, 0);
        assert!(matches!(
            TrivialLayout.run(&mut circuit, &mut props),
            Err(CompileError::CircuitTooLarge {
                required: 3,
                available: 2
            })
        ));
    }
}

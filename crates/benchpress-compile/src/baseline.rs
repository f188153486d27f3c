//! In-tree reference compiler.

use benchpress_ir::Circuit;
use benchpress_target::Backend;
use tracing::debug;

use crate::compiler::Compiler;
use crate::error::CompileResult;
use crate::level::OptimizationLevel;
use crate::manager::PassManager;
use crate::property::PropertySet;

/// Compiles with the built-in pass pipeline (see [`PassManager::preset`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineCompiler;

impl BaselineCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl Compiler for BaselineCompiler {
    fn name(&self) -> &str {
        "baseline"
    }

    fn compile(
        &self,
        circuit: &Circuit,
        backend: &Backend,
        level: OptimizationLevel,
    ) -> CompileResult<Circuit> {
        debug!(
            "baseline: compiling {} for {} at O{}",
            circuit.name(),
            backend.name(),
            level
        );
        let mut properties = PropertySet::new(backend, level);
        let mut compiled = circuit.clone();
        PassManager::preset(level).run(&mut compiled, &mut properties)?;
        Ok(compiled)
    }
}

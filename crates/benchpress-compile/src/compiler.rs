//! The compiler contract.

use benchpress_ir::Circuit;
use benchpress_target::Backend;

use crate::error::CompileResult;
use crate::level::OptimizationLevel;

/// A circuit compiler under benchmark.
///
/// Implementations borrow the input circuit and return a new circuit that
/// runs on `backend`. One value may be reused for many compilations; it must
/// not carry results from one call into the next.
pub trait Compiler: Send + Sync {
    /// Display name, recorded in reports.
    fn name(&self) -> &str;

    /// Compile `circuit` for `backend`.
    fn compile(
        &self,
        circuit: &Circuit,
        backend: &Backend,
        level: OptimizationLevel,
    ) -> CompileResult<Circuit>;
}

impl<C: Compiler + ?Sized> Compiler for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compile(
        &self,
        circuit: &Circuit,
        backend: &Backend,
        level: OptimizationLevel,
    ) -> CompileResult<Circuit> {
        (**self).compile(circuit, backend, level)
    }
}

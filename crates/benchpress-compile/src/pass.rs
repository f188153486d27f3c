//! Pass trait.

use benchpress_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Reads the circuit, writes properties.
    Analysis,
    /// Rewrites the circuit.
    Transformation,
}

/// One step of the baseline pipeline.
pub trait Pass: Send + Sync {
    /// Pass name, used in logs.
    fn name(&self) -> &str;

    /// Analysis or transformation.
    fn kind(&self) -> PassKind;

    /// Run the pass.
    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet<'_>) -> CompileResult<()>;

    /// Whether the pass has anything to do.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet<'_>) -> bool {
        true
    }
}

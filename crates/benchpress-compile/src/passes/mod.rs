//! Built-in passes of the baseline pipeline.
//!
//! - [`UnrollThreeQubit`]: `ccx`/`cswap` to one- and two-qubit gates
//! - [`TrivialLayout`]: logical qubit i on physical qubit i
//! - [`ShortestPathRouting`]: SWAPs along shortest paths
//! - [`TwoQubitTranslation`]: two-qubit gates to the native `cx` or `cz`
//! - [`SingleQubitTranslation`]: single-qubit gates to `u` or `rz`/`sx`
//! - [`MergeRotations`], [`CancelInversePairs`]: peephole clean-up

mod layout;
mod optimize;
mod routing;
mod translation;
mod unroll;

pub use layout::TrivialLayout;
pub use optimize::{CancelInversePairs, MergeRotations};
pub use routing::ShortestPathRouting;
pub use translation::{SingleQubitTranslation, TwoQubitTranslation};
pub use unroll::UnrollThreeQubit;

use benchpress_ir::{Circuit, GateKind, Instruction};

use crate::error::CompileError;

/// An empty copy of `circuit` with the same qubit count and classical bits.
pub(crate) fn empty_copy(circuit: &Circuit) -> Circuit {
    circuit.empty_like(circuit.num_qubits() as u32)
}

/// Error for an opaque gate the target does not list as native.
pub(crate) fn unsupported(instruction: &Instruction) -> CompileError {
    CompileError::UnsupportedGate {
        name: instruction.name().to_string(),
        num_qubits: instruction.qubits.len() as u32,
    }
}

/// Whether the instruction is an opaque gate.
pub(crate) fn is_opaque(instruction: &Instruction) -> bool {
    matches!(
        instruction.as_gate().map(|g| &g.kind),
        Some(GateKind::Opaque(_))
    )
}

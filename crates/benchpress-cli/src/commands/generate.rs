//! Generate command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;

use benchpress_qasm::emit_qasm2;
use benchpress_suite::Generator;

/// Circuit families `generate` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorKind {
    /// Quantum Fourier transform
    Qft,
    /// Bernstein-Vazirani, all-ones secret
    Bv,
    /// BV-shaped circuit that simplifies to one X and one Z
    Bvlike,
    /// Circular-entanglement SU(2) ansatz
    Su2,
    /// Random quantum-volume circuit
    Qv,
}

impl GeneratorKind {
    fn generator(self, qubits: u32, seed: u64, reps: u32) -> Generator {
        match self {
            GeneratorKind::Qft => Generator::Qft { qubits },
            GeneratorKind::Bv => Generator::BvAllOnes { qubits },
            GeneratorKind::Bvlike => Generator::TrivialBvlike { qubits },
            GeneratorKind::Su2 => Generator::EfficientSu2Circular { qubits, reps, seed },
            GeneratorKind::Qv => Generator::QuantumVolume { qubits, seed },
        }
    }
}

/// Execute the generate command.
pub fn execute(kind: GeneratorKind, qubits: u32, seed: u64, reps: u32, output: Option<&Path>) -> Result<()> {
    if qubits == 0 {
        anyhow::bail!("--qubits must be at least 1");
    }
    let circuit = kind.generator(qubits, seed, reps).build();
    let qasm = emit_qasm2(&circuit);

    match output {
        Some(path) => {
            fs::write(path, qasm).with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Wrote {} ({} qubits, {} ops) to {}",
                style("✓").green().bold(),
                circuit.name(),
                circuit.num_qubits(),
                circuit.num_ops(),
                style(path.display()).green()
            );
        }
        None => print!("{qasm}"),
    }
    Ok(())
}

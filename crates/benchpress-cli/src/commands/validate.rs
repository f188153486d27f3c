//! Validate command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use benchpress_qasm::load_qasm_file;
use benchpress_validate::validate;

use super::common::load_config;

/// Execute the validate command. Returns whether the circuit conforms.
pub fn execute(config_path: Option<&Path>, input: &Path, backend: Option<&str>) -> Result<bool> {
    let config = load_config(config_path)?;
    let registry = config.registry()?;
    let backend = registry.resolve(backend.unwrap_or(&config.backend))?;

    let loaded = load_qasm_file(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let circuit = &loaded.circuit;
    println!(
        "{} Validating {} ({} qubits, {} ops) against {}",
        style("→").cyan().bold(),
        style(input.display()).green(),
        circuit.num_qubits(),
        circuit.num_ops(),
        style(backend.name()).yellow()
    );

    let report = validate(circuit, backend);
    if report.is_valid() {
        println!("{} Circuit conforms to {}", style("✓").green().bold(), backend.name());
        return Ok(true);
    }

    println!(
        "{} {} violations:",
        style("✗").red().bold(),
        report.violations().len()
    );
    for violation in report.violations().iter().take(20) {
        println!("  {violation}");
    }
    if report.violations().len() > 20 {
        println!("  ... and {} more", report.violations().len() - 20);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(qasm: &str, backend: &str) -> bool {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("compiled.qasm");
        std::fs::write(&input, qasm).unwrap();
        let config = dir.path().join("benchpress.yaml");
        std::fs::write(&config, "{}\n").unwrap();
        execute(Some(&config), &input, Some(backend)).unwrap()
    }

    #[test]
    fn test_verdicts() {
        let header = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\n";
        assert!(run(&format!("{header}cx q[0], q[1];\n"), "line-100"));
        assert!(!run(&format!("{header}cx q[0], q[2];\n"), "line-100"));
        assert!(!run(&format!("{header}h q[0];\n"), "line-100"));
    }
}

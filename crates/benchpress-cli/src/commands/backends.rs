//! Backends command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use super::common::load_config;

/// Execute the backends command.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = config.registry()?;

    println!("{} Available backends:\n", style("benchpress").cyan().bold());
    for backend in registry.backends() {
        let production = backend.name() == config.backend;
        println!(
            "  {} {}{}",
            if production {
                style("●").green()
            } else {
                style("○").dim()
            },
            style(backend.name()).bold(),
            if production { " (production)" } else { "" }
        );
        println!("    Qubits: {}", backend.num_qubits());
        println!("    Couplings: {}", backend.coupling_map().num_edges());
        println!("    2Q gate: {}", backend.two_q_gate());
        println!("    Gates: {}", backend.basis_gates().join(", "));
        println!();
    }
    Ok(())
}

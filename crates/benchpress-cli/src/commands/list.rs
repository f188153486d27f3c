//! List command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use super::common::{load_config, select_cases};

/// Execute the list command.
pub fn execute(
    config_path: Option<&Path>,
    workouts: &[String],
    include: &[String],
    exclude: &[String],
) -> Result<()> {
    let config = load_config(config_path)?;
    let cases = select_cases(&config, workouts, include, exclude)?;

    for case in &cases {
        println!("{}", case.qualified_name());
    }
    println!("\n{} cases selected", style(cases.len()).bold());
    Ok(())
}

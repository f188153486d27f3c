//! Run command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use benchpress_bench::{DEPTH_2Q, GATE_COUNT_2Q};
use benchpress_compile::OptimizationLevel;
use benchpress_suite::{CaseOutcome, Configuration, SuiteDriver, SuiteReport};

use super::common::{load_config, select_cases};

/// Command-line settings of `benchpress run`.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub workouts: Vec<String>,
    pub backend: Option<String>,
    pub optimization_level: Option<u8>,
    pub rounds: Option<u32>,
    pub compiler: Option<String>,
    pub compiler_command: Option<String>,
    pub output: Option<PathBuf>,
}

impl RunOptions {
    /// Command-line flags take precedence over file and environment.
    fn apply(&self, config: &mut Configuration) -> Result<()> {
        if let Some(backend) = &self.backend {
            config.backend.clone_from(backend);
        }
        if let Some(level) = self.optimization_level {
            config.compiler.optimization_level =
                OptimizationLevel::try_from(level).map_err(anyhow::Error::msg)?;
        }
        if let Some(rounds) = self.rounds {
            config.benchmark.rounds = rounds;
        }
        if let Some(compiler) = &self.compiler {
            config.compiler.kind = compiler.parse()?;
        }
        if let Some(command) = &self.compiler_command {
            config.compiler.command = Some(command.clone());
        }
        Ok(())
    }
}

/// Execute the run command. Returns whether every case passed.
pub fn execute(config_path: Option<&Path>, options: RunOptions) -> Result<bool> {
    let mut config = load_config(config_path)?;
    options.apply(&mut config)?;

    let cases = select_cases(&config, &options.workouts, &options.include, &options.exclude)?;
    if cases.is_empty() {
        println!("{} No cases selected", style("!").yellow().bold());
        return Ok(true);
    }

    let driver = SuiteDriver::new(config)?;
    println!(
        "{} Running {} cases on {} (compiler {}, level {})",
        style("→").cyan().bold(),
        style(cases.len()).bold(),
        style(driver.production_backend().name()).yellow(),
        style(&driver.config().compiler.kind).green(),
        driver.optimization_level()
    );

    let bar = ProgressBar::new(cases.len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} {msg}")?);
    let report = driver.run_with(&cases, |outcome| {
        bar.set_message(outcome.id.clone());
        bar.inc(1);
        if let Some(failure) = outcome.failure() {
            bar.println(format!(
                "  {} {}: {failure}",
                style("✗").red().bold(),
                outcome.id
            ));
        }
    })?;
    bar.finish_and_clear();

    print_summary(&report);

    if let Some(path) = &options.output {
        report
            .benchmark_report()
            .to_file(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("  Report: {}", style(path.display()).green());
    }

    Ok(report.all_passed())
}

fn print_summary(report: &SuiteReport) {
    println!();
    for outcome in report.outcomes() {
        print_outcome(outcome);
    }

    let passed = report.passed().count();
    let failed = report.failed().count();
    println!();
    if failed == 0 {
        println!("{} {passed} passed", style("✓").green().bold());
    } else {
        println!(
            "{} {passed} passed, {} failed",
            style("✗").red().bold(),
            style(failed).red()
        );
    }
}

fn print_outcome(outcome: &CaseOutcome) {
    let mark = if outcome.passed() {
        style("✓").green()
    } else {
        style("✗").red()
    };
    let mean_ms = outcome
        .record
        .stats
        .as_ref()
        .map_or_else(|| "-".to_string(), |s| format!("{:.2} ms", s.mean * 1e3));
    let metric = |name| {
        outcome
            .record
            .extra_info
            .get(name)
            .map_or_else(|| "-".to_string(), |v| format!("{v}"))
    };
    println!(
        "  {mark} {:<48} {:>12}  2q gates {:>8}  2q depth {:>8}",
        outcome.record.name,
        mean_ms,
        metric(GATE_COUNT_2Q),
        metric(DEPTH_2Q)
    );
}

#[cfg(test)]
mod tests {
    use benchpress_suite::CompilerKind;

    use super::*;

    #[test]
    fn test_flags_override_config() {
        let mut config = Configuration::default();
        let options = RunOptions {
            backend: Some("grid-100".into()),
            optimization_level: Some(3),
            rounds: Some(1),
            compiler: Some("external".into()),
            compiler_command: Some("transpile.sh".into()),
            ..RunOptions::default()
        };
        options.apply(&mut config).unwrap();
        assert_eq!(config.backend, "grid-100");
        assert_eq!(config.compiler.optimization_level, OptimizationLevel::O3);
        assert_eq!(config.benchmark.rounds, 1);
        assert_eq!(config.compiler.kind, CompilerKind::External);
        config.validate().unwrap();
    }

    #[test]
    fn test_bad_flags() {
        let mut config = Configuration::default();
        let options = RunOptions {
            optimization_level: Some(9),
            ..RunOptions::default()
        };
        assert!(options.apply(&mut config).is_err());

        let options = RunOptions {
            compiler: Some("qiskit".into()),
            ..RunOptions::default()
        };
        assert!(options.apply(&mut config).is_err());
    }

    #[test]
    fn test_run_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");
        let options = RunOptions {
            include: vec!["BVlike".into()],
            workouts: vec!["device_transpile_100q".into()],
            rounds: Some(1),
            output: Some(output.clone()),
            ..RunOptions::default()
        };
        let config_path = dir.path().join("benchpress.yaml");
        std::fs::write(&config_path, "backend: heavy-hex-127\n").unwrap();

        assert!(execute(Some(&config_path), options).unwrap());
        let json = std::fs::read_to_string(output).unwrap();
        assert!(json.contains("BVlike_simplification"));
        assert!(json.contains("gate_count_2q"));
    }
}

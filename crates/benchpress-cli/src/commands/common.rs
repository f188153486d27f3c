//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use benchpress_suite::{CaseFilter, Configuration, SuiteCase, Workout, collect_cases};

/// Load configuration from file and environment.
pub fn load_config(path: Option<&Path>) -> Result<Configuration> {
    Configuration::load(path).context("Failed to load configuration")
}

/// Cases of the named workouts (all when empty) that pass the name filter.
pub fn select_cases(
    config: &Configuration,
    workouts: &[String],
    include: &[String],
    exclude: &[String],
) -> Result<Vec<SuiteCase>> {
    let workouts: Vec<Workout> = if workouts.is_empty() {
        Workout::ALL.to_vec()
    } else {
        workouts
            .iter()
            .map(|name| name.parse::<Workout>())
            .collect::<Result<_, _>>()?
    };

    let filter = include
        .iter()
        .fold(CaseFilter::new(), |filter, pattern| filter.include(pattern.as_str()));
    let filter = exclude
        .iter()
        .fold(filter, |filter, pattern| filter.exclude(pattern.as_str()));

    let cases = filter.apply(collect_cases(&workouts, config)?);
    debug!(workouts = workouts.len(), cases = cases.len(), "Selected cases");
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_device_cases() {
        let config = Configuration::default();
        let cases = select_cases(
            &config,
            &["device_transpile_100q".into()],
            &["BV".into()],
            &["like".into()],
        )
        .unwrap();
        let ids: Vec<_> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["BV_100"]);
    }

    #[test]
    fn test_unknown_workout() {
        let config = Configuration::default();
        assert!(select_cases(&config, &["summit".into()], &[], &[]).is_err());
    }
}

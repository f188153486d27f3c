//! Case selection by name.

use crate::workout::SuiteCase;

/// Substring filter over qualified case names (`<workout>::<id>`).
///
/// A case is selected when it matches any include pattern (or there are
/// none) and no exclude pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl CaseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    pub fn matches(&self, case: &SuiteCase) -> bool {
        let name = case.qualified_name();
        let included = self.include.is_empty() || self.include.iter().any(|p| name.contains(p.as_str()));
        included && !self.exclude.iter().any(|p| name.contains(p.as_str()))
    }

    /// Selected cases, order preserved.
    pub fn apply(&self, cases: Vec<SuiteCase>) -> Vec<SuiteCase> {
        cases.into_iter().filter(|case| self.matches(case)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::workout::Workout;

    fn ids(filter: &CaseFilter) -> Vec<String> {
        let cases = Workout::DeviceTranspile100Q
            .cases(&Configuration::default())
            .unwrap();
        filter.apply(cases).into_iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_empty_filter_selects_all() {
        assert_eq!(ids(&CaseFilter::new()).len(), 7);
    }

    #[test]
    fn test_include_any_exclude_none() {
        let filter = CaseFilter::new().include("BV").include("QFT");
        assert_eq!(ids(&filter), ["QFT_100", "BV_100", "BVlike_simplification"]);

        let filter = filter.exclude("like");
        assert_eq!(ids(&filter), ["QFT_100", "BV_100"]);

        let filter = CaseFilter::new().include("device_transpile_100q::Q");
        assert_eq!(ids(&filter), ["QFT_100", "QV_100", "QAOA_100"]);
    }
}

//! Runner settings.

use serde::{Deserialize, Serialize};

/// How many times each compilation is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// Timed compilations per case.
    pub rounds: u32,
    /// Untimed compilations before timing starts.
    pub warmup_rounds: u32,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            rounds: 3,
            warmup_rounds: 0,
        }
    }
}

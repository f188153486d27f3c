//! Benchmark records and the JSON report sink.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{BenchError, BenchResult};
use crate::metrics::Metrics;
use crate::stats::TimingStats;

/// One benchmarked case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Case identifier, e.g. `qft_n18-heavy-hex`.
    pub name: String,
    /// Workout the case belongs to.
    pub group: String,
    /// Case parameters such as the topology.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Timing summary; absent when the case failed before compiling.
    pub stats: Option<TimingStats>,
    /// Named metrics attached to the case.
    #[serde(default)]
    pub extra_info: Metrics,
}

impl BenchmarkRecord {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            params: BTreeMap::new(),
            stats: None,
            extra_info: Metrics::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// All records of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub run_id: Uuid,
    pub datetime: DateTime<Utc>,
    pub compiler: String,
    pub optimization_level: u8,
    /// Production backend of the run.
    pub backend: String,
    pub benchmarks: Vec<BenchmarkRecord>,
}

impl BenchmarkReport {
    /// Start an empty report stamped with a fresh run id and the current time.
    pub fn new(compiler: impl Into<String>, optimization_level: u8, backend: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            datetime: Utc::now(),
            compiler: compiler.into(),
            optimization_level,
            backend: backend.into(),
            benchmarks: Vec::new(),
        }
    }

    pub fn push(&mut self, record: BenchmarkRecord) {
        self.benchmarks.push(record);
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> BenchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as JSON to `path`.
    pub fn to_file(&self, path: impl AsRef<Path>) -> BenchResult<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| BenchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), records = self.benchmarks.len(), "Wrote benchmark report");
        Ok(())
    }
}

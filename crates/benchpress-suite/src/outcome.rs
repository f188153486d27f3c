//! Per-case outcomes and the run summary.

use benchpress_bench::{BenchError, BenchmarkRecord, BenchmarkReport};
use benchpress_compile::CompileError;
use benchpress_qasm::ParseError;
use benchpress_target::ConfigurationError;
use benchpress_validate::ValidationReport;
use thiserror::Error;

use crate::workout::Workout;

/// Why a case failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CaseFailure {
    /// The circuit file is missing or malformed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The backend cannot host the circuit. Raised before compiling.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The compiler failed.
    #[error("compile failure: {0}")]
    Compile(#[from] CompileError),

    /// The benchmark could not be recorded.
    #[error("benchmark error: {0}")]
    Benchmark(BenchError),

    /// The compiled circuit does not conform to the backend.
    #[error("validation failure: {0}")]
    Validation(ValidationReport),
}

impl From<BenchError> for CaseFailure {
    fn from(err: BenchError) -> Self {
        match err {
            BenchError::Compile(err) => CaseFailure::Compile(err),
            other => CaseFailure::Benchmark(other),
        }
    }
}

/// Terminal state of a case.
#[derive(Debug)]
pub enum CaseStatus {
    Passed,
    Failed(CaseFailure),
}

/// Result of running one case.
#[derive(Debug)]
pub struct CaseOutcome {
    pub id: String,
    pub workout: Workout,
    pub status: CaseStatus,
    /// Timing and metrics, as far as the case got.
    pub record: BenchmarkRecord,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        matches!(self.status, CaseStatus::Passed)
    }

    pub fn failure(&self) -> Option<&CaseFailure> {
        match &self.status {
            CaseStatus::Passed => None,
            CaseStatus::Failed(failure) => Some(failure),
        }
    }
}

/// Outcomes of a run, in execution order.
#[derive(Debug)]
pub struct SuiteReport {
    outcomes: Vec<CaseOutcome>,
    benchmark: BenchmarkReport,
}

impl SuiteReport {
    /// An empty report; `benchmark` receives each outcome's record.
    pub fn new(benchmark: BenchmarkReport) -> Self {
        Self {
            outcomes: Vec::new(),
            benchmark,
        }
    }

    pub fn push(&mut self, outcome: CaseOutcome) {
        self.benchmark.push(outcome.record.clone());
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    pub fn passed(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| o.passed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// True when every case passed. An empty run passes.
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    /// Records of every case, for the JSON sink.
    pub fn benchmark_report(&self) -> &BenchmarkReport {
        &self.benchmark
    }
}

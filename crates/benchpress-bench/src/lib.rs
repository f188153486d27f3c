//! Benchmarking of circuit compilers.
//!
//! - [`BenchmarkRunner`]: compiles one circuit for one backend a configured
//!   number of times and returns the last result with [`TimingStats`] and
//!   quality [`Metrics`] (`gate_count_2q`, `depth_2q`).
//! - [`BenchmarkRecord`] / [`BenchmarkReport`]: the per-case record and the
//!   JSON report a run writes.
//! - [`generators`]: circuits the suite builds in code (QFT, BV, SU2, QV).
//!
//! ```rust
//! use benchpress_bench::{BenchmarkRunner, GATE_COUNT_2Q, generators};
//! use benchpress_compile::{BaselineCompiler, OptimizationLevel};
//! use benchpress_target::{Backend, TopologySpec};
//!
//! let circuit = generators::qft(4);
//! let backend = Backend::flexible(4, &TopologySpec::Ring).unwrap();
//! let outcome = BenchmarkRunner::default()
//!     .run(&circuit, &backend, &BaselineCompiler, OptimizationLevel::O1)
//!     .unwrap();
//! assert!(outcome.metrics.get(GATE_COUNT_2Q).unwrap() > 0.0);
//! ```

pub mod error;
pub mod generators;
pub mod metrics;
pub mod record;
pub mod runner;
pub mod settings;
pub mod stats;

pub use error::{BenchError, BenchResult};
pub use metrics::{DEPTH_2Q, GATE_COUNT_2Q, Metrics, QASM_LOAD_TIME, quality_metrics};
pub use record::{BenchmarkRecord, BenchmarkReport};
pub use runner::{BenchmarkOutcome, BenchmarkRunner};
pub use settings::BenchmarkSettings;
pub use stats::TimingStats;

//! Benchmark suite driver for benchpress.
//!
//! A run is described by a [`Configuration`] and a list of [`SuiteCase`]s,
//! usually expanded from [`Workout`]s. The [`SuiteDriver`] runs every case
//! through load, backend resolution, timed compilation and validation, and
//! collects a [`SuiteReport`]. A failing case never stops the others.
//!
//! ```rust
//! use benchpress_suite::{CaseFilter, Configuration, SuiteDriver, Workout};
//!
//! let mut config = Configuration::default();
//! config.benchmark.rounds = 1;
//! let cases = CaseFilter::new()
//!     .include("BV_100")
//!     .apply(Workout::DeviceTranspile100Q.cases(&config).unwrap());
//!
//! let report = SuiteDriver::new(config).unwrap().run(&cases).unwrap();
//! assert!(report.all_passed());
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod outcome;
pub mod workout;

pub use config::{CompilerKind, CompilerSettings, Configuration};
pub use driver::{CompilerFactory, SuiteDriver};
pub use error::{SuiteError, SuiteResult};
pub use filter::CaseFilter;
pub use outcome::{CaseFailure, CaseOutcome, CaseStatus, SuiteReport};
pub use workout::{BackendRequest, CircuitSource, Generator, SuiteCase, Workout, collect_cases};

//! The suite driver.
//!
//! Each case runs the same single-shot pipeline:
//!
//! ```text
//! Load -> Resolve backend -> Check capacity -> Compile x rounds -> Validate
//! ```
//!
//! The first failing step ends the case; later cases still run.
//!
//! Consecutive cases of the same workout form a group. Each group gets a
//! fresh compiler from the driver's factory, dropped when the group ends.

use benchpress_bench::{BenchmarkRecord, BenchmarkReport, BenchmarkRunner, QASM_LOAD_TIME};
use benchpress_compile::{Compiler, OptimizationLevel};
use benchpress_ir::Circuit;
use benchpress_qasm::load_qasm_file;
use benchpress_target::{Backend, require_capacity};
use benchpress_validate::validate;
use tracing::{debug, info, instrument, warn};

use crate::config::Configuration;
use crate::error::SuiteResult;
use crate::outcome::{CaseFailure, CaseOutcome, CaseStatus, SuiteReport};
use crate::workout::{BackendRequest, CircuitSource, SuiteCase};

/// Builds the compiler for one workout group.
pub type CompilerFactory = Box<dyn Fn() -> SuiteResult<Box<dyn Compiler>> + Send + Sync>;

/// Runs cases against one compiler configuration and one production backend.
pub struct SuiteDriver {
    config: Configuration,
    production: Backend,
    factory: CompilerFactory,
    runner: BenchmarkRunner,
}

impl SuiteDriver {
    /// A driver for the compiler described by `config`.
    pub fn new(config: Configuration) -> SuiteResult<Self> {
        let settings = config.clone();
        Self::with_compiler_factory(config, move || settings.build_compiler())
    }

    /// A driver that builds its compilers with `factory`.
    ///
    /// The configuration is validated and the production backend resolved
    /// here, once for the whole run.
    pub fn with_compiler_factory(
        config: Configuration,
        factory: impl Fn() -> SuiteResult<Box<dyn Compiler>> + Send + Sync + 'static,
    ) -> SuiteResult<Self> {
        config.validate()?;
        let production = config.registry()?.resolve(&config.backend)?.clone();
        info!(
            backend = production.name(),
            qubits = production.num_qubits(),
            level = %config.compiler.optimization_level,
            "Suite driver ready"
        );
        Ok(Self {
            runner: BenchmarkRunner::new(config.benchmark),
            config,
            production,
            factory: Box::new(factory),
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn production_backend(&self) -> &Backend {
        &self.production
    }

    pub fn optimization_level(&self) -> OptimizationLevel {
        self.config.compiler.optimization_level
    }

    /// An empty benchmark report for a run of `compiler`.
    pub fn new_report(&self, compiler: &str) -> BenchmarkReport {
        BenchmarkReport::new(
            compiler,
            self.optimization_level().as_u8(),
            self.production.name(),
        )
    }

    /// Run every case in order.
    pub fn run(&self, cases: &[SuiteCase]) -> SuiteResult<SuiteReport> {
        self.run_with(cases, |_| {})
    }

    /// Run every case in order, calling `on_case` after each one.
    ///
    /// Fails only when a compiler cannot be built; case failures are
    /// recorded in the report.
    pub fn run_with(
        &self,
        cases: &[SuiteCase],
        mut on_case: impl FnMut(&CaseOutcome),
    ) -> SuiteResult<SuiteReport> {
        let mut report: Option<SuiteReport> = None;
        for group in cases.chunk_by(|a, b| a.workout == b.workout) {
            let compiler = (self.factory)()?;
            debug!(
                workout = %group[0].workout,
                compiler = compiler.name(),
                cases = group.len(),
                "Compiler ready"
            );
            let report =
                report.get_or_insert_with(|| SuiteReport::new(self.new_report(compiler.name())));
            for case in group {
                let outcome = self.run_case(compiler.as_ref(), case);
                on_case(&outcome);
                report.push(outcome);
            }
        }

        let report = match report {
            Some(report) => report,
            None => SuiteReport::new(self.new_report((self.factory)()?.name())),
        };
        info!(
            passed = report.passed().count(),
            failed = report.failed().count(),
            "Suite finished"
        );
        Ok(report)
    }

    /// Run one case through the whole pipeline.
    #[instrument(skip_all, fields(case = %case.qualified_name(), compiler = compiler.name()))]
    pub fn run_case(&self, compiler: &dyn Compiler, case: &SuiteCase) -> CaseOutcome {
        let mut record = BenchmarkRecord::new(case.id.clone(), case.workout.name());
        let status = match self.execute(compiler, case, &mut record) {
            Ok(()) => {
                info!("Passed");
                CaseStatus::Passed
            }
            Err(failure) => {
                warn!("Failed: {failure}");
                CaseStatus::Failed(failure)
            }
        };
        CaseOutcome {
            id: case.id.clone(),
            workout: case.workout,
            status,
            record,
        }
    }

    fn execute(
        &self,
        compiler: &dyn Compiler,
        case: &SuiteCase,
        record: &mut BenchmarkRecord,
    ) -> Result<(), CaseFailure> {
        let circuit = self.load(&case.source, record)?;
        let num_qubits = u32::try_from(circuit.num_qubits()).unwrap_or(u32::MAX);

        let flexible;
        let backend = match &case.backend {
            BackendRequest::Production => &self.production,
            BackendRequest::Flexible { topology } => {
                record.params.insert("topology".into(), topology.name());
                flexible = Backend::flexible(num_qubits, topology)?;
                &flexible
            }
        };
        record.params.insert("backend".into(), backend.name().to_string());
        require_capacity(backend, num_qubits)?;

        let outcome = self.runner.run(
            &circuit,
            backend,
            compiler,
            self.optimization_level(),
        )?;
        record.stats = Some(outcome.stats);
        record.extra_info.extend(outcome.metrics).map_err(CaseFailure::Benchmark)?;

        let report = validate(&outcome.compiled, backend);
        if report.is_valid() {
            Ok(())
        } else {
            Err(CaseFailure::Validation(report))
        }
    }

    fn load(&self, source: &CircuitSource, record: &mut BenchmarkRecord) -> Result<Circuit, CaseFailure> {
        let path = match source {
            CircuitSource::Generated { generator } => return Ok(generator.build()),
            CircuitSource::Corpus { family, file } => self.config.corpus_dir(family).join(file),
            CircuitSource::File { path } => path.clone(),
        };
        let loaded = load_qasm_file(path)?;
        record
            .extra_info
            .insert(QASM_LOAD_TIME, loaded.load_time.as_secs_f64())
            .map_err(CaseFailure::Benchmark)?;
        Ok(loaded.circuit)
    }
}

//! End-to-end suite scenarios on a temporary corpus.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use benchpress_bench::{DEPTH_2Q, GATE_COUNT_2Q, QASM_LOAD_TIME, generators};
use benchpress_compile::{BaselineCompiler, CompileResult, Compiler, OptimizationLevel};
use benchpress_ir::Circuit;
use benchpress_qasm::emit_qasm2;
use benchpress_suite::{
    CaseFailure, CaseFilter, CaseStatus, Configuration, SuiteCase, SuiteDriver, SuiteResult,
    Workout,
};
use benchpress_target::{Backend, ConfigurationError, TopologySpec};
use benchpress_validate::Violation;

/// Baseline compiler that counts its invocations.
struct Counting {
    calls: Arc<AtomicUsize>,
}

impl Compiler for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn compile(
        &self,
        circuit: &Circuit,
        backend: &Backend,
        level: OptimizationLevel,
    ) -> CompileResult<Circuit> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        BaselineCompiler.compile(circuit, backend, level)
    }
}

/// Returns its input untouched.
struct Passthrough;

impl Compiler for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn compile(&self, circuit: &Circuit, _: &Backend, _: OptimizationLevel) -> CompileResult<Circuit> {
        Ok(circuit.clone())
    }
}

/// Builds `Counting` compilers, counting constructions in `built`.
fn counting_factory(
    built: &Arc<AtomicUsize>,
    calls: &Arc<AtomicUsize>,
) -> impl Fn() -> SuiteResult<Box<dyn Compiler>> + Send + Sync + 'static {
    let built = Arc::clone(built);
    let calls = Arc::clone(calls);
    move || {
        built.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Counting {
            calls: Arc::clone(&calls),
        }) as Box<dyn Compiler>)
    }
}

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn quick_config() -> Configuration {
    let mut config = Configuration::default();
    config.benchmark.rounds = 1;
    config
}

fn device_cases(config: &Configuration, pattern: &str) -> Vec<SuiteCase> {
    CaseFilter::new()
        .include(pattern)
        .apply(Workout::DeviceTranspile100Q.cases(config).unwrap())
}

#[test]
fn test_qft_100_on_production_backend() {
    let dir = tempfile::tempdir().unwrap();
    let qft_dir = dir.path().join("qft");
    write(&qft_dir.join("qft_N100.qasm"), &emit_qasm2(&generators::qft(100)));

    let mut config = quick_config();
    config.corpus.insert("qft".into(), qft_dir);
    let cases = device_cases(&config, "QFT_100");
    assert_eq!(cases.len(), 1);

    let driver = SuiteDriver::new(config).unwrap();
    assert_eq!(driver.production_backend().name(), "heavy-hex-127");
    let report = driver.run(&cases).unwrap();
    assert!(report.all_passed(), "{:?}", report.outcomes()[0].failure());

    let record = &report.outcomes()[0].record;
    // Every controlled phase needs at least one two-qubit gate.
    assert!(record.extra_info.get(GATE_COUNT_2Q).unwrap() >= 4950.0);
    assert!(record.extra_info.get(DEPTH_2Q).unwrap() > 0.0);
    assert!(record.extra_info.get(QASM_LOAD_TIME).unwrap() >= 0.0);
    assert_eq!(record.stats.as_ref().unwrap().rounds, 1);
    assert_eq!(record.params["backend"], "heavy-hex-127");
}

#[test]
fn test_ring_backend_accepts_routed_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("qasmbench");
    write(
        &root.join("small/ring_walk.qasm"),
        r#"OPENQASM 2.0;
include "qelib1.inc";
qreg q[6];
creg c[6];
h q[0];
cx q[0], q[1];
cx q[1], q[2];
cx q[2], q[3];
cx q[3], q[4];
cx q[4], q[5];
cx q[5], q[0];
measure q -> c;
"#,
    );

    let mut config = quick_config();
    config.corpus.insert("qasmbench".into(), root);
    config.abstract_topologies = vec![TopologySpec::Ring, TopologySpec::Line];
    let cases = Workout::AbstractQasmBenchSmall.cases(&config).unwrap();
    assert_eq!(cases.len(), 2);

    let report = SuiteDriver::new(config).unwrap().run(&cases).unwrap();
    assert!(report.all_passed());

    let ring = &report.outcomes()[0];
    assert_eq!(ring.id, "ring_walk-ring");
    assert_eq!(ring.record.params["topology"], "ring");
    assert_eq!(ring.record.extra_info.get(GATE_COUNT_2Q), Some(6.0));

    // The line lacks the 5-0 edge, so the compiler had to route.
    let line = &report.outcomes()[1];
    assert_eq!(line.id, "ring_walk-line");
    assert!(line.record.extra_info.get(GATE_COUNT_2Q).unwrap() > 6.0);
}

#[test]
fn test_small_backend_fails_before_compiling() {
    let mut config = Configuration::from_yaml(
        r"
backend: tiny-5
backends:
  - name: tiny-5
    topology: line
    num_qubits: 5
benchmark:
  rounds: 1
",
    )
    .unwrap();
    config.benchmark.warmup_rounds = 1;

    let calls = Arc::new(AtomicUsize::new(0));
    let built = Arc::new(AtomicUsize::new(0));
    let cases = device_cases(&config, "BV_100");
    let driver =
        SuiteDriver::with_compiler_factory(config, counting_factory(&built, &calls)).unwrap();
    let report = driver.run(&cases).unwrap();

    let outcome = &report.outcomes()[0];
    assert!(matches!(
        &outcome.status,
        CaseStatus::Failed(CaseFailure::Configuration(ConfigurationError::InsufficientQubits {
            available: 5,
            required: 100,
            ..
        }))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(outcome.record.stats.is_none());
}

#[test]
fn test_failures_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = quick_config();
    config.corpus.insert("qv".into(), dir.path().join("qv"));

    let cases: Vec<_> = Workout::DeviceTranspile100Q
        .cases(&config)
        .unwrap()
        .into_iter()
        .filter(|c| c.id == "QV_100" || c.id == "BVlike_simplification")
        .collect();
    let report = SuiteDriver::new(config).unwrap().run(&cases).unwrap();

    assert!(!report.all_passed());
    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, "QV_100");
    assert!(matches!(failed[0].failure(), Some(CaseFailure::Parse(_))));
    assert_eq!(report.passed().next().unwrap().id, "BVlike_simplification");
    assert_eq!(report.benchmark_report().len(), 2);
}

#[test]
fn test_non_conforming_output_is_a_validation_failure() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("qasmbench");
    write(
        &root.join("large/far_cx.qasm"),
        "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[4];\ncz q[0], q[3];\n",
    );

    let mut config = quick_config();
    config.corpus.insert("qasmbench".into(), root);
    config.abstract_topologies = vec![TopologySpec::Line];
    let cases = Workout::AbstractQasmBenchLarge.cases(&config).unwrap();

    let driver = SuiteDriver::with_compiler_factory(config, || {
        Ok(Box::new(Passthrough) as Box<dyn Compiler>)
    })
    .unwrap();
    let report = driver.run(&cases).unwrap();
    let outcome = &report.outcomes()[0];
    let Some(CaseFailure::Validation(validation)) = outcome.failure() else {
        panic!("expected a validation failure, got {:?}", outcome.status);
    };
    assert!(matches!(
        validation.violations(),
        [Violation::DisconnectedPair { index: 0, .. }]
    ));
    assert!(outcome.record.stats.is_some());
    assert_eq!(outcome.record.extra_info.get(GATE_COUNT_2Q), Some(1.0));
}

#[test]
fn test_each_workout_gets_its_own_compiler() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("qasmbench");
    write(
        &root.join("small/ghz_n3.qasm"),
        "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\nh q[0];\ncx q[0], q[1];\ncx q[1], q[2];\n",
    );

    let mut config = quick_config();
    config.corpus.insert("qasmbench".into(), root);
    config.abstract_topologies = vec![TopologySpec::Line];

    let mut cases = device_cases(&config, "BV");
    assert_eq!(cases.len(), 2);
    cases.extend(Workout::AbstractQasmBenchSmall.cases(&config).unwrap());
    assert_eq!(cases.len(), 3);

    let calls = Arc::new(AtomicUsize::new(0));
    let built = Arc::new(AtomicUsize::new(0));
    let driver =
        SuiteDriver::with_compiler_factory(config, counting_factory(&built, &calls)).unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 0);

    let report = driver.run(&cases).unwrap();
    assert!(report.all_passed());
    // One compiler for the two device cases, one for the QASMBench case.
    assert_eq!(built.load(Ordering::SeqCst), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.benchmark_report().compiler, "counting");
}

#[test]
fn test_empty_run_still_names_the_compiler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let built = Arc::new(AtomicUsize::new(0));
    let driver =
        SuiteDriver::with_compiler_factory(quick_config(), counting_factory(&built, &calls))
            .unwrap();
    let report = driver.run(&[]).unwrap();
    assert!(report.outcomes().is_empty());
    assert_eq!(report.benchmark_report().compiler, "counting");
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

//! Timed compilation of one (circuit, backend) pair.

use std::time::Instant;

use benchpress_compile::{Compiler, OptimizationLevel};
use benchpress_ir::Circuit;
use benchpress_target::Backend;
use tracing::{debug, instrument};

use crate::error::{BenchError, BenchResult};
use crate::metrics::{Metrics, quality_metrics};
use crate::settings::BenchmarkSettings;
use crate::stats::TimingStats;

/// What one benchmark invocation produced.
#[derive(Debug, Clone)]
pub struct BenchmarkOutcome {
    /// Circuit returned by the last timed round.
    pub compiled: Circuit,
    pub stats: TimingStats,
    /// `gate_count_2q` and `depth_2q` of `compiled`.
    pub metrics: Metrics,
}

/// Repeatedly compiles a circuit and summarizes the timings.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRunner {
    settings: BenchmarkSettings,
}

impl BenchmarkRunner {
    pub fn new(settings: BenchmarkSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BenchmarkSettings {
        &self.settings
    }

    /// Compile `circuit` for `backend` once per round.
    ///
    /// Warmup rounds run first and are not timed. Each round calls the
    /// compiler afresh on the borrowed input, so no state from one round
    /// reaches the next through the harness. The first compile error ends
    /// the benchmark.
    #[instrument(skip_all, fields(
        circuit = circuit.name(),
        backend = backend.name(),
        compiler = compiler.name(),
        level = %level,
    ))]
    pub fn run(
        &self,
        circuit: &Circuit,
        backend: &Backend,
        compiler: &dyn Compiler,
        level: OptimizationLevel,
    ) -> BenchResult<BenchmarkOutcome> {
        if self.settings.rounds == 0 {
            return Err(BenchError::NoRounds);
        }

        for _ in 0..self.settings.warmup_rounds {
            compiler.compile(circuit, backend, level)?;
        }

        let mut samples = Vec::with_capacity(self.settings.rounds as usize);
        let mut last = None;
        for round in 0..self.settings.rounds {
            let start = Instant::now();
            let compiled = compiler.compile(circuit, backend, level)?;
            let elapsed = start.elapsed();
            debug!(round, elapsed_ms = elapsed.as_secs_f64() * 1e3, "Compiled");
            samples.push(elapsed);
            last = Some(compiled);
        }

        let (Some(compiled), Some(stats)) = (last, TimingStats::from_samples(&samples)) else {
            return Err(BenchError::NoRounds);
        };
        let metrics = quality_metrics(&compiled, backend.two_q_gate());
        debug!(
            mean_s = stats.mean,
            gate_count_2q = metrics.get(crate::metrics::GATE_COUNT_2Q),
            "Benchmark finished"
        );

        Ok(BenchmarkOutcome {
            compiled,
            stats,
            metrics,
        })
    }
}

//! Workouts: the named groups of benchmark cases.
//!
//! A workout expands into an ordered list of [`SuiteCase`]s. Device workouts
//! compile fixed circuits against the production backend; abstract workouts
//! cross every QASMBench file of one size class with the configured abstract
//! topologies, sizing a flexible backend to each circuit.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use benchpress_bench::generators;
use benchpress_ir::Circuit;
use benchpress_target::TopologySpec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::error::{SuiteError, SuiteResult};

/// Seed of the generated SU(2) ansatz angles.
const SU2_SEED: u64 = 0;

/// A named group of cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workout {
    /// Seven 100-qubit circuits on the production backend.
    DeviceTranspile100Q,
    AbstractQasmBenchSmall,
    AbstractQasmBenchMedium,
    AbstractQasmBenchLarge,
}

impl Workout {
    /// Every workout, in run order.
    pub const ALL: [Workout; 4] = [
        Workout::DeviceTranspile100Q,
        Workout::AbstractQasmBenchSmall,
        Workout::AbstractQasmBenchMedium,
        Workout::AbstractQasmBenchLarge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Workout::DeviceTranspile100Q => "device_transpile_100q",
            Workout::AbstractQasmBenchSmall => "abstract_qasmbench_small",
            Workout::AbstractQasmBenchMedium => "abstract_qasmbench_medium",
            Workout::AbstractQasmBenchLarge => "abstract_qasmbench_large",
        }
    }

    /// Expand into cases, in declaration order.
    pub fn cases(self, config: &Configuration) -> SuiteResult<Vec<SuiteCase>> {
        match self {
            Workout::DeviceTranspile100Q => Ok(device_transpile_100q()),
            Workout::AbstractQasmBenchSmall => qasmbench_cases(self, "small", config),
            Workout::AbstractQasmBenchMedium => qasmbench_cases(self, "medium", config),
            Workout::AbstractQasmBenchLarge => qasmbench_cases(self, "large", config),
        }
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Workout {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workout::ALL
            .into_iter()
            .find(|w| w.name() == s)
            .ok_or_else(|| SuiteError::InvalidConfig(format!("unknown workout '{s}'")))
    }
}

/// Cases of all given workouts, concatenated in order.
pub fn collect_cases(workouts: &[Workout], config: &Configuration) -> SuiteResult<Vec<SuiteCase>> {
    let mut cases = Vec::new();
    for workout in workouts {
        cases.extend(workout.cases(config)?);
    }
    Ok(cases)
}

/// One (circuit, backend) pair to benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteCase {
    /// Identifier, unique within the workout.
    pub id: String,
    pub workout: Workout,
    pub source: CircuitSource,
    pub backend: BackendRequest,
}

impl SuiteCase {
    /// `<workout>::<id>`, the name filters match against.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.workout, self.id)
    }
}

/// Where a case's circuit comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CircuitSource {
    /// A file in a configured corpus family directory.
    Corpus { family: String, file: String },
    /// A file path.
    File { path: PathBuf },
    /// A circuit built in code.
    Generated { generator: Generator },
}

impl CircuitSource {
    fn corpus(family: &str, file: &str) -> Self {
        CircuitSource::Corpus {
            family: family.into(),
            file: file.into(),
        }
    }

    /// The file to load, or `None` for generated circuits.
    pub fn path(&self, config: &Configuration) -> Option<PathBuf> {
        match self {
            CircuitSource::Corpus { family, file } => Some(config.corpus_dir(family).join(file)),
            CircuitSource::File { path } => Some(path.clone()),
            CircuitSource::Generated { .. } => None,
        }
    }
}

/// Circuits the suite builds instead of loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Generator {
    Qft { qubits: u32 },
    BvAllOnes { qubits: u32 },
    TrivialBvlike { qubits: u32 },
    EfficientSu2Circular { qubits: u32, reps: u32, seed: u64 },
    QuantumVolume { qubits: u32, seed: u64 },
}

impl Generator {
    pub fn build(self) -> Circuit {
        match self {
            Generator::Qft { qubits } => generators::qft(qubits),
            Generator::BvAllOnes { qubits } => generators::bv_all_ones(qubits),
            Generator::TrivialBvlike { qubits } => generators::trivial_bvlike(qubits),
            Generator::EfficientSu2Circular { qubits, reps, seed } => {
                generators::efficient_su2_circular(qubits, reps, seed)
            }
            Generator::QuantumVolume { qubits, seed } => generators::quantum_volume(qubits, seed),
        }
    }
}

/// The backend a case compiles for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendRequest {
    /// The run's configured production backend.
    Production,
    /// A backend of the given shape, sized to the circuit.
    Flexible { topology: TopologySpec },
}

fn device_transpile_100q() -> Vec<SuiteCase> {
    let case = |id: &str, source| SuiteCase {
        id: id.into(),
        workout: Workout::DeviceTranspile100Q,
        source,
        backend: BackendRequest::Production,
    };
    vec![
        case("QFT_100", CircuitSource::corpus("qft", "qft_N100.qasm")),
        case("QV_100", CircuitSource::corpus("qv", "qv_N100_12345.qasm")),
        case(
            "circSU2_100",
            CircuitSource::Generated {
                generator: Generator::EfficientSu2Circular {
                    qubits: 100,
                    reps: 3,
                    seed: SU2_SEED,
                },
            },
        ),
        case(
            "BV_100",
            CircuitSource::Generated {
                generator: Generator::BvAllOnes { qubits: 100 },
            },
        ),
        case(
            "square_heisenberg_100",
            CircuitSource::corpus("square-heisenberg", "square_heisenberg_N100.qasm"),
        ),
        case(
            "QAOA_100",
            CircuitSource::corpus("qaoa", "qaoa_barabasi_albert_N100_3reps.qasm"),
        ),
        case(
            "BVlike_simplification",
            CircuitSource::Generated {
                generator: Generator::TrivialBvlike { qubits: 100 },
            },
        ),
    ]
}

fn qasmbench_cases(workout: Workout, size: &str, config: &Configuration) -> SuiteResult<Vec<SuiteCase>> {
    let dir = config.corpus_dir("qasmbench").join(size);
    let files = qasm_files(&dir)?;
    debug!(workout = workout.name(), files = files.len(), "Collected QASMBench files");

    let mut cases = Vec::with_capacity(files.len() * config.abstract_topologies.len());
    for path in files {
        let stem = path
            .file_stem()
            .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
        for topology in &config.abstract_topologies {
            cases.push(SuiteCase {
                id: format!("{stem}-{}", topology.name()),
                workout,
                source: CircuitSource::File { path: path.clone() },
                backend: BackendRequest::Flexible {
                    topology: topology.clone(),
                },
            });
        }
    }
    Ok(cases)
}

/// `*.qasm` files directly in `dir` or one directory below it, sorted.
///
/// A missing directory yields no files.
fn qasm_files(dir: &Path) -> SuiteResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!("Corpus directory {} not found; no cases collected", dir.display());
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in read_dir(dir)? {
        if entry.is_dir() {
            files.extend(read_dir(&entry)?.into_iter().filter(|p| is_qasm(p)));
        } else if is_qasm(&entry) {
            files.push(entry);
        }
    }
    files.sort();
    Ok(files)
}

fn read_dir(dir: &Path) -> SuiteResult<Vec<PathBuf>> {
    let io_err = |source| SuiteError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        paths.push(entry.map_err(io_err)?.path());
    }
    Ok(paths)
}

fn is_qasm(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "qasm")
}

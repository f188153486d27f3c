//! Run configuration.
//!
//! Settings are resolved once per run, in increasing precedence:
//! 1. Built-in defaults
//! 2. A YAML file (`--config`, else `./benchpress.yaml`, else
//!    `~/.benchpress/config.yaml`)
//! 3. `BENCHPRESS_*` environment variables
//! 4. Command-line flags, applied by the caller
//!
//! The resulting [`Configuration`] is passed to the driver explicitly.
//!
//! ```yaml
//! backend: heavy-hex-127
//! compiler:
//!   kind: baseline
//!   optimization_level: 2
//! benchmark:
//!   rounds: 5
//! corpus:
//!   qft: /data/benchpress/qasm/qft
//! abstract_topologies: [line, square, heavy-hex]
//! backends:
//!   - name: tokyo-20
//!     topology: grid:4x5
//!     two_q_gate: cx
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use benchpress_bench::BenchmarkSettings;
use benchpress_compile::{BaselineCompiler, Compiler, ExternalCompiler, OptimizationLevel};
use benchpress_target::{BackendDefinition, BackendRegistry, DEFAULT_BACKEND, TopologySpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SuiteError, SuiteResult};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "benchpress.yaml";

/// Environment variable overriding [`Configuration::backend`].
pub const ENV_BACKEND: &str = "BENCHPRESS_BACKEND";
/// Environment variable overriding the optimization level.
pub const ENV_OPT_LEVEL: &str = "BENCHPRESS_OPT_LEVEL";
/// Environment variable overriding the number of timed rounds.
pub const ENV_ROUNDS: &str = "BENCHPRESS_ROUNDS";

/// Root of the corpus when a family has no configured directory.
const DEFAULT_CORPUS_ROOT: &str = "qasm";

/// Circuit families shipped with the corpus.
const CORPUS_FAMILIES: [&str; 5] = ["qft", "qv", "square-heisenberg", "qaoa", "qasmbench"];

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Production backend used by device workouts.
    pub backend: String,
    /// Backends added to the built-in presets.
    pub backends: Vec<BackendDefinition>,
    /// Compiler under benchmark.
    pub compiler: CompilerSettings,
    /// Directory of each circuit family.
    pub corpus: BTreeMap<String, PathBuf>,
    /// Timing repetitions.
    pub benchmark: BenchmarkSettings,
    /// Topologies crossed with the QASMBench corpus.
    pub abstract_topologies: Vec<TopologySpec>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            backends: Vec::new(),
            compiler: CompilerSettings::default(),
            corpus: CORPUS_FAMILIES
                .iter()
                .map(|family| (family.to_string(), Path::new(DEFAULT_CORPUS_ROOT).join(family)))
                .collect(),
            benchmark: BenchmarkSettings::default(),
            abstract_topologies: vec![TopologySpec::Line, TopologySpec::Square, TopologySpec::HeavyHex],
        }
    }
}

/// Which compiler to benchmark and how hard it should try.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    pub kind: CompilerKind,
    pub optimization_level: OptimizationLevel,
    /// Program to run for [`CompilerKind::External`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Arguments passed to `command`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// Compiler implementations the harness can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerKind {
    /// The in-tree reference pipeline.
    #[default]
    Baseline,
    /// A child process speaking OpenQASM on stdin/stdout.
    External,
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerKind::Baseline => write!(f, "baseline"),
            CompilerKind::External => write!(f, "external"),
        }
    }
}

impl FromStr for CompilerKind {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" => Ok(CompilerKind::Baseline),
            "external" => Ok(CompilerKind::External),
            other => Err(SuiteError::InvalidConfig(format!(
                "unknown compiler '{other}' (expected baseline or external)"
            ))),
        }
    }
}

impl Configuration {
    /// Parse configuration from YAML text. Missing fields keep their defaults.
    pub fn from_yaml(yaml: &str) -> SuiteResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> SuiteResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SuiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml_ng::from_str(&contents).map_err(|source| SuiteError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// The configuration file to use when none is given explicitly.
    pub fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
        dirs::home_dir()
            .map(|home| home.join(".benchpress").join("config.yaml"))
            .filter(|path| path.is_file())
    }

    /// Defaults, then the configuration file, then the process environment.
    ///
    /// The result is not validated; apply command-line overrides first and
    /// then call [`Configuration::validate`].
    pub fn load(explicit: Option<&Path>) -> SuiteResult<Self> {
        let mut config = match explicit.map(Path::to_path_buf).or_else(Self::discover) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `BENCHPRESS_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> SuiteResult<()> {
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend;
        }
        if let Some(level) = lookup(ENV_OPT_LEVEL) {
            self.compiler.optimization_level = parse_level(&level)?;
        }
        if let Some(rounds) = lookup(ENV_ROUNDS) {
            self.benchmark.rounds = rounds.trim().parse().map_err(|_| {
                SuiteError::InvalidConfig(format!("{ENV_ROUNDS} must be a number, got '{rounds}'"))
            })?;
        }
        Ok(())
    }

    /// Check that the configuration can drive a run.
    pub fn validate(&self) -> SuiteResult<()> {
        if self.benchmark.rounds == 0 {
            return Err(SuiteError::InvalidConfig(
                "benchmark.rounds must be at least 1".into(),
            ));
        }
        if self.compiler.kind == CompilerKind::External && self.compiler.command.is_none() {
            return Err(SuiteError::InvalidConfig(
                "compiler.command is required for an external compiler".into(),
            ));
        }
        self.registry()?.resolve(&self.backend)?;
        Ok(())
    }

    /// Presets plus the configured backends.
    pub fn registry(&self) -> SuiteResult<BackendRegistry> {
        let mut registry = BackendRegistry::with_presets()?;
        for definition in &self.backends {
            registry.register_definition(definition)?;
        }
        Ok(registry)
    }

    /// Directory holding a circuit family.
    pub fn corpus_dir(&self, family: &str) -> PathBuf {
        self.corpus
            .get(family)
            .cloned()
            .unwrap_or_else(|| Path::new(DEFAULT_CORPUS_ROOT).join(family))
    }

    /// The compiler these settings describe.
    pub fn build_compiler(&self) -> SuiteResult<Box<dyn Compiler>> {
        match self.compiler.kind {
            CompilerKind::Baseline => Ok(Box::new(BaselineCompiler)),
            CompilerKind::External => {
                let command = self.compiler.command.clone().ok_or_else(|| {
                    SuiteError::InvalidConfig("compiler.command is required for an external compiler".into())
                })?;
                Ok(Box::new(ExternalCompiler::new(command, self.compiler.args.clone())))
            }
        }
    }
}

/// Parse an optimization level from text.
pub fn parse_level(text: &str) -> SuiteResult<OptimizationLevel> {
    let value: u8 = text
        .trim()
        .parse()
        .map_err(|_| SuiteError::InvalidConfig(format!("invalid optimization level '{text}'")))?;
    OptimizationLevel::try_from(value).map_err(SuiteError::InvalidConfig)
}

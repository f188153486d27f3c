//! benchpress command-line interface.
//!
//! Runs the benchmark suite against a compiler and reports timing, quality
//! metrics and validation verdicts.
//!
//! ```text
//! benchpress run -k QFT --optimization-level 2 --output report.json
//! benchpress list -k qasmbench_small
//! benchpress backends
//! benchpress validate --input compiled.qasm --backend heavy-hex-127
//! benchpress generate qft --qubits 100 --output qft_N100.qasm
//! ```
//!
//! `run` and `validate` exit with status 1 when any case fails.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::generate::GeneratorKind;
use commands::run::RunOptions;
use commands::{backends, generate, list, run, validate};

/// benchpress - benchmark and validate quantum circuit compilers
#[derive(Parser)]
#[command(name = "benchpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./benchpress.yaml, then ~/.benchpress/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run benchmark cases and validate the compiled circuits
    Run {
        /// Only run cases whose name contains this pattern (repeatable)
        #[arg(short = 'k', long = "keyword")]
        include: Vec<String>,

        /// Skip cases whose name contains this pattern (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Workouts to run (default: all)
        #[arg(short, long)]
        workout: Vec<String>,

        /// Production backend
        #[arg(short, long)]
        backend: Option<String>,

        /// Optimization level (0-3)
        #[arg(short = 'O', long)]
        optimization_level: Option<u8>,

        /// Timed rounds per case
        #[arg(long)]
        rounds: Option<u32>,

        /// Compiler (baseline, external)
        #[arg(long)]
        compiler: Option<String>,

        /// Program to run as the external compiler
        #[arg(long)]
        compiler_command: Option<String>,

        /// Write the JSON benchmark report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List benchmark cases without running them
    List {
        /// Only list cases whose name contains this pattern (repeatable)
        #[arg(short = 'k', long = "keyword")]
        include: Vec<String>,

        /// Skip cases whose name contains this pattern (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Workouts to list (default: all)
        #[arg(short, long)]
        workout: Vec<String>,
    },

    /// List available backends
    Backends,

    /// Check a compiled circuit against a backend
    Validate {
        /// Compiled circuit (OpenQASM)
        #[arg(short, long)]
        input: PathBuf,

        /// Backend name (default: the configured production backend)
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Write a generated benchmark circuit as OpenQASM 2.0
    Generate {
        /// Circuit family
        #[arg(value_enum)]
        kind: GeneratorKind,

        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: u32,

        /// Random seed (su2, qv)
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Ansatz repetitions (su2)
        #[arg(long, default_value = "3")]
        reps: u32,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run {
            include,
            exclude,
            workout,
            backend,
            optimization_level,
            rounds,
            compiler,
            compiler_command,
            output,
        } => run::execute(
            config,
            RunOptions {
                include,
                exclude,
                workouts: workout,
                backend,
                optimization_level,
                rounds,
                compiler,
                compiler_command,
                output,
            },
        ),

        Commands::List {
            include,
            exclude,
            workout,
        } => list::execute(config, &workout, &include, &exclude).map(|()| true),

        Commands::Backends => backends::execute(config).map(|()| true),

        Commands::Validate { input, backend } => {
            validate::execute(config, &input, backend.as_deref())
        }

        Commands::Generate {
            kind,
            qubits,
            seed,
            reps,
            output,
        } => generate::execute(kind, qubits, seed, reps, output.as_deref()).map(|()| true),
    };

    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

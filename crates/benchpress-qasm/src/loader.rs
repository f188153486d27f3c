//! Timed loading of circuit files.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use benchpress_ir::Circuit;
use tracing::{debug, instrument};

use crate::error::{ParseError, ParseResult};
use crate::parser::{lower_to_circuit, parse_ast};

/// A circuit read from disk together with how long it took to read.
#[derive(Debug, Clone)]
pub struct LoadedCircuit {
    /// The parsed circuit, named after the file stem.
    pub circuit: Circuit,
    /// Wall-clock time to read and parse the file.
    pub load_time: Duration,
    /// The file that was loaded.
    pub path: PathBuf,
}

/// Read and parse an OpenQASM file.
///
/// Loading the same unchanged file twice yields structurally equal circuits.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_qasm_file(path: impl AsRef<Path>) -> ParseResult<LoadedCircuit> {
    let path = path.as_ref();
    let start = Instant::now();

    let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map_or_else(|| "circuit".to_string(), |s| s.to_string_lossy().into_owned());
    let program = parse_ast(&source)?;
    let circuit = lower_to_circuit(&program, &name)?;

    let load_time = start.elapsed();
    debug!(
        qubits = circuit.num_qubits(),
        ops = circuit.num_ops(),
        load_time_ms = load_time.as_secs_f64() * 1e3,
        "loaded circuit"
    );

    Ok(LoadedCircuit {
        circuit,
        load_time,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_names_circuit_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghz_n3.qasm");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\nh q[0];\ncx q[0],q[1];\ncx q[1],q[2];"
        )
        .unwrap();

        let loaded = load_qasm_file(&path).unwrap();
        assert_eq!(loaded.circuit.name(), "ghz_n3");
        assert_eq!(loaded.circuit.num_qubits(), 3);
        assert_eq!(loaded.path, path);

        let again = load_qasm_file(&path).unwrap();
        assert_eq!(again.circuit, loaded.circuit);
    }

    #[test]
    fn test_load_qasmbench_style_multi_controlled_gates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multiplier_n5.qasm");
        std::fs::write(
            &path,
            "OPENQASM 2.0;
include \"qelib1.inc\";
qreg q[5];
creg c[5];
u0(0.5) q[0];
cu(pi/2, 0, pi, 0.25) q[0], q[1];
rccx q[0], q[1], q[2];
rc3x q[0], q[1], q[2], q[3];
c3x q[0], q[1], q[2], q[3];
c3sqrtx q[1], q[2], q[3], q[4];
c4x q[0], q[1], q[2], q[3], q[4];
measure q -> c;
",
        )
        .unwrap();

        let loaded = load_qasm_file(&path).unwrap();
        assert_eq!(loaded.circuit.num_qubits(), 5);
        assert_eq!(loaded.circuit.gate_count("measure"), 5);
        assert!(loaded.circuit.gate_count("cx") > 0);
        assert_eq!(loaded.circuit.gate_count("c3x"), 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_qasm_file(dir.path().join("absent.qasm")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}

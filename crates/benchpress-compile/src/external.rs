//! Third-party compilers driven as child processes.
//!
//! Protocol: the circuit is written to the child's stdin as OpenQASM 2.0, the
//! target is passed in the environment, and the compiled circuit is read back
//! from stdout as OpenQASM. A non-zero exit status is a compile failure.
//!
//! | Variable | Content |
//! |----------|---------|
//! | `BENCHPRESS_BACKEND` | backend name |
//! | `BENCHPRESS_BACKEND_JSON` | backend descriptor (name, coupling map, gates) as JSON |
//! | `BENCHPRESS_OPT_LEVEL` | optimization level, `0`..`3` |

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

use benchpress_ir::Circuit;
use benchpress_qasm::{emit_qasm2, parse};
use benchpress_target::Backend;
use tracing::{debug, warn};

use crate::compiler::Compiler;
use crate::error::{CompileError, CompileResult};
use crate::level::OptimizationLevel;

/// Compiles by running an external command.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    name: String,
    command: String,
    args: Vec<String>,
}

impl ExternalCompiler {
    /// A compiler running `command` with `args`.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let command = command.into();
        let name = std::path::Path::new(&command)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| command.clone());
        Self {
            name,
            command,
            args,
        }
    }

    /// Override the reported name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn spawn_error(&self, source: std::io::Error) -> CompileError {
        CompileError::Spawn {
            command: self.command.clone(),
            source,
        }
    }
}

impl Compiler for ExternalCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(
        &self,
        circuit: &Circuit,
        backend: &Backend,
        level: OptimizationLevel,
    ) -> CompileResult<Circuit> {
        let source = emit_qasm2(circuit);
        let backend_json = serde_json::to_string(backend)?;
        debug!("Running {} {:?} for {}", self.command, self.args, backend.name());

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .env("BENCHPRESS_BACKEND", backend.name())
            .env("BENCHPRESS_BACKEND_JSON", backend_json)
            .env("BENCHPRESS_OPT_LEVEL", level.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // stdin is written while stdout is drained.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || stdin.write_all(source.as_bytes()))
        });
        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("{} closed stdin early", self.command);
                }
                Ok(Err(e)) => return Err(self.spawn_error(e)),
                Err(_) => {
                    return Err(self.spawn_error(std::io::Error::other("stdin writer panicked")));
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("{} failed: {}", self.command, output.status);
            return Err(CompileError::External {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut compiled = parse(&stdout)?;
        compiled.set_name(circuit.name());
        Ok(compiled)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use benchpress_ir::QubitId;
    use benchpress_target::TopologySpec;

    fn sh(script: &str) -> ExternalCompiler {
        ExternalCompiler::new("sh", vec!["-c".into(), script.into()])
    }

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit
    }

    #[test]
    fn test_echo_compiler() {
        let backend = Backend::flexible(2, &TopologySpec::Line).unwrap();
        let compiled = sh("cat")
            .compile(&bell(), &backend, OptimizationLevel::O1)
            .unwrap();
        assert_eq!(compiled.name(), "bell");
        assert_eq!(compiled.instructions(), bell().instructions());
        assert_eq!(sh("cat").name(), "sh");
    }

    #[test]
    fn test_environment() {
        let backend = Backend::flexible(2, &TopologySpec::Line).unwrap();
        let script = r#"test "$BENCHPRESS_OPT_LEVEL" = 3 && test "$BENCHPRESS_BACKEND" = line-2 && printf '%s' "$BENCHPRESS_BACKEND_JSON" | grep -q coupling_map && cat"#;
        assert!(sh(script).compile(&bell(), &backend, OptimizationLevel::O3).is_ok());
        assert!(sh(script).compile(&bell(), &backend, OptimizationLevel::O2).is_err());
    }

    #[test]
    fn test_failure_status() {
        let backend = Backend::flexible(2, &TopologySpec::Line).unwrap();
        match sh("echo boom >&2; exit 3").compile(&bell(), &backend, OptimizationLevel::O1) {
            Err(CompileError::External { stderr, .. }) => assert_eq!(stderr, "boom"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_output() {
        let backend = Backend::flexible(2, &TopologySpec::Line).unwrap();
        let result = sh("cat >/dev/null; echo nonsense").compile(&bell(), &backend, OptimizationLevel::O1);
        assert!(matches!(result, Err(CompileError::Output(_))));
    }

    #[test]
    fn test_missing_command() {
        let backend = Backend::flexible(2, &TopologySpec::Line).unwrap();
        let result = ExternalCompiler::new("/nonexistent/compiler", vec![])
            .compile(&bell(), &backend, OptimizationLevel::O1);
        assert!(matches!(result, Err(CompileError::Spawn { .. })));
    }
}

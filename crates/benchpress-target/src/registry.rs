//! Named backends.
//!
//! The registry holds the built-in presets plus any backends defined in the
//! run configuration. The production backend of a run is looked up here once
//! and then shared read-only by every case.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{Backend, U_BASIS, ZSX_BASIS};
use crate::error::{ConfigResult, ConfigurationError};
use crate::topology::TopologySpec;

/// Name of the default production backend.
pub const DEFAULT_BACKEND: &str = "heavy-hex-127";

/// A backend described in configuration.
///
/// ```yaml
/// name: tokyo-20
/// topology: grid:4x5
/// two_q_gate: cx
/// basis_gates: [rz, sx, x]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDefinition {
    /// Registry name.
    pub name: String,
    /// Connectivity shape.
    pub topology: TopologySpec,
    /// Qubit count; required for parametric topologies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_qubits: Option<u32>,
    /// Native two-qubit gate.
    #[serde(default = "default_two_q_gate")]
    pub two_q_gate: String,
    /// Native single-qubit gates.
    #[serde(default = "default_basis_gates")]
    pub basis_gates: Vec<String>,
}

fn default_two_q_gate() -> String {
    "cz".into()
}

fn default_basis_gates() -> Vec<String> {
    ZSX_BASIS.iter().map(|g| g.to_string()).collect()
}

impl BackendDefinition {
    /// Build the backend this definition describes.
    pub fn build(&self) -> ConfigResult<Backend> {
        let coupling_map = match self.num_qubits {
            Some(n) => self.topology.coupling_map(n)?,
            None => self.topology.fixed_coupling_map()?,
        };
        Backend::new(
            self.name.clone(),
            coupling_map,
            self.two_q_gate.clone(),
            self.basis_gates.iter().cloned(),
        )
    }
}

/// Lookup table of named backends.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Vec<Backend>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// The built-in presets.
    pub fn with_presets() -> ConfigResult<Self> {
        let mut registry = Self::new();
        for definition in presets() {
            registry.register(definition.build()?);
        }
        Ok(registry)
    }

    /// Add a backend, replacing any backend with the same name.
    pub fn register(&mut self, backend: Backend) {
        if let Some(existing) = self.backends.iter_mut().find(|b| b.name() == backend.name()) {
            debug!("Replacing backend: {}", backend.name());
            *existing = backend;
        } else {
            debug!("Registering backend: {}", backend.name());
            self.backends.push(backend);
        }
    }

    /// Build and add a configured backend.
    pub fn register_definition(&mut self, definition: &BackendDefinition) -> ConfigResult<()> {
        self.register(definition.build()?);
        Ok(())
    }

    /// Look up a backend by name.
    pub fn resolve(&self, name: &str) -> ConfigResult<&Backend> {
        self.backends
            .iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| ConfigurationError::UnknownBackend {
                name: name.to_string(),
                available: self.names().into_iter().map(String::from).collect(),
            })
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(Backend::name).collect()
    }

    /// Registered backends in registration order.
    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fail unless `backend` has room for `required` qubits.
pub fn require_capacity(backend: &Backend, required: u32) -> ConfigResult<()> {
    if backend.num_qubits() < required {
        return Err(ConfigurationError::InsufficientQubits {
            backend: backend.name().to_string(),
            available: backend.num_qubits(),
            required,
        });
    }
    Ok(())
}

/// Definitions of the built-in backends.
pub fn presets() -> Vec<BackendDefinition> {
    let preset = |name: &str, topology, num_qubits, two_q: &str, basis: &[&str]| BackendDefinition {
        name: name.into(),
        topology,
        num_qubits,
        two_q_gate: two_q.into(),
        basis_gates: basis.iter().map(|g| g.to_string()).collect(),
    };
    vec![
        preset(DEFAULT_BACKEND, TopologySpec::Eagle, None, "cz", ZSX_BASIS),
        preset(
            "grid-100",
            TopologySpec::Grid { rows: 10, cols: 10 },
            None,
            "cx",
            ZSX_BASIS,
        ),
        preset("ring-64", TopologySpec::Ring, Some(64), "cz", U_BASIS),
        preset("line-100", TopologySpec::Line, Some(100), "cx", U_BASIS),
        preset("full-32", TopologySpec::Full, Some(32), "cx", U_BASIS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let registry = BackendRegistry::with_presets().unwrap();
        assert_eq!(
            registry.names(),
            vec!["heavy-hex-127", "grid-100", "ring-64", "line-100", "full-32"]
        );

        let eagle = registry.resolve("heavy-hex-127").unwrap();
        assert_eq!(eagle.num_qubits(), 127);
        assert_eq!(eagle.two_q_gate(), "cz");
        assert!(eagle.supports("sx"));

        let grid = registry.resolve("grid-100").unwrap();
        assert_eq!(grid.num_qubits(), 100);
        assert!(grid.is_connected(0, 10));

        assert_eq!(registry.resolve("full-32").unwrap().coupling_map().num_edges(), 496);
    }

    #[test]
    fn test_unknown_backend() {
        let registry = BackendRegistry::with_presets().unwrap();
        match registry.resolve("falcon-27") {
            Err(ConfigurationError::UnknownBackend { name, available }) => {
                assert_eq!(name, "falcon-27");
                assert_eq!(available.len(), 5);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = BackendRegistry::with_presets().unwrap();
        let definition: BackendDefinition =
            serde_yaml_ng::from_str("name: ring-64\ntopology: ring\nnum_qubits: 8\n").unwrap();
        registry.register_definition(&definition).unwrap();
        assert_eq!(registry.names().len(), 5);
        let ring = registry.resolve("ring-64").unwrap();
        assert_eq!(ring.num_qubits(), 8);
        assert_eq!(ring.two_q_gate(), "cz");
    }

    #[test]
    fn test_definition_needs_size() {
        let definition: BackendDefinition =
            serde_yaml_ng::from_str("name: ring\ntopology: ring\n").unwrap();
        assert!(matches!(
            definition.build(),
            Err(ConfigurationError::InvalidTopology(_))
        ));

        let definition: BackendDefinition = serde_yaml_ng::from_str(
            "name: tokyo-20\ntopology: grid:4x5\ntwo_q_gate: cx\nbasis_gates: [u]\n",
        )
        .unwrap();
        let backend = definition.build().unwrap();
        assert_eq!(backend.num_qubits(), 20);
        assert_eq!(backend.basis_gates(), ["u".to_string(), "cx".to_string()]);
    }

    #[test]
    fn test_require_capacity() {
        let backend = Backend::flexible(4, &TopologySpec::Line).unwrap();
        assert!(require_capacity(&backend, 4).is_ok());
        assert!(matches!(
            require_capacity(&backend, 5),
            Err(ConfigurationError::InsufficientQubits {
                available: 4,
                required: 5,
                ..
            })
        ));
    }
}

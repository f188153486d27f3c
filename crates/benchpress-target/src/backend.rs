//! Backend descriptors.

use benchpress_ir::StandardGate;
use serde::Serialize;

use crate::coupling::CouplingMap;
use crate::error::{ConfigResult, ConfigurationError};
use crate::topology::TopologySpec;

/// Single-qubit basis of IBM-style devices.
pub const ZSX_BASIS: &[&str] = &["rz", "sx", "x"];

/// Single-qubit basis built on the generic `u` rotation.
pub const U_BASIS: &[&str] = &["u"];

/// A compilation target.
///
/// Read-only once built: the benchmark runner and the validator only borrow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backend {
    name: String,
    coupling_map: CouplingMap,
    two_q_gate: String,
    basis_gates: Vec<String>,
}

impl Backend {
    /// Create a backend.
    ///
    /// The two-qubit gate must be a known two-qubit gate; it is added to the
    /// basis if missing.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        coupling_map: CouplingMap,
        two_q_gate: impl Into<String>,
        basis_gates: impl IntoIterator<Item = S>,
    ) -> ConfigResult<Self> {
        let name = name.into();
        let two_q_gate = two_q_gate.into();
        if coupling_map.num_qubits() == 0 {
            return Err(ConfigurationError::EmptyBackend);
        }
        match StandardGate::signature(&two_q_gate) {
            Some(sig) if sig.qubits == 2 => {}
            _ => return Err(ConfigurationError::InvalidTwoQubitGate(two_q_gate)),
        }

        let mut basis: Vec<String> = Vec::new();
        for gate in basis_gates.into_iter().map(Into::into) {
            if !basis.contains(&gate) {
                basis.push(gate);
            }
        }
        if !basis.contains(&two_q_gate) {
            basis.push(two_q_gate.clone());
        }

        Ok(Self {
            name,
            coupling_map,
            two_q_gate,
            basis_gates: basis,
        })
    }

    /// Build a backend sized for `num_qubits` from a topology specification.
    ///
    /// Native gates default to `rz`, `sx`, `x` and `cz`.
    pub fn flexible(num_qubits: u32, topology: &TopologySpec) -> ConfigResult<Self> {
        let coupling_map = topology.coupling_map(num_qubits)?;
        Self::new(
            format!("{}-{}", topology.name(), num_qubits),
            coupling_map,
            "cz",
            ZSX_BASIS.iter().copied(),
        )
    }

    /// Replace the native gate set.
    pub fn with_native_gates<S: Into<String>>(
        self,
        two_q_gate: impl Into<String>,
        basis_gates: impl IntoIterator<Item = S>,
    ) -> ConfigResult<Self> {
        Self::new(self.name, self.coupling_map, two_q_gate, basis_gates)
    }

    /// Rename the backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Backend name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> u32 {
        self.coupling_map.num_qubits()
    }

    /// Connectivity graph.
    pub fn coupling_map(&self) -> &CouplingMap {
        &self.coupling_map
    }

    /// Canonical two-qubit gate name.
    pub fn two_q_gate(&self) -> &str {
        &self.two_q_gate
    }

    /// Native gate names, two-qubit gate included.
    pub fn basis_gates(&self) -> &[String] {
        &self.basis_gates
    }

    /// Whether `(q1, q2)` may host a two-qubit gate.
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        self.coupling_map.is_connected(q1, q2)
    }

    /// Whether `gate` is native.
    pub fn supports(&self, gate: &str) -> bool {
        self.basis_gates.iter().any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexible_ring() {
        let backend = Backend::flexible(5, &TopologySpec::Ring).unwrap();
        assert_eq!(backend.name(), "ring-5");
        assert_eq!(backend.num_qubits(), 5);
        assert_eq!(backend.two_q_gate(), "cz");
        assert!(backend.is_connected(4, 0));
        assert!(!backend.is_connected(0, 2));
        assert!(backend.supports("rz"));
        assert!(backend.supports("cz"));
        assert!(!backend.supports("cx"));
    }

    #[test]
    fn test_flexible_rejects_small_topology() {
        let result = Backend::flexible(12, &TopologySpec::Grid { rows: 3, cols: 3 });
        assert!(matches!(
            result,
            Err(ConfigurationError::TopologyTooSmall { .. })
        ));
        assert!(matches!(
            Backend::flexible(0, &TopologySpec::Line),
            Err(ConfigurationError::EmptyBackend)
        ));
    }

    #[test]
    fn test_native_gates() {
        let backend = Backend::flexible(3, &TopologySpec::Line)
            .unwrap()
            .with_native_gates("cx", ["u", "u"])
            .unwrap();
        assert_eq!(backend.basis_gates(), ["u".to_string(), "cx".to_string()]);
        assert_eq!(backend.two_q_gate(), "cx");
    }

    #[test]
    fn test_invalid_two_qubit_gate() {
        let result = Backend::new("bad", CouplingMap::linear(2), "h", ["rz"]);
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidTwoQubitGate(name)) if name == "h"
        ));
        let result = Backend::new("bad", CouplingMap::linear(3), "ccx", ["rz"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_edges() {
        let backend = Backend::new("pair", CouplingMap::linear(2), "cx", ["u"]).unwrap();
        let json = serde_json::to_value(&backend).unwrap();
        assert_eq!(json["name"], "pair");
        assert_eq!(json["two_q_gate"], "cx");
        assert_eq!(json["coupling_map"]["num_qubits"], 2);
        assert_eq!(json["coupling_map"]["edges"][0][1], 1);
    }
}

//! Named scalar metrics attached to one benchmark invocation.

use std::collections::BTreeMap;

use benchpress_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};

/// Two-qubit gate count of the compiled circuit.
pub const GATE_COUNT_2Q: &str = "gate_count_2q";
/// Depth of the compiled circuit counting only two-qubit gates.
pub const DEPTH_2Q: &str = "depth_2q";
/// Seconds spent reading and parsing the source file.
pub const QASM_LOAD_TIME: &str = "qasm_load_time";

/// Metric name to value. Each name can be recorded once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics {
    values: BTreeMap<String, f64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a metric; recording the same name twice fails.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> BenchResult<()> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return Err(BenchError::DuplicateMetric(name));
        }
        self.values.insert(name, value);
        Ok(())
    }

    /// Record every metric of `other`.
    pub fn extend(&mut self, other: Metrics) -> BenchResult<()> {
        for (name, value) in other.values {
            self.insert(name, value)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `gate_count_2q` and `depth_2q` of a compiled circuit for a target's two-qubit gate.
pub fn quality_metrics(compiled: &Circuit, two_q_gate: &str) -> Metrics {
    let mut metrics = Metrics::new();
    metrics
        .values
        .insert(GATE_COUNT_2Q.into(), compiled.gate_count(two_q_gate) as f64);
    metrics.values.insert(
        DEPTH_2Q.into(),
        compiled.depth_filtered(|inst| inst.name() == two_q_gate) as f64,
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchpress_ir::QubitId;

    #[test]
    fn test_write_once() {
        let mut metrics = Metrics::new();
        metrics.insert(QASM_LOAD_TIME, 0.5).unwrap();
        assert!(matches!(
            metrics.insert(QASM_LOAD_TIME, 0.7),
            Err(BenchError::DuplicateMetric(name)) if name == QASM_LOAD_TIME
        ));
        assert_eq!(metrics.get(QASM_LOAD_TIME), Some(0.5));
    }

    #[test]
    fn test_extend_rejects_overlap() {
        let mut a = Metrics::new();
        a.insert("x", 1.0).unwrap();
        let mut b = Metrics::new();
        b.insert("y", 2.0).unwrap();
        a.extend(b.clone()).unwrap();
        assert_eq!(a.len(), 2);
        assert!(a.extend(b).is_err());
    }

    #[test]
    fn test_quality_metrics() {
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        circuit.h(QubitId(2)).unwrap();
        circuit.cz(QubitId(1), QubitId(2)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let metrics = quality_metrics(&circuit, "cz");
        assert_eq!(metrics.get(GATE_COUNT_2Q), Some(2.0));
        assert_eq!(metrics.get(DEPTH_2Q), Some(2.0));
        assert_eq!(quality_metrics(&circuit, "ecr").get(GATE_COUNT_2Q), Some(0.0));
    }

    #[test]
    fn test_serializes_as_map() {
        let mut metrics = Metrics::new();
        metrics.insert(DEPTH_2Q, 4.0).unwrap();
        assert_eq!(serde_json::to_string(&metrics).unwrap(), r#"{"depth_2q":4.0}"#);
    }
}

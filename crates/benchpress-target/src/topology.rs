//! Topology specifications.
//!
//! A [`TopologySpec`] names a connectivity shape. Parametric shapes size
//! themselves to the requested qubit count; fixed shapes have a set number of
//! slots and reject circuits that do not fit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coupling::CouplingMap;
use crate::error::{ConfigResult, ConfigurationError};

/// A connectivity shape.
///
/// In configuration files a topology is written as a string (`line`, `ring`,
/// `full`, `star`, `square`, `heavy-hex`, `eagle`, `grid:4x5`,
/// `heavy-hex:3x11`) or as an explicit `{ num_qubits, edges }` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopologyRepr", into = "TopologyRepr")]
pub enum TopologySpec {
    /// Line over exactly the requested qubits.
    Line,
    /// Ring over exactly the requested qubits.
    Ring,
    /// All-to-all over exactly the requested qubits.
    Full,
    /// Star over exactly the requested qubits.
    Star,
    /// Smallest square grid holding the requested qubits.
    Square,
    /// Smallest heavy-hex lattice of the `(k + 1) x (4k + 3)` family holding the requested qubits.
    HeavyHex,
    /// Fixed grid.
    Grid { rows: u32, cols: u32 },
    /// Fixed heavy-hex lattice.
    HeavyHexLattice { rows: u32, cols: u32 },
    /// The 127-qubit Eagle layout.
    Eagle,
    /// Fixed explicit edge list.
    Explicit {
        num_qubits: u32,
        edges: Vec<(u32, u32)>,
    },
}

impl TopologySpec {
    /// Short name used in case identifiers.
    pub fn name(&self) -> String {
        match self {
            TopologySpec::Line => "line".into(),
            TopologySpec::Ring => "ring".into(),
            TopologySpec::Full => "full".into(),
            TopologySpec::Star => "star".into(),
            TopologySpec::Square => "square".into(),
            TopologySpec::HeavyHex => "heavy-hex".into(),
            TopologySpec::Grid { rows, cols } => format!("grid-{rows}x{cols}"),
            TopologySpec::HeavyHexLattice { rows, cols } => format!("heavy-hex-{rows}x{cols}"),
            TopologySpec::Eagle => "eagle".into(),
            TopologySpec::Explicit { num_qubits, .. } => format!("explicit-{num_qubits}"),
        }
    }

    /// Qubits available for a request of `num_qubits`.
    ///
    /// Parametric shapes return at least `num_qubits`; fixed shapes return their size.
    pub fn slots(&self, num_qubits: u32) -> u32 {
        match self {
            TopologySpec::Line | TopologySpec::Ring | TopologySpec::Full | TopologySpec::Star => {
                num_qubits
            }
            TopologySpec::Square => {
                let k = square_side(num_qubits);
                k * k
            }
            TopologySpec::HeavyHex => {
                let (rows, cols) = heavy_hex_dims(num_qubits);
                heavy_hex_size(rows, cols)
            }
            TopologySpec::Grid { rows, cols } => rows * cols,
            TopologySpec::HeavyHexLattice { rows, cols } => heavy_hex_size(*rows, *cols),
            TopologySpec::Eagle => 127,
            TopologySpec::Explicit { num_qubits, .. } => *num_qubits,
        }
    }

    /// Whether the size follows the request.
    pub fn is_parametric(&self) -> bool {
        matches!(
            self,
            TopologySpec::Line
                | TopologySpec::Ring
                | TopologySpec::Full
                | TopologySpec::Star
                | TopologySpec::Square
                | TopologySpec::HeavyHex
        )
    }

    /// Build the coupling map for a circuit of `num_qubits`.
    pub fn coupling_map(&self, num_qubits: u32) -> ConfigResult<CouplingMap> {
        if num_qubits == 0 {
            return Err(ConfigurationError::EmptyBackend);
        }
        let slots = self.slots(num_qubits);
        if slots < num_qubits {
            return Err(ConfigurationError::TopologyTooSmall {
                topology: self.name(),
                slots,
                required: num_qubits,
            });
        }

        let map = match self {
            TopologySpec::Line => CouplingMap::linear(num_qubits),
            TopologySpec::Ring => CouplingMap::ring(num_qubits),
            TopologySpec::Full => CouplingMap::full(num_qubits),
            TopologySpec::Star => CouplingMap::star(num_qubits),
            TopologySpec::Square => {
                let k = square_side(num_qubits);
                CouplingMap::grid(k, k)
            }
            TopologySpec::HeavyHex => {
                let (rows, cols) = heavy_hex_dims(num_qubits);
                CouplingMap::heavy_hex(rows, cols)
            }
            TopologySpec::Grid { rows, cols } => CouplingMap::grid(*rows, *cols),
            TopologySpec::HeavyHexLattice { rows, cols } => CouplingMap::heavy_hex(*rows, *cols),
            TopologySpec::Eagle => CouplingMap::eagle_127(),
            TopologySpec::Explicit { num_qubits, edges } => {
                CouplingMap::from_edges(*num_qubits, edges.iter().copied())?
            }
        };
        Ok(map)
    }

    /// Build the coupling map at the topology's own size.
    ///
    /// Parametric shapes have no size of their own and are rejected.
    pub fn fixed_coupling_map(&self) -> ConfigResult<CouplingMap> {
        if self.is_parametric() {
            return Err(ConfigurationError::InvalidTopology(format!(
                "'{}' needs a qubit count",
                self.name()
            )));
        }
        self.coupling_map(self.slots(0).max(1))
    }
}

fn square_side(n: u32) -> u32 {
    let mut k = (f64::from(n)).sqrt() as u32;
    while k * k < n {
        k += 1;
    }
    k
}

fn heavy_hex_size(rows: u32, cols: u32) -> u32 {
    if rows == 0 {
        return 0;
    }
    let gaps = rows - 1;
    let even_gaps = gaps.div_ceil(2);
    let odd_gaps = gaps / 2;
    let even_bridges = cols.div_ceil(4);
    let odd_bridges = cols.saturating_sub(2).div_ceil(4);
    rows * cols + even_gaps * even_bridges + odd_gaps * odd_bridges
}

/// Smallest `(k + 1) x (4k + 3)` lattice with at least `n` qubits.
fn heavy_hex_dims(n: u32) -> (u32, u32) {
    let mut k = 1;
    loop {
        let (rows, cols) = (k + 1, 4 * k + 3);
        if heavy_hex_size(rows, cols) >= n {
            return (rows, cols);
        }
        k += 1;
    }
}

impl fmt::Display for TopologySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologySpec::Grid { rows, cols } => write!(f, "grid:{rows}x{cols}"),
            TopologySpec::HeavyHexLattice { rows, cols } => write!(f, "heavy-hex:{rows}x{cols}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl FromStr for TopologySpec {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim().to_ascii_lowercase();
        if let Some((kind, dims)) = spec.split_once(':') {
            let (rows, cols) = parse_dims(dims)
                .ok_or_else(|| ConfigurationError::InvalidTopology(format!("bad size in '{s}'")))?;
            return match kind {
                "grid" => Ok(TopologySpec::Grid { rows, cols }),
                "heavy-hex" | "heavy_hex" => Ok(TopologySpec::HeavyHexLattice { rows, cols }),
                _ => Err(ConfigurationError::InvalidTopology(format!(
                    "unknown topology '{kind}'"
                ))),
            };
        }
        match spec.as_str() {
            "line" | "linear" => Ok(TopologySpec::Line),
            "ring" | "circular" => Ok(TopologySpec::Ring),
            "full" | "all-to-all" => Ok(TopologySpec::Full),
            "star" => Ok(TopologySpec::Star),
            "square" | "grid" => Ok(TopologySpec::Square),
            "heavy-hex" | "heavy_hex" => Ok(TopologySpec::HeavyHex),
            "eagle" => Ok(TopologySpec::Eagle),
            _ => Err(ConfigurationError::InvalidTopology(format!(
                "unknown topology '{s}'"
            ))),
        }
    }
}

fn parse_dims(dims: &str) -> Option<(u32, u32)> {
    let (rows, cols) = dims.split_once('x')?;
    Some((rows.trim().parse().ok()?, cols.trim().parse().ok()?))
}

/// Serialized form: a name string or an explicit edge list.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TopologyRepr {
    Name(String),
    Explicit {
        num_qubits: u32,
        edges: Vec<(u32, u32)>,
    },
}

impl TryFrom<TopologyRepr> for TopologySpec {
    type Error = ConfigurationError;

    fn try_from(repr: TopologyRepr) -> Result<Self, Self::Error> {
        match repr {
            TopologyRepr::Name(name) => name.parse(),
            TopologyRepr::Explicit { num_qubits, edges } => {
                CouplingMap::from_edges(num_qubits, edges.iter().copied())?;
                Ok(TopologySpec::Explicit { num_qubits, edges })
            }
        }
    }
}

impl From<TopologySpec> for TopologyRepr {
    fn from(spec: TopologySpec) -> Self {
        match spec {
            TopologySpec::Explicit { num_qubits, edges } => {
                TopologyRepr::Explicit { num_qubits, edges }
            }
            other => TopologyRepr::Name(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parametric_sizes() {
        assert_eq!(TopologySpec::Line.coupling_map(10).unwrap().num_qubits(), 10);
        assert_eq!(TopologySpec::Ring.coupling_map(7).unwrap().num_edges(), 7);
        assert_eq!(TopologySpec::Square.coupling_map(10).unwrap().num_qubits(), 16);
        assert_eq!(TopologySpec::Square.coupling_map(16).unwrap().num_qubits(), 16);
        assert_eq!(TopologySpec::HeavyHex.coupling_map(10).unwrap().num_qubits(), 16);
        assert_eq!(TopologySpec::HeavyHex.coupling_map(40).unwrap().num_qubits(), 72);
        assert_eq!(TopologySpec::HeavyHex.coupling_map(100).unwrap().num_qubits(), 115);
    }

    #[test]
    fn test_heavy_hex_size_matches_lattice() {
        for (rows, cols) in [(2, 7), (3, 11), (4, 15), (3, 8), (5, 5)] {
            assert_eq!(
                heavy_hex_size(rows, cols),
                CouplingMap::heavy_hex(rows, cols).num_qubits(),
                "{rows}x{cols}"
            );
        }
    }

    #[test]
    fn test_fixed_topology_too_small() {
        let grid = TopologySpec::Grid { rows: 3, cols: 3 };
        assert_eq!(grid.coupling_map(9).unwrap().num_qubits(), 9);
        assert!(matches!(
            grid.coupling_map(10),
            Err(ConfigurationError::TopologyTooSmall {
                slots: 9,
                required: 10,
                ..
            })
        ));
        assert!(matches!(
            TopologySpec::Eagle.coupling_map(128),
            Err(ConfigurationError::TopologyTooSmall { .. })
        ));
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            TopologySpec::Line.coupling_map(0),
            Err(ConfigurationError::EmptyBackend)
        ));
    }

    #[test]
    fn test_parse_and_display() {
        for text in ["line", "ring", "full", "star", "square", "heavy-hex", "eagle", "grid:4x5", "heavy-hex:3x11"] {
            let spec: TopologySpec = text.parse().unwrap();
            assert_eq!(spec.to_string(), text);
        }
        assert_eq!("Circular".parse::<TopologySpec>().unwrap(), TopologySpec::Ring);
        assert!("torus".parse::<TopologySpec>().is_err());
        assert!("grid:4by5".parse::<TopologySpec>().is_err());
    }

    #[test]
    fn test_fixed_coupling_map() {
        assert_eq!(TopologySpec::Eagle.fixed_coupling_map().unwrap().num_qubits(), 127);
        assert!(TopologySpec::Ring.fixed_coupling_map().is_err());
    }

    #[test]
    fn test_yaml_forms() {
        let specs: Vec<TopologySpec> = serde_yaml_ng::from_str(
            "- line\n- grid:2x3\n- num_qubits: 3\n  edges: [[0, 1], [1, 2]]\n",
        )
        .unwrap();
        assert_eq!(specs[0], TopologySpec::Line);
        assert_eq!(specs[1], TopologySpec::Grid { rows: 2, cols: 3 });
        assert_eq!(
            specs[2],
            TopologySpec::Explicit {
                num_qubits: 3,
                edges: vec![(0, 1), (1, 2)]
            }
        );

        let bad: Result<Vec<TopologySpec>, _> =
            serde_yaml_ng::from_str("- num_qubits: 2\n  edges: [[0, 5]]\n");
        assert!(bad.is_err());
    }
}

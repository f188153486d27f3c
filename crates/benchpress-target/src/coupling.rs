//! Physical qubit connectivity.

use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigResult, ConfigurationError};

/// Undirected connectivity graph over physical qubits.
///
/// An edge means a two-qubit gate may act on that pair, in either order.
/// All-pairs BFS distances and predecessors are computed on construction, so
/// [`distance`](Self::distance) is O(1) and [`shortest_path`](Self::shortest_path)
/// is O(path length).
#[derive(Debug, Clone)]
pub struct CouplingMap {
    graph: UnGraph<(), ()>,
    /// `dist[from][to]`, or `u32::MAX` if unreachable.
    dist: Vec<Vec<u32>>,
    /// `pred[from][to]` is the node before `to` on a shortest path from `from`.
    pred: Vec<Vec<u32>>,
}

/// Serialized form: qubit count plus edge list.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCouplingMap {
    num_qubits: u32,
    edges: Vec<(u32, u32)>,
}

impl CouplingMap {
    /// Build a coupling map from an edge list, rejecting out-of-range qubits and self-loops.
    pub fn from_edges(
        num_qubits: u32,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> ConfigResult<Self> {
        let edges: Vec<_> = edges.into_iter().collect();
        for &(a, b) in &edges {
            if a >= num_qubits || b >= num_qubits {
                return Err(ConfigurationError::InvalidTopology(format!(
                    "edge ({a}, {b}) is outside {num_qubits} qubits"
                )));
            }
            if a == b {
                return Err(ConfigurationError::InvalidTopology(format!(
                    "self-loop on qubit {a}"
                )));
            }
        }
        Ok(Self::build(num_qubits, edges))
    }

    /// Build from edges already known to be in range.
    pub(crate) fn build(num_qubits: u32, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut graph = UnGraph::with_capacity(num_qubits as usize, 0);
        for _ in 0..num_qubits {
            graph.add_node(());
        }
        for (a, b) in edges {
            graph.update_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), ());
        }
        let mut map = Self {
            graph,
            dist: vec![],
            pred: vec![],
        };
        map.precompute_distances();
        map
    }

    /// BFS from every node.
    fn precompute_distances(&mut self) {
        let n = self.graph.node_count();
        self.dist = vec![vec![u32::MAX; n]; n];
        self.pred = vec![vec![u32::MAX; n]; n];

        for src in 0..n {
            self.dist[src][src] = 0;
            let mut queue = VecDeque::from([src]);
            while let Some(current) = queue.pop_front() {
                // Sorted neighbours keep paths independent of edge insertion order.
                let mut neighbors: Vec<usize> = self
                    .graph
                    .neighbors(NodeIndex::new(current))
                    .map(NodeIndex::index)
                    .collect();
                neighbors.sort_unstable();
                for nb in neighbors {
                    if self.dist[src][nb] == u32::MAX {
                        self.dist[src][nb] = self.dist[src][current] + 1;
                        self.pred[src][nb] = current as u32;
                        queue.push_back(nb);
                    }
                }
            }
        }
    }

    /// Line 0-1-2-...-(n-1).
    pub fn linear(n: u32) -> Self {
        Self::build(n, (1..n).map(|i| (i - 1, i)))
    }

    /// Line with the ends joined.
    pub fn ring(n: u32) -> Self {
        let closing = (n > 2).then_some((n - 1, 0));
        Self::build(n, (1..n).map(|i| (i - 1, i)).chain(closing))
    }

    /// Every pair connected.
    pub fn full(n: u32) -> Self {
        Self::build(n, (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))))
    }

    /// Qubit 0 connected to all others.
    pub fn star(n: u32) -> Self {
        Self::build(n, (1..n).map(|i| (0, i)))
    }

    /// Row-major `rows x cols` grid with nearest-neighbour coupling.
    pub fn grid(rows: u32, cols: u32) -> Self {
        let mut edges = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    edges.push((q, q + 1));
                }
                if r + 1 < rows {
                    edges.push((q, q + cols));
                }
            }
        }
        Self::build(rows * cols, edges)
    }

    /// Heavy-hex lattice of `rows` full rows with `cols` qubits each.
    ///
    /// Consecutive rows are joined by bridge qubits every fourth column,
    /// starting at column 0 for the first gap and alternating with column 2.
    pub fn heavy_hex(rows: u32, cols: u32) -> Self {
        let spans: Vec<_> = (0..rows).map(|_| (0, cols)).collect();
        heavy_hex_from_rows(&spans)
    }

    /// The 127-qubit heavy-hex layout of IBM Eagle processors.
    pub fn eagle_127() -> Self {
        let mut spans = vec![(0, 14)];
        spans.extend(std::iter::repeat_n((0, 15), 5));
        spans.push((1, 14));
        heavy_hex_from_rows(&spans)
    }

    /// Number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Number of coupled pairs.
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Coupled pairs as `(low, high)`, sorted.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| {
                let (a, b) = (a.index() as u32, b.index() as u32);
                (a.min(b), a.max(b))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Check if two qubits are directly connected.
    #[inline]
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        q1 != q2 && self.distance(q1, q2) == Some(1)
    }

    /// Neighbours of a qubit in ascending order.
    pub fn neighbors(&self, qubit: u32) -> Vec<u32> {
        if qubit >= self.num_qubits() {
            return vec![];
        }
        let mut neighbors: Vec<u32> = self
            .graph
            .neighbors(NodeIndex::new(qubit as usize))
            .map(|n| n.index() as u32)
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Shortest-path distance, or `None` if unreachable or out of range.
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        let d = *self.dist.get(from as usize)?.get(to as usize)?;
        (d != u32::MAX).then_some(d)
    }

    /// Shortest path including both endpoints.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        self.distance(from, to)?;
        let preds = &self.pred[from as usize];
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            current = preds[current as usize];
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    /// True if every qubit can reach every other.
    pub fn is_connected_graph(&self) -> bool {
        self.graph.node_count() <= 1 || connected_components(&self.graph) == 1
    }
}

impl PartialEq for CouplingMap {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits() == other.num_qubits() && self.edges() == other.edges()
    }
}

impl Eq for CouplingMap {}

impl Serialize for CouplingMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawCouplingMap {
            num_qubits: self.num_qubits(),
            edges: self.edges(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CouplingMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCouplingMap::deserialize(deserializer)?;
        CouplingMap::from_edges(raw.num_qubits, raw.edges).map_err(serde::de::Error::custom)
    }
}

/// Heavy-hex lattice from per-row `(first column, length)` spans.
///
/// Qubits are numbered row by row, each row followed by the bridges below it.
/// A bridge is placed at every fourth column (offset 0 for even gaps, 2 for odd
/// gaps) where both neighbouring rows have a qubit.
fn heavy_hex_from_rows(spans: &[(u32, u32)]) -> CouplingMap {
    let mut edges = Vec::new();
    let mut next = 0u32;
    let mut bridges: Vec<(u32, u32)> = Vec::new(); // (column, bridge qubit)

    for (r, &(first, len)) in spans.iter().enumerate() {
        let width = (first + len) as usize;
        let mut row = vec![None; width];
        for c in first..first + len {
            row[c as usize] = Some(next);
            if c > first {
                edges.push((next - 1, next));
            }
            next += 1;
        }
        for &(column, bridge) in &bridges {
            if let Some(Some(q)) = row.get(column as usize) {
                edges.push((bridge, *q));
            }
        }
        bridges.clear();

        if let Some(&(next_first, next_len)) = spans.get(r + 1) {
            let offset = if r % 2 == 0 { 0 } else { 2 };
            let lo = first.max(next_first);
            let hi = (first + len).min(next_first + next_len);
            for column in (offset..hi).step_by(4).filter(|c| *c >= lo) {
                if let Some(Some(q)) = row.get(column as usize) {
                    edges.push((*q, next));
                    bridges.push((column, next));
                    next += 1;
                }
            }
        }
    }

    CouplingMap::build(next, edges)
}

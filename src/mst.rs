//! Minimum spanning tree construction via Prim's algorithm.
//!
//! Trees are built over an ordering of point indices: position 0 of the
//! ordering is always the root, and all distances are looked up through the
//! ordering, so the same instance can be evaluated under many permutations
//! without touching the distance matrix. The selection step is a dense
//! O(n^2) scan over the complete graph.

use crate::instance::MSTInstance;
use serde::{Deserialize, Serialize};

/// A spanning tree over an ordering of point indices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanningTree {
    /// The ordering the tree was built over (position -> point index)
    pub order: Vec<usize>,
    /// Parent position of every position (None for the root and for
    /// positions never reached by a finite-weight edge)
    pub parent: Vec<Option<usize>>,
    /// Weight of the edge to the parent (meaningful when parent is Some)
    pub edge_weight: Vec<f64>,
    /// Maximum edge weight in the tree
    pub height: f64,
    /// Sum of all edge weights
    pub total_weight: f64,
}

impl SpanningTree {
    /// Run Prim's algorithm over `order`, rooted at position 0.
    ///
    /// Ties in the selection step go to the lowest position. If at some
    /// point no unvisited position has a finite key the construction stops
    /// and the result covers only the reached component; with a full
    /// Euclidean matrix this never happens.
    pub fn build(instance: &MSTInstance, order: &[usize]) -> Self {
        let n = order.len();
        let mut key = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut in_tree = vec![false; n];

        if n > 0 {
            key[0] = 0.0;
        }

        for _ in 0..n {
            // First minimum over unvisited keys: strict < keeps the lowest
            // position on ties.
            let mut u = None;
            let mut best = f64::INFINITY;
            for v in 0..n {
                if !in_tree[v] && key[v] < best {
                    best = key[v];
                    u = Some(v);
                }
            }

            let u = match u {
                Some(u) => u,
                // Every remaining key is infinite: nothing left to reach.
                None => break,
            };
            in_tree[u] = true;

            for v in 0..n {
                if !in_tree[v] {
                    let w = instance.distance(order[u], order[v]);
                    if w < key[v] {
                        key[v] = w;
                        parent[v] = Some(u);
                    }
                }
            }
        }

        let mut edge_weight = vec![0.0; n];
        let mut height = 0.0_f64;
        let mut total_weight = 0.0;
        for v in 0..n {
            if parent[v].is_some() {
                edge_weight[v] = key[v];
                height = height.max(key[v]);
                total_weight += key[v];
            }
        }

        SpanningTree {
            order: order.to_vec(),
            parent,
            edge_weight,
            height,
            total_weight,
        }
    }

    /// Number of edges in the tree
    pub fn num_edges(&self) -> usize {
        self.parent.iter().filter(|p| p.is_some()).count()
    }

    /// True when every position is connected to the root
    pub fn is_spanning(&self) -> bool {
        self.order.is_empty() || self.num_edges() == self.order.len() - 1
    }

    /// Tree edges as (parent position, child position, weight) triples
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(v, p)| p.map(|p| (p, v, self.edge_weight[v])))
            .collect()
    }

    /// Adjacency lists over positions, neighbors in ascending position
    /// order so traversals are deterministic.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let n = self.order.len();
        let mut adjacency = vec![Vec::new(); n];
        for (v, p) in self.parent.iter().enumerate() {
            if let Some(p) = *p {
                adjacency[p].push(v);
                adjacency[v].push(p);
            }
        }
        for neighbors in adjacency.iter_mut() {
            neighbors.sort_unstable();
        }
        adjacency
    }
}

impl std::fmt::Display for SpanningTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Spanning tree over {} points", self.order.len())?;
        writeln!(f, "  Edges: {}", self.num_edges())?;
        writeln!(f, "  Height: {:.4}", self.height)?;
        writeln!(f, "  Total weight: {:.4}", self.total_weight)
    }
}

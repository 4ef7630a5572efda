//! TSP tour construction from spanning trees.
//!
//! A tour is the pre-order depth-first walk of an MST, with the start
//! vertex appended again at the end to close the cycle. Its weight is the
//! sum of direct point-to-point distances between consecutive tour
//! vertices, not the weight of the walked tree edges. For Euclidean
//! instances this is the classic 2-approximation of the optimal tour.

use crate::instance::MSTInstance;
use crate::mst::SpanningTree;
use serde::{Deserialize, Serialize};

/// A closed tour over the points of an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    /// Visited point indices; the start vertex appears again at the end
    pub sequence: Vec<usize>,
    /// Total weight over consecutive sequence entries
    pub weight: f64,
    /// Number of improving moves applied after construction (if any)
    pub improvements: Option<usize>,
}

impl Tour {
    /// Build a tour from an explicit vertex sequence.
    pub fn from_sequence(instance: &MSTInstance, sequence: Vec<usize>) -> Self {
        let weight = instance.tour_weight(&sequence);
        Tour {
            sequence,
            weight,
            improvements: None,
        }
    }

    /// Walk the tree depth-first in pre-order from the root and close the
    /// cycle back to the start vertex.
    ///
    /// The traversal uses an explicit stack; children are pushed in reverse
    /// so they pop in ascending position order, matching the recursive
    /// visit order.
    pub fn from_tree(instance: &MSTInstance, tree: &SpanningTree) -> Result<Self, String> {
        let n = tree.order.len();
        if n == 0 {
            return Err("Cannot build a tour from an empty tree".to_string());
        }

        let adjacency = tree.adjacency();
        let mut visited = vec![false; n];
        let mut sequence = Vec::with_capacity(n + 1);
        let mut stack = vec![0usize];

        while let Some(pos) = stack.pop() {
            if visited[pos] {
                continue;
            }
            visited[pos] = true;
            sequence.push(tree.order[pos]);

            for &next in adjacency[pos].iter().rev() {
                if !visited[next] {
                    stack.push(next);
                }
            }
        }

        sequence.push(tree.order[0]);

        Ok(Self::from_sequence(instance, sequence))
    }

    /// True when the sequence returns to its starting vertex
    pub fn is_closed(&self) -> bool {
        self.sequence.len() >= 2 && self.sequence.first() == self.sequence.last()
    }

    /// Number of distinct visits (the closing vertex is not counted twice)
    pub fn num_vertices(&self) -> usize {
        if self.is_closed() {
            self.sequence.len() - 1
        } else {
            self.sequence.len()
        }
    }

    /// Tour weight rounded to the nearest integer
    pub fn rounded_weight(&self) -> i64 {
        self.weight.round() as i64
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tour over {} points", self.num_vertices())?;
        writeln!(f, "  Weight: {:.4}", self.weight)?;
        if let Some(steps) = self.improvements {
            writeln!(f, "  Improving moves: {}", steps)?;
        }
        writeln!(f, "  Sequence: {:?}", self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Metric, Point};
    use crate::permutation::is_permutation;

    fn create_test_instance() -> MSTInstance {
        let points = (0..5)
            .map(|i| Point::new(i, i as f64, i as f64))
            .collect();
        MSTInstance::from_points("diag".to_string(), points, Metric::Euclidean)
    }

    #[test]
    fn test_chain_tour() {
        let instance = create_test_instance();
        let tree = SpanningTree::build(&instance, &[0, 1, 2, 3, 4]);
        let tour = Tour::from_tree(&instance, &tree).unwrap();

        assert_eq!(tour.sequence, vec![0, 1, 2, 3, 4, 0]);
        assert_eq!(tour.sequence.len(), instance.dimension + 1);
        // 4 chain edges plus the closing edge back across the diagonal
        assert!((tour.weight - 8.0 * 2.0_f64.sqrt()).abs() < 1e-10);
        assert_eq!(tour.rounded_weight(), 11);
    }

    #[test]
    fn test_tour_follows_tree_order() {
        let instance = create_test_instance();
        let tree = SpanningTree::build(&instance, &[4, 3, 2, 1, 0]);
        let tour = Tour::from_tree(&instance, &tree).unwrap();

        assert_eq!(tour.sequence, vec![4, 3, 2, 1, 0, 4]);
        assert!((tour.weight - 8.0 * 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_tour_visits_each_point_once() {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 4.0, 1.0),
            Point::new(2, 1.0, 3.0),
            Point::new(3, 5.0, 5.0),
            Point::new(4, 2.0, 2.0),
            Point::new(5, 6.0, 0.0),
        ];
        let instance = MSTInstance::from_points("scatter".to_string(), points, Metric::Euclidean);
        let tree = SpanningTree::build(&instance, &[0, 1, 2, 3, 4, 5]);
        let tour = Tour::from_tree(&instance, &tree).unwrap();

        assert!(tour.is_closed());
        assert_eq!(tour.num_vertices(), instance.dimension);
        assert!(is_permutation(&tour.sequence[..instance.dimension]));
    }

    #[test]
    fn test_single_point_tour() {
        let instance = MSTInstance::from_points(
            "one".to_string(),
            vec![Point::new(0, 3.0, 3.0)],
            Metric::Euclidean,
        );
        let tree = SpanningTree::build(&instance, &[0]);
        let tour = Tour::from_tree(&instance, &tree).unwrap();

        assert_eq!(tour.sequence, vec![0, 0]);
        assert_eq!(tour.weight, 0.0);
    }

    #[test]
    fn test_empty_tree_is_rejected() {
        let instance = create_test_instance();
        let tree = SpanningTree::build(&instance, &[]);
        assert!(Tour::from_tree(&instance, &tree).is_err());
    }
}

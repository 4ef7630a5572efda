//! 2-opt improvement for closed tours.
//!
//! Classic best-improvement 2-opt: pick the segment reversal with the
//! largest weight decrease, apply it, repeat until the best candidate no
//! longer improves the tour. Ties between equally good reversals are
//! broken by coin flip so restarts with different seeds can explore
//! different plateaus.

use crate::instance::MSTInstance;
use crate::tour::Tour;
use log::debug;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Trait for tour improvement methods
pub trait TourImprovement {
    /// Improve the tour in place; returns true when the weight decreased.
    fn improve(&self, instance: &MSTInstance, tour: &mut Tour) -> bool;
    fn name(&self) -> &str;
}

/// Best-improvement 2-opt with randomized tie-breaking
pub struct TwoOptSearch {
    /// Random seed for tie-breaking
    pub seed: u64,
}

impl TwoOptSearch {
    pub fn new() -> Self {
        TwoOptSearch { seed: 42 }
    }

    pub fn with_seed(seed: u64) -> Self {
        TwoOptSearch { seed }
    }
}

impl Default for TwoOptSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl TourImprovement for TwoOptSearch {
    fn improve(&self, instance: &MSTInstance, tour: &mut Tour) -> bool {
        let n = tour.num_vertices();
        if !tour.is_closed() || n < 4 {
            return false;
        }

        // Work on the cycle without the closing vertex; predecessor and
        // successor wrap around.
        let mut cycle: Vec<usize> = tour.sequence[..n].to_vec();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut moves = 0usize;

        loop {
            let mut best_delta = f64::INFINITY;
            let mut best_i = 0;
            let mut best_k = 0;

            for i in 0..n {
                for k in i + 1..n {
                    // Reversing all but one vertex is the identity on a cycle.
                    if (k - i) + 2 >= n {
                        continue;
                    }

                    let prev = if i == 0 { n - 1 } else { i - 1 };
                    let next = if k + 1 == n { 0 } else { k + 1 };

                    let delta = instance.distance(cycle[prev], cycle[k])
                        + instance.distance(cycle[i], cycle[next])
                        - instance.distance(cycle[prev], cycle[i])
                        - instance.distance(cycle[k], cycle[next]);

                    if delta < best_delta - 1e-9 {
                        best_delta = delta;
                        best_i = i;
                        best_k = k;
                    } else if (delta - best_delta).abs() <= 1e-9 && rng.gen_range(0..2) == 0 {
                        best_i = i;
                        best_k = k;
                    }
                }
            }

            if best_delta >= -1e-9 {
                break;
            }

            cycle[best_i..=best_k].reverse();
            moves += 1;
            debug!(
                "2-opt move {}: reversed [{}, {}] for {:+.4}",
                moves, best_i, best_k, best_delta
            );
        }

        if moves > 0 {
            let mut sequence = cycle;
            sequence.push(sequence[0]);
            tour.sequence = sequence;
            tour.weight = instance.tour_weight(&tour.sequence);
        }
        tour.improvements = Some(moves);

        moves > 0
    }

    fn name(&self) -> &str {
        "2-Opt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Metric, Point};
    use crate::mst::SpanningTree;
    use crate::permutation::is_permutation;

    fn unit_square() -> MSTInstance {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 1.0, 0.0),
            Point::new(2, 1.0, 1.0),
            Point::new(3, 0.0, 1.0),
        ];
        MSTInstance::from_points("square".to_string(), points, Metric::Euclidean)
    }

    #[test]
    fn test_uncrosses_square_tour() {
        let instance = unit_square();
        let mut tour = Tour::from_sequence(&instance, vec![0, 2, 1, 3, 0]);
        assert!((tour.weight - (2.0 + 2.0 * 2.0_f64.sqrt())).abs() < 1e-10);

        let improved = TwoOptSearch::new().improve(&instance, &mut tour);

        assert!(improved);
        assert!((tour.weight - 4.0).abs() < 1e-10);
        assert!(tour.is_closed());
        assert!(is_permutation(&tour.sequence[..4]));
        assert_eq!(tour.improvements, Some(1));
    }

    #[test]
    fn test_leaves_optimal_square_alone() {
        let instance = unit_square();
        let mut tour = Tour::from_sequence(&instance, vec![0, 1, 2, 3, 0]);

        let improved = TwoOptSearch::new().improve(&instance, &mut tour);

        assert!(!improved);
        assert!((tour.weight - 4.0).abs() < 1e-10);
        assert_eq!(tour.sequence, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_small_tours_untouched() {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 1.0, 0.0),
            Point::new(2, 0.0, 1.0),
        ];
        let instance = MSTInstance::from_points("tri".to_string(), points, Metric::Euclidean);
        let mut tour = Tour::from_sequence(&instance, vec![0, 1, 2, 0]);
        let before = tour.weight;

        assert!(!TwoOptSearch::new().improve(&instance, &mut tour));
        assert_eq!(tour.weight, before);
    }

    #[test]
    fn test_never_worsens_dfs_tour() {
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 7.0, 1.0),
            Point::new(2, 2.0, 5.0),
            Point::new(3, 6.0, 6.0),
            Point::new(4, 1.0, 2.0),
            Point::new(5, 5.0, 3.0),
            Point::new(6, 3.0, 8.0),
        ];
        let instance = MSTInstance::from_points("scatter".to_string(), points, Metric::Euclidean);
        let tree = SpanningTree::build(&instance, &[0, 1, 2, 3, 4, 5, 6]);
        let mut tour = Tour::from_tree(&instance, &tree).unwrap();
        let before = tour.weight;

        TwoOptSearch::new().improve(&instance, &mut tour);

        assert!(tour.weight <= before + 1e-9);
        assert!(tour.is_closed());
        assert_eq!(tour.num_vertices(), instance.dimension);
        assert!(is_permutation(&tour.sequence[..instance.dimension]));
    }

    #[test]
    fn test_same_seed_reproduces() {
        let instance = unit_square();
        let mut a = Tour::from_sequence(&instance, vec![0, 2, 1, 3, 0]);
        let mut b = Tour::from_sequence(&instance, vec![0, 2, 1, 3, 0]);

        TwoOptSearch::with_seed(7).improve(&instance, &mut a);
        TwoOptSearch::with_seed(7).improve(&instance, &mut b);

        assert_eq!(a.sequence, b.sequence);
    }
}

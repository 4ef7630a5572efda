//! Local search minimizing MST height over point orderings.
//!
//! Each trial draws a random permutation of the point indices, then hill
//! climbs over pairwise swaps: a swap is kept when it strictly lowers the
//! height of the spanning tree built over the permuted ordering and
//! reverted otherwise. Swap passes repeat until a full pass applies no
//! improvement. Trials are independent and individually seeded, so the
//! parallel path returns exactly the sequential result.

use crate::instance::MSTInstance;
use crate::mst::SpanningTree;
use crate::permutation::random_permutation;
use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Configuration for the height search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightSearchConfig {
    /// Number of independent trials
    pub trials: usize,
    /// Base random seed; trial t uses seed + t
    pub seed: u64,
    /// Run trials on the rayon thread pool
    pub parallel: bool,
}

impl Default for HeightSearchConfig {
    fn default() -> Self {
        HeightSearchConfig {
            trials: 5,
            seed: 42,
            parallel: false,
        }
    }
}

/// Outcome of a single trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Trial index
    pub trial: usize,
    /// Height of the randomly drawn starting permutation
    pub initial_height: f64,
    /// Height after the hill climb
    pub height: f64,
    /// Number of swap passes that applied at least one improvement
    pub steps: usize,
}

/// Aggregated outcome over all trials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Name of the searched instance
    pub instance: String,
    /// Number of trials executed
    pub trials: usize,
    /// Mean final height over all trials
    pub avg_height: f64,
    /// Mean improving pass count over all trials
    pub avg_steps: f64,
    /// Ordering achieving the best height
    pub best_order: Vec<usize>,
    /// Best final height over all trials
    pub best_height: f64,
    /// Per-trial outcomes
    pub records: Vec<TrialRecord>,
    /// Wall-clock time in seconds
    pub computation_time: f64,
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Height search on {} ({} trials)", self.instance, self.trials)?;
        writeln!(f, "  Average Height: {:.4}", self.avg_height)?;
        writeln!(f, "  Average Steps: {:.2}", self.avg_steps)?;
        writeln!(f, "  Best Permutation: {:?}", self.best_order)?;
        writeln!(f, "  Best Height: {:.4}", self.best_height)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)
    }
}

/// Multi-start swap hill climb on MST height
pub struct HeightSearch {
    pub config: HeightSearchConfig,
}

impl HeightSearch {
    pub fn new(config: HeightSearchConfig) -> Self {
        HeightSearch { config }
    }

    /// Run all trials and aggregate their outcomes.
    ///
    /// Rejects empty instances and zero-trial configurations; a single
    /// point is searched trivially (height 0, no passes).
    pub fn run(&self, instance: &MSTInstance) -> Result<SearchResult, String> {
        let n = instance.dimension;
        if n == 0 {
            return Err("Cannot search an instance with no points".to_string());
        }
        if self.config.trials == 0 {
            return Err("At least one trial is required".to_string());
        }

        info!(
            "Height search on {}: {} points, {} trials{}",
            instance.name,
            n,
            self.config.trials,
            if self.config.parallel { " (parallel)" } else { "" }
        );
        let start = Instant::now();

        let trials: Vec<(TrialRecord, Vec<usize>)> = if self.config.parallel {
            (0..self.config.trials)
                .into_par_iter()
                .map(|t| self.run_trial(instance, t))
                .collect()
        } else {
            (0..self.config.trials)
                .map(|t| self.run_trial(instance, t))
                .collect()
        };

        let count = trials.len() as f64;
        let avg_height = trials.iter().map(|(r, _)| r.height).sum::<f64>() / count;
        let avg_steps = trials.iter().map(|(r, _)| r.steps as f64).sum::<f64>() / count;

        // min_by_key keeps the first minimum, so equal heights resolve to
        // the lowest trial index.
        let (best_record, best_order) = trials
            .iter()
            .min_by_key(|(record, _)| OrderedFloat(record.height))
            .ok_or("No trial produced a result")?;

        let result = SearchResult {
            instance: instance.name.clone(),
            trials: self.config.trials,
            avg_height,
            avg_steps,
            best_order: best_order.clone(),
            best_height: best_record.height,
            records: trials.iter().map(|(r, _)| r.clone()).collect(),
            computation_time: start.elapsed().as_secs_f64(),
        };

        info!(
            "Height search on {} done: best height {:.4} in {:.4}s",
            instance.name, result.best_height, result.computation_time
        );

        Ok(result)
    }

    /// One trial: random start, then swap passes until none improves.
    fn run_trial(&self, instance: &MSTInstance, trial: usize) -> (TrialRecord, Vec<usize>) {
        let n = instance.dimension;
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(trial as u64));

        let mut order = random_permutation(n, &mut rng);
        let mut height = SpanningTree::build(instance, &order).height;
        let initial_height = height;
        let mut best_order = order.clone();
        let mut steps = 0;

        loop {
            let mut improved_in_pass = false;

            // Position 0 stays the root, so swaps start at position 1.
            for i in 1..n {
                for j in i + 1..n {
                    order.swap(i, j);
                    let candidate = SpanningTree::build(instance, &order).height;
                    if candidate < height {
                        height = candidate;
                        best_order.clone_from(&order);
                        improved_in_pass = true;
                    } else {
                        order.swap(i, j);
                    }
                }
            }

            if improved_in_pass {
                steps += 1;
            } else {
                break;
            }
        }

        debug!(
            "Trial {}: height {:.4} -> {:.4} in {} improving passes",
            trial, initial_height, height, steps
        );

        let record = TrialRecord {
            trial,
            initial_height,
            height,
            steps,
        };
        (record, best_order)
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

    fn search(trials: usize) -> HeightSearch {
        HeightSearch::new(HeightSearchConfig {
            trials,
            seed: 42,
            parallel: false,
        })
    }

    #[test]
    fn test_collinear_points_best_height() {
        let instance = create_test_instance();
        let result = search(5).run(&instance).unwrap();

        assert!((result.best_height - 2.0_f64.sqrt()).abs() < 1e-9);
        assert!((result.avg_height - 2.0_f64.sqrt()).abs() < 1e-9);
        assert!(is_permutation(&result.best_order));
        assert_eq!(result.records.len(), 5);
    }

    #[test]
    fn test_best_never_exceeds_trial_heights() {
        let instance = create_test_instance();
        let result = search(8).run(&instance).unwrap();

        for record in &result.records {
            assert!(result.best_height <= record.height + 1e-12);
        }
    }

    #[test]
    fn test_heights_never_increase() {
        let instance = create_test_instance();
        let result = search(6).run(&instance).unwrap();

        for record in &result.records {
            assert!(record.height <= record.initial_height + 1e-12);
        }
    }

    #[test]
    fn test_single_point() {
        let instance = MSTInstance::from_points(
            "one".to_string(),
            vec![Point::new(0, 2.0, 9.0)],
            Metric::Euclidean,
        );
        let result = search(3).run(&instance).unwrap();

        assert_eq!(result.best_height, 0.0);
        assert_eq!(result.best_order, vec![0]);
        assert_eq!(result.avg_steps, 0.0);
    }

    #[test]
    fn test_two_points_take_no_steps() {
        let instance = MSTInstance::from_points(
            "pair".to_string(),
            vec![Point::new(0, 0.0, 0.0), Point::new(1, 3.0, 4.0)],
            Metric::Euclidean,
        );
        let result = search(4).run(&instance).unwrap();

        assert!((result.best_height - 5.0).abs() < 1e-10);
        assert!(result.records.iter().all(|r| r.steps == 0));
    }

    #[test]
    fn test_empty_instance_rejected() {
        let instance = MSTInstance::from_points("void".to_string(), Vec::new(), Metric::Euclidean);
        assert!(search(1).run(&instance).is_err());
    }

    #[test]
    fn test_zero_trials_rejected() {
        let instance = create_test_instance();
        assert!(search(0).run(&instance).is_err());
    }

    #[test]
    fn test_same_seed_reproduces() {
        let instance = create_test_instance();
        let a = search(4).run(&instance).unwrap();
        let b = search(4).run(&instance).unwrap();

        assert_eq!(a.best_order, b.best_order);
        assert_eq!(a.best_height, b.best_height);
        for (ra, rb) in a.records.iter().zip(&b.records) {
            assert_eq!(ra.initial_height, rb.initial_height);
            assert_eq!(ra.steps, rb.steps);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let instance = create_test_instance();
        let sequential = search(6).run(&instance).unwrap();
        let parallel = HeightSearch::new(HeightSearchConfig {
            trials: 6,
            seed: 42,
            parallel: true,
        })
        .run(&instance)
        .unwrap();

        assert_eq!(sequential.best_order, parallel.best_order);
        assert_eq!(sequential.best_height, parallel.best_height);
        for (rs, rp) in sequential.records.iter().zip(&parallel.records) {
            assert_eq!(rs.height, rp.height);
            assert_eq!(rs.steps, rp.steps);
        }
    }
}

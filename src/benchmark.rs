//! Benchmarking and experimentation module.
//!
//! Runs the height search over collections of instance files, records
//! per-instance results together with the MST-based tours, and exports
//! CSV tables and a text report.

use crate::heuristics::height_search::{HeightSearch, HeightSearchConfig};
use crate::heuristics::two_opt::{TourImprovement, TwoOptSearch};
use crate::instance::MSTInstance;
use crate::mst::SpanningTree;
use crate::tour::Tour;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Result of benchmarking a single instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceResult {
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Number of search trials
    pub trials: usize,
    /// Best MST height found
    pub best_height: f64,
    /// Mean MST height over trials
    pub avg_height: f64,
    /// Mean improving pass count over trials
    pub avg_steps: f64,
    /// Total weight of the best MST
    pub mst_weight: f64,
    /// Weight of the depth-first tour over the best MST
    pub tour_weight: f64,
    /// Tour weight after 2-opt (equals tour_weight when disabled)
    pub improved_tour_weight: f64,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated statistics over all benchmarked instances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    /// Number of instances benchmarked
    pub num_instances: usize,
    /// Average best height
    pub avg_best_height: f64,
    /// Standard deviation of best heights
    pub std_best_height: f64,
    /// Average improving pass count
    pub avg_steps: f64,
    /// Average 2-opt weight reduction in percent
    pub avg_tour_gain: f64,
    /// Average time per instance
    pub avg_time: f64,
    /// Total time
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Trials per instance; None picks ceil(sqrt(n)) per instance
    pub trials: Option<usize>,
    /// Base random seed
    pub seed: u64,
    /// Run search trials in parallel
    pub parallel: bool,
    /// Apply 2-opt to the depth-first tours
    pub improve_tours: bool,
    /// Save CSV and report to the output directory
    pub save_results: bool,
    /// Output directory
    pub output_dir: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            trials: None,
            seed: 42,
            parallel: false,
            improve_tours: true,
            save_results: true,
            output_dir: "results".to_string(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<InstanceResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Trials for one instance: the configured count, or ceil(sqrt(n))
    fn trials_for(&self, instance: &MSTInstance) -> usize {
        self.config
            .trials
            .unwrap_or_else(|| (instance.dimension as f64).sqrt().ceil() as usize)
            .max(1)
    }

    /// Run the height search and the tour pipeline on one instance
    pub fn run_instance(&mut self, instance: &MSTInstance) -> Result<(), String> {
        let trials = self.trials_for(instance);
        let start = Instant::now();

        let search = HeightSearch::new(HeightSearchConfig {
            trials,
            seed: self.config.seed,
            parallel: self.config.parallel,
        });
        let outcome = search.run(instance)?;

        let tree = SpanningTree::build(instance, &outcome.best_order);
        let mut tour = Tour::from_tree(instance, &tree)?;
        let tour_weight = tour.weight;

        if self.config.improve_tours {
            TwoOptSearch::with_seed(self.config.seed).improve(instance, &mut tour);
        }

        self.results.push(InstanceResult {
            instance: instance.name.clone(),
            dimension: instance.dimension,
            trials,
            best_height: outcome.best_height,
            avg_height: outcome.avg_height,
            avg_steps: outcome.avg_steps,
            mst_weight: tree.total_weight,
            tour_weight,
            improved_tour_weight: tour.weight,
            time: start.elapsed().as_secs_f64(),
        });

        Ok(())
    }

    /// Run the benchmark on every instance, skipping failures
    pub fn run_on_instances(&mut self, instances: &[MSTInstance]) {
        for instance in instances {
            log::info!("Benchmarking instance: {}", instance.name);
            if let Err(e) = self.run_instance(instance) {
                log::error!("Benchmark failed on {}: {}", instance.name, e);
            }
        }
    }

    /// Aggregate statistics over all recorded results
    pub fn compute_statistics(&self) -> BenchmarkStatistics {
        let heights: Vec<f64> = self.results.iter().map(|r| r.best_height).collect();
        let steps: Vec<f64> = self.results.iter().map(|r| r.avg_steps).collect();
        let times: Vec<f64> = self.results.iter().map(|r| r.time).collect();
        let gains: Vec<f64> = self
            .results
            .iter()
            .filter(|r| r.tour_weight > 0.0)
            .map(|r| (r.tour_weight - r.improved_tour_weight) / r.tour_weight * 100.0)
            .collect();

        let mean_of = |values: &[f64]| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().mean()
            }
        };
        // std_dev is the sample deviation and needs two values
        let std_best_height = if heights.len() < 2 {
            0.0
        } else {
            heights.iter().std_dev()
        };

        BenchmarkStatistics {
            num_instances: self.results.len(),
            avg_best_height: mean_of(&heights),
            std_best_height,
            avg_steps: mean_of(&steps),
            avg_tour_gain: mean_of(&gains),
            avg_time: mean_of(&times),
            total_time: times.iter().sum(),
        }
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("      MST Height Search Benchmark\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        report.push_str("Per-Instance Results:\n");
        report.push_str("-".repeat(98).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<20} {:>7} {:>7} {:>12} {:>10} {:>12} {:>12} {:>10}\n",
            "Instance", "Points", "Trials", "Best Height", "Avg Steps", "Tour", "2-Opt Tour", "Time"
        ));
        report.push_str("-".repeat(98).as_str());
        report.push('\n');

        for result in &self.results {
            report.push_str(&format!(
                "{:<20} {:>7} {:>7} {:>12.4} {:>10.2} {:>12.2} {:>12.2} {:>9.4}s\n",
                result.instance,
                result.dimension,
                result.trials,
                result.best_height,
                result.avg_steps,
                result.tour_weight,
                result.improved_tour_weight,
                result.time
            ));
        }

        report.push_str("-".repeat(98).as_str());
        report.push('\n');

        let stats = self.compute_statistics();
        report.push_str("\nSummary:\n");
        report.push_str(&format!("  Instances: {}\n", stats.num_instances));
        report.push_str(&format!(
            "  Best height: {:.4} +/- {:.4}\n",
            stats.avg_best_height, stats.std_best_height
        ));
        report.push_str(&format!("  Avg improving passes: {:.2}\n", stats.avg_steps));
        report.push_str(&format!("  Avg 2-opt gain: {:.2}%\n", stats.avg_tour_gain));
        report.push_str(&format!(
            "  Time: {:.4}s total, {:.4}s avg\n",
            stats.total_time, stats.avg_time
        ));

        report
    }

    /// Write the CSV table and the report into the output directory
    pub fn save(&self) -> std::io::Result<()> {
        if !self.config.save_results {
            return Ok(());
        }

        std::fs::create_dir_all(&self.config.output_dir)?;
        let csv_path = Path::new(&self.config.output_dir).join("benchmark_results.csv");
        let report_path = Path::new(&self.config.output_dir).join("benchmark_report.txt");

        self.export_to_csv(&csv_path)?;
        std::fs::write(&report_path, self.generate_report())?;

        log::info!(
            "Saved benchmark results to {}",
            self.config.output_dir
        );
        Ok(())
    }

    /// Get all results
    pub fn results(&self) -> &[InstanceResult] {
        &self.results
    }
}

/// Helper function to load instances from a directory
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Vec<MSTInstance> {
    let mut instances = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "txt").unwrap_or(false) {
                match MSTInstance::from_file(&path) {
                    Ok(instance) => instances.push(instance),
                    Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                }
            }
        }
    }

    // Sort by dimension
    instances.sort_by_key(|i| i.dimension);

    instances
}

//! MST-TSP Solver - Command Line Interface
//!
//! Minimum spanning tree height minimization and MST-based TSP tours
//! over 2D point sets.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mst_tsp_solver::benchmark::{load_instances_from_dir, Benchmark, BenchmarkConfig};
use mst_tsp_solver::generator::{write_instance_file, InstanceGenerator};
use mst_tsp_solver::heuristics::height_search::{HeightSearch, HeightSearchConfig};
use mst_tsp_solver::heuristics::two_opt::{TourImprovement, TwoOptSearch};
use mst_tsp_solver::instance::MSTInstance;
use mst_tsp_solver::mst::SpanningTree;
use mst_tsp_solver::permutation;
use mst_tsp_solver::tour::Tour;
use mst_tsp_solver::visualization::Visualizer;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mst-tsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "MST height minimization and MST-based TSP tours over 2D point sets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Minimize the MST height over point orderings
    Solve {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of search trials; defaults to ceil(sqrt(n))
        #[arg(short, long)]
        trials: Option<usize>,

        /// Distance metric
        #[arg(long, value_enum, default_value = "euclidean")]
        metric: Metric,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Run trials on the rayon thread pool
        #[arg(long)]
        parallel: bool,

        /// Output result to JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate SVG of the best spanning tree
        #[arg(long)]
        visualize: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Build the MST and its depth-first tour
    Tour {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Distance metric
        #[arg(long, value_enum, default_value = "euclidean")]
        metric: Metric,

        /// Improve the tour with 2-opt
        #[arg(long)]
        improve: bool,

        /// Random seed (2-opt tie-breaking)
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Also report the tour weight rounded to the nearest integer
        #[arg(long)]
        rounded: bool,

        /// Output tour to JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate SVG of the tree and tour
        #[arg(long)]
        visualize: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Run benchmarks on a directory of instances
    Benchmark {
        /// Directory containing instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Trials per instance; defaults to ceil(sqrt(n))
        #[arg(short, long)]
        trials: Option<usize>,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Run trials in parallel
        #[arg(long)]
        parallel: bool,

        /// Skip the 2-opt tour improvement
        #[arg(long)]
        no_improve: bool,

        /// Maximum instance size
        #[arg(long)]
        max_size: Option<usize>,
    },

    /// Generate a random instance file
    Generate {
        /// Number of points
        #[arg(short, long)]
        points: usize,

        /// Maximum coordinate value
        #[arg(short, long, default_value = "1000")]
        max_coord: i64,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Metric {
    /// Exact Euclidean distances
    Euclidean,
    /// Euclidean distances rounded to the nearest integer
    Rounded,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            trials,
            metric,
            seed,
            parallel,
            output,
            visualize,
            verbose,
        } => {
            solve_instance(&instance, trials, metric, seed, parallel, output, visualize, verbose);
        }

        Commands::Tour {
            instance,
            metric,
            improve,
            seed,
            rounded,
            output,
            visualize,
        } => {
            build_tour(&instance, metric, improve, seed, rounded, output, visualize);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }

        Commands::Benchmark {
            dir,
            output,
            trials,
            seed,
            parallel,
            no_improve,
            max_size,
        } => {
            run_benchmark(&dir, &output, trials, seed, parallel, no_improve, max_size);
        }

        Commands::Generate {
            points,
            max_coord,
            seed,
            output,
        } => {
            generate_instance(points, max_coord, seed, &output);
        }
    }
}

fn load_or_exit(path: &PathBuf, metric: Metric) -> MSTInstance {
    let metric = match metric {
        Metric::Euclidean => mst_tsp_solver::instance::Metric::Euclidean,
        Metric::Rounded => mst_tsp_solver::instance::Metric::RoundedEuclidean,
    };

    match MSTInstance::from_file_with_metric(path, metric) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(
    path: &PathBuf,
    trials: Option<usize>,
    metric: Metric,
    seed: u64,
    parallel: bool,
    output: Option<PathBuf>,
    visualize: bool,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", path);
    let instance = load_or_exit(path, metric);

    if verbose {
        println!("{}", instance.statistics());
    }

    let trials = trials
        .unwrap_or_else(|| (instance.dimension as f64).sqrt().ceil() as usize)
        .max(1);
    println!("Searching with {} trials (seed {})...", trials, seed);

    let search = HeightSearch::new(HeightSearchConfig {
        trials,
        seed,
        parallel,
    });
    let result = match search.run(&instance) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n========== Results ==========");
    print!("{}", result);

    if verbose {
        println!("\nTrials:");
        for record in &result.records {
            println!(
                "  Trial {}: {:.4} -> {:.4} ({} improving passes)",
                record.trial, record.initial_height, record.height, record.steps
            );
        }
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&result).expect("Failed to serialize result");
        std::fs::write(&out_path, json).expect("Failed to write output");
        println!("\nResult saved to {:?}", out_path);
    }

    if visualize {
        let tree = SpanningTree::build(&instance, &result.best_order);
        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &tree, None);
        let svg_path = path.with_extension("svg");
        viz.save_svg(&svg, &svg_path).expect("Failed to save SVG");
        println!("Visualization saved to {:?}", svg_path);
    }
}

fn build_tour(
    path: &PathBuf,
    metric: Metric,
    improve: bool,
    seed: u64,
    rounded: bool,
    output: Option<PathBuf>,
    visualize: bool,
) {
    println!("Loading instance from {:?}...", path);
    let instance = load_or_exit(path, metric);

    let order = permutation::identity(instance.dimension);
    let tree = SpanningTree::build(&instance, &order);
    print!("{}", tree);

    let mut tour = match Tour::from_tree(&instance, &tree) {
        Ok(tour) => tour,
        Err(e) => {
            eprintln!("Tour construction failed: {}", e);
            std::process::exit(1);
        }
    };

    if improve {
        let two_opt = TwoOptSearch::with_seed(seed);
        if two_opt.improve(&instance, &mut tour) {
            println!(
                "2-opt applied {} improving moves",
                tour.improvements.unwrap_or(0)
            );
        } else {
            println!("2-opt found no improving move");
        }
    }

    print!("{}", tour);
    if rounded {
        println!("  Rounded weight: {}", tour.rounded_weight());
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&tour).expect("Failed to serialize tour");
        std::fs::write(&out_path, json).expect("Failed to write output");
        println!("\nTour saved to {:?}", out_path);
    }

    if visualize {
        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &tree, Some(&tour));
        let svg_path = path.with_extension("svg");
        viz.save_svg(&svg, &svg_path).expect("Failed to save SVG");
        println!("Visualization saved to {:?}", svg_path);
    }
}

fn analyze_instance(path: &PathBuf) {
    let instance = load_or_exit(path, Metric::Euclidean);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let order = permutation::identity(instance.dimension);
    let tree = SpanningTree::build(&instance, &order);

    println!("Spanning tree over the natural order:");
    println!("  Height: {:.4}", tree.height);
    println!("  Total weight: {:.4}", tree.total_weight);

    match Tour::from_tree(&instance, &tree) {
        Ok(tour) => println!("  Depth-first tour weight: {:.2}", tour.weight),
        Err(e) => println!("  No tour: {}", e),
    }
}

fn run_benchmark(
    dir: &PathBuf,
    output: &PathBuf,
    trials: Option<usize>,
    seed: u64,
    parallel: bool,
    no_improve: bool,
    max_size: Option<usize>,
) {
    println!("Loading instances from {:?}...", dir);

    let mut instances = load_instances_from_dir(dir);

    if let Some(max) = max_size {
        instances.retain(|i| i.dimension <= max);
    }

    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        eprintln!("No instances found!");
        return;
    }

    let config = BenchmarkConfig {
        trials,
        seed,
        parallel,
        improve_tours: !no_improve,
        save_results: true,
        output_dir: output.to_string_lossy().to_string(),
    };

    let mut benchmark = Benchmark::new(config);

    let pb = ProgressBar::new(instances.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40}] {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    for instance in &instances {
        pb.set_message(instance.name.clone());
        if let Err(e) = benchmark.run_instance(instance) {
            log::error!("Benchmark failed on {}: {}", instance.name, e);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let report = benchmark.generate_report();
    println!("\n{}", report);

    benchmark.save().expect("Failed to save benchmark results");
    println!("Results saved to {:?}", output);
}

fn generate_instance(points: usize, max_coord: i64, seed: u64, output: &PathBuf) {
    if points == 0 {
        eprintln!("At least one point is required");
        std::process::exit(1);
    }

    let name = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("generated")
        .to_string();

    let generator = InstanceGenerator::new(points, max_coord, seed);
    let instance = generator.generate(&name, mst_tsp_solver::instance::Metric::Euclidean);

    write_instance_file(&instance, output).expect("Failed to write instance file");
    println!("Wrote {} points to {:?}", instance.dimension, output);
}

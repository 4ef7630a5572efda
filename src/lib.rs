//! MST-TSP Solver Library
//!
//! Minimum spanning trees over 2D point sets, a local search minimizing
//! the MST height over point orderings, and MST-based TSP tour
//! construction.
//!
//! # Features
//!
//! - Prim's algorithm over arbitrary point orderings with precomputed
//!   Euclidean (or rounded-Euclidean) distance matrices
//! - Multi-start swap hill climb on MST height with reproducible seeding
//!   and optional parallel trials
//! - Depth-first tour construction from spanning trees, improvable with
//!   2-opt
//! - Instance generation, benchmarking and SVG visualization tools
//!
//! # Example
//!
//! ```no_run
//! use mst_tsp_solver::instance::MSTInstance;
//! use mst_tsp_solver::heuristics::height_search::{HeightSearch, HeightSearchConfig};
//! use mst_tsp_solver::mst::SpanningTree;
//! use mst_tsp_solver::tour::Tour;
//!
//! // Load instance
//! let instance = MSTInstance::from_file("points.txt").unwrap();
//!
//! // Search for an ordering with a low MST height
//! let search = HeightSearch::new(HeightSearchConfig::default());
//! let result = search.run(&instance).unwrap();
//!
//! // Turn the best tree into a tour
//! let tree = SpanningTree::build(&instance, &result.best_order);
//! let tour = Tour::from_tree(&instance, &tree).unwrap();
//!
//! println!("Best height: {:.4}, tour weight: {:.2}", result.best_height, tour.weight);
//! ```

pub mod benchmark;
pub mod generator;
pub mod heuristics;
pub mod instance;
pub mod mst;
pub mod permutation;
pub mod tour;
pub mod visualization;

pub use instance::MSTInstance;
pub use mst::SpanningTree;
pub use tour::Tour;

//! Heuristics module.
//!
//! This module exports the MST height search and tour improvement
//! heuristics.

pub mod height_search;
pub mod two_opt;

pub use height_search::*;
pub use two_opt::*;

//! Hybrid evolutionary algorithm.
//!
//! A steady-state genetic algorithm over an elite population of local
//! optima. Each generation recombines two random parents, optionally
//! descends from the offspring, and lets it replace the worst member when
//! it is strictly better and its objective is not already present.
//!
//! # References
//!
//! - Jaszkiewicz, A. & Kominek, P. (2003). "Genetic local search with
//!   distance preserving recombination operator for a vehicle routing
//!   problem", *European Journal of Operational Research* 151(2), 352-364.

mod config;
mod recombination;
mod runner;

pub use config::{HybridConfig, Recombination};
pub use recombination::{common_nodes_repair, common_subpaths, recombine};
pub use runner::{HybridResult, HybridRunner};

//! Local search and metaheuristics for the selective travelling salesman
//! problem.
//!
//! Given `n` nodes with pairwise distances and per-node costs, select
//! exactly `k = ⌈n / 2⌉` of them and order them into a Hamiltonian cycle so
//! that the cycle length plus the costs of the selected nodes is minimal.
//!
//! The crate is organised in layers:
//!
//! - **Model**: [`Instance`] (validated, symmetrized data), [`Solution`]
//!   (a path and its objective) and [`Tour`] (mutable state with
//!   incremental objective and O(1) move deltas).
//! - **Construction**: random, greedy and regret cycle heuristics plus
//!   cheapest-insertion [`repair`](construction::repair).
//! - **Local search**: steepest and greedy descent over 2-opt (or swap) and
//!   node-exchange moves, over the full neighbourhood, a
//!   [`CandidateSet`] of short edges, or either with a move cache.
//! - **Drivers**: multi-start ([`msls`]), iterated ([`ils`]), variable
//!   neighbourhood ([`vns`]) and large neighbourhood ([`lns`]) search, and
//!   a steady-state hybrid evolutionary algorithm ([`hybrid`]).
//!
//! Every driver takes a builder-style config with a time and/or iteration
//! budget and an optional seed; seeded runs are reproducible.
//!
//! # Examples
//!
//! ```
//! use u_selective_tsp::ils::{IlsConfig, IlsRunner};
//! use u_selective_tsp::Instance;
//!
//! let points: Vec<(i64, i64)> = (0..20).map(|i| (i * 37 % 101, i * 11 % 47)).collect();
//! let costs = (0..20).map(|i| (i * 7 % 13) as i64).collect();
//! let instance = Instance::from_coordinates(&points, costs).unwrap();
//!
//! let config = IlsConfig::default().with_max_iterations(50).with_seed(42);
//! let result = IlsRunner::run(&instance, &config).unwrap();
//! assert_eq!(result.best.len(), instance.k());
//! assert_eq!(result.best.objective, instance.objective(&result.best.path));
//! ```

pub mod batch;
pub mod budget;
pub mod candidates;
pub mod construction;
pub mod error;
pub mod hybrid;
pub mod ils;
pub mod instance;
pub mod lns;
pub mod local_search;
pub mod msls;
pub mod perturbation;
pub mod similarity;
pub mod solution;
pub mod tour;
pub mod vns;

mod random;
#[cfg(test)]
mod test_utils;

pub use budget::StopReason;
pub use candidates::CandidateSet;
pub use error::{Error, Result};
pub use instance::Instance;
pub use solution::Solution;
pub use tour::{Span, Tour};

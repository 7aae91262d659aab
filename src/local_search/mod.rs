//! Local search over 2-opt (or swap) and node-exchange moves.
//!
//! The engine repeatedly applies improving moves until none is left. Two
//! disciplines decide which improving move is applied (steepest: the best;
//! greedy: the first of a randomized scan) and four neighbourhood kinds
//! decide which moves are examined and how:
//!
//! - **Full**: every 2-opt pair and every exchange, O(k² + k(n - k)).
//! - **Candidates**: only moves that introduce one of the K cheapest edges
//!   of a node (see [`CandidateSet`](crate::CandidateSet)).
//! - **Cached**: either of the above, but improving moves are kept in a
//!   [`MoveCache`] between iterations and only moves around the last change
//!   are re-enumerated.
//!
//! Steepest ties are broken by [`MoveKey`] order, so the cached and
//! uncached variants of a neighbourhood follow the same trajectory.
//!
//! # References
//!
//! - Croes, G. A. (1958). "A method for solving traveling-salesman problems",
//!   *Operations Research* 6(6), 791-812.
//! - Bentley, J. L. (1992). "Fast algorithms for geometric traveling salesman
//!   problems", *ORSA Journal on Computing* 4(4), 387-411.

mod cache;
mod config;
mod moves;
mod neighborhood;
mod runner;

pub use cache::MoveCache;
pub use config::{Discipline, IntraMove, LocalSearchConfig, NeighborhoodKind};
pub use moves::{Edge, Move, MoveKey, MoveRecord};
pub use runner::{LocalSearch, LocalSearchStats};

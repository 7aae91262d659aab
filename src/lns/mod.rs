//! Large Neighborhood Search (LNS).
//!
//! Repeatedly removes a sizeable part of the current solution with one of
//! several destroy policies, rebuilds it by cheapest insertion, optionally
//! descends, and keeps the result when it is strictly better.
//!
//! # References
//!
//! - Shaw, P. (1998). "Using constraint programming and local search
//!   methods to solve vehicle routing problems", *CP-98*, 417-431.
//! - Pisinger, D. & Ropke, S. (2010). "Large neighborhood search",
//!   *Handbook of Metaheuristics*, 399-419.

mod config;
mod destroy;
mod runner;

pub use config::{DestroyPolicy, LnsConfig};
pub use destroy::{destroy, destroy_count};
pub use runner::{LnsResult, LnsRunner};

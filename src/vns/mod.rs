//! Variable Neighborhood Search (VNS).
//!
//! At each step the current solution is shaken in neighbourhood k, driven
//! back to a local optimum, and accepted if strictly better. Acceptance
//! resets the search to the first neighbourhood; otherwise the next one
//! is tried. The four shaking neighbourhoods grow in disruption: node
//! exchanges, random 2-opts, destroy/repair and the double bridge.
//!
//! # References
//!
//! - Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//!   *Computers & Operations Research* 24(11), 1097-1100.
//! - Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//!   Principles and applications", *European Journal of Operational Research* 130(3), 449-467.

mod config;
mod runner;

pub use config::{NeighborhoodChange, ShakeOperator, VnsConfig};
pub use runner::{VnsResult, VnsRunner};

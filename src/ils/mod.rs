//! Iterated Local Search (ILS).
//!
//! Kicks the current local optimum with a random perturbation, descends
//! again, and keeps the result only when it is strictly better. Operator
//! and strength are fixed for the whole run.
//!
//! # References
//!
//! - Lourenço, H. R., Martin, O. C. & Stützle, T. (2003). "Iterated local
//!   search", *Handbook of Metaheuristics*, 320-353.

mod config;
mod runner;

pub use config::{IlsConfig, Perturbation};
pub use runner::{IlsResult, IlsRunner};

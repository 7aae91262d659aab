//! Multiple Start Local Search (MSLS).
//!
//! Builds independent starting solutions, drives each to a local optimum
//! and keeps the best one. No information flows between starts.

mod config;
mod runner;

pub use config::MslsConfig;
pub use runner::{MslsResult, MslsRunner};

//! Crate-wide error type.

use thiserror::Error as ThisError;

/// Errors reported while building an instance, seeding a tour, or
/// validating a driver configuration.
///
/// Once a run has started nothing in the search loop can fail: unproductive
/// steps degrade to no-ops instead.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error(
        "distance matrix is not square: row {row} has {len} entries, expected {expected}"
    )]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("cost vector has {got} entries, expected {expected}")]
    CostLength { expected: usize, got: usize },
    #[error("distance from node {index} to itself is {value}, expected 0")]
    NonZeroDiagonal { index: usize, value: i64 },
    #[error("negative distance {value} between nodes {from} and {to}")]
    NegativeDistance { from: usize, to: usize, value: i64 },
    #[error("negative cost {value} at node {index}")]
    NegativeCost { index: usize, value: i64 },
    #[error(
        "distances between {from} and {to} differ by more than {tolerance} ({forward} vs {backward})"
    )]
    Asymmetric {
        from: usize,
        to: usize,
        forward: i64,
        backward: i64,
        tolerance: i64,
    },
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

//! The externally visible search result.

use crate::instance::Instance;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cyclic path together with its objective value.
///
/// Produced by every construction heuristic and driver. The objective
/// always equals [`Instance::objective`] of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    pub path: Vec<usize>,
    pub objective: i64,
}

impl Solution {
    /// Wraps `path`, computing its objective from scratch.
    pub fn new(instance: &Instance, path: Vec<usize>) -> Self {
        let objective = instance.objective(&path);
        Self { path, objective }
    }

    /// The solution of an instance with no nodes.
    pub fn empty() -> Self {
        Self {
            path: Vec::new(),
            objective: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

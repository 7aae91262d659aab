//! Candidate edges: the K cheapest neighbours of every node.
//!
//! Neighbour `v` of `u` is ranked by `D[u][v] + C[v]`, the cost of
//! reaching `v` and taking it into the tour. The kept pairs form an
//! undirected edge set; local search only considers moves that introduce
//! at least one of these edges.

use crate::instance::Instance;
use std::collections::HashSet;

/// Default number of neighbours kept per node.
pub const DEFAULT_CANDIDATE_COUNT: usize = 10;

/// Per-node candidate lists and the undirected candidate-edge set.
///
/// Built once per run and read-only afterwards.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::{CandidateSet, Instance};
///
/// let instance = Instance::from_coordinates(
///     &[(0, 0), (10, 0), (0, 1), (50, 50)],
///     vec![0, 0, 0, 0],
/// ).unwrap();
/// let candidates = CandidateSet::build(&instance, 1);
/// assert_eq!(candidates.nearest(0), &[2]);
/// assert!(candidates.contains(2, 0));
/// assert!(!candidates.contains(0, 3));
/// ```
#[derive(Debug, Clone)]
pub struct CandidateSet {
    size: usize,
    nearest: Vec<Vec<usize>>,
    adjacent: Vec<Vec<usize>>,
    edges: HashSet<(usize, usize)>,
}

#[inline]
fn canonical(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl CandidateSet {
    /// Ranks every other node for every node and keeps the first `size`.
    /// Ties keep increasing node id order.
    pub fn build(instance: &Instance, size: usize) -> Self {
        let n = instance.n();
        let mut nearest = Vec::with_capacity(n);
        let mut adjacent = vec![Vec::new(); n];
        let mut edges = HashSet::new();

        for u in 0..n {
            let mut ranked: Vec<usize> = (0..n).filter(|&v| v != u).collect();
            ranked.sort_by_key(|&v| instance.dist(u, v) + instance.cost(v));
            ranked.truncate(size);
            for &v in &ranked {
                if edges.insert(canonical(u, v)) {
                    adjacent[u].push(v);
                    adjacent[v].push(u);
                }
            }
            nearest.push(ranked);
        }
        for list in &mut adjacent {
            list.sort_unstable();
        }

        Self {
            size,
            nearest,
            adjacent,
            edges,
        }
    }

    /// Number of neighbours kept per node.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The ranked neighbour list of `u`.
    pub fn nearest(&self, u: usize) -> &[usize] {
        &self.nearest[u]
    }

    /// Every node joined to `u` by a candidate edge, in either direction of
    /// the ranking. Sorted by node id.
    pub fn adjacent(&self, u: usize) -> &[usize] {
        &self.adjacent[u]
    }

    /// Whether the undirected edge `{a, b}` is a candidate edge.
    #[inline]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&canonical(a, b))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

//! Similarity between solutions, for studying how local optima cluster.

use std::collections::HashSet;

/// Edge `{a, b}` as an ordered pair.
pub(crate) fn undirected(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Undirected edges of the cycle through `path`. Paths of fewer than two
/// nodes have none.
pub fn cycle_edges(path: &[usize]) -> HashSet<(usize, usize)> {
    if path.len() < 2 {
        return HashSet::new();
    }
    (0..path.len())
        .map(|i| undirected(path[i], path[(i + 1) % path.len()]))
        .collect()
}

/// Number of nodes selected by both solutions.
pub fn common_nodes(a: &[usize], b: &[usize]) -> usize {
    let in_a: HashSet<usize> = a.iter().copied().collect();
    b.iter().filter(|v| in_a.contains(v)).count()
}

/// Number of undirected cycle edges shared by both solutions.
pub fn common_edges(a: &[usize], b: &[usize]) -> usize {
    let edges = cycle_edges(a);
    cycle_edges(b).iter().filter(|e| edges.contains(e)).count()
}

//! Objective deltas of the three move families.
//!
//! Every function is a pure function of the instance, the current cyclic
//! node order and the move's indices: nothing is mutated, and the cost is
//! O(1) regardless of tour length. Callers are responsible for index
//! validity.

use crate::instance::Instance;

#[inline]
pub(crate) fn succ(len: usize, i: usize) -> usize {
    if i + 1 == len {
        0
    } else {
        i + 1
    }
}

#[inline]
pub(crate) fn pred(len: usize, i: usize) -> usize {
    if i == 0 {
        len - 1
    } else {
        i - 1
    }
}

/// Whether cutting after positions `i` and `j` is a degenerate 2-opt
/// (same edge or two edges sharing a node).
#[inline]
pub(crate) fn is_degenerate_two_opt(len: usize, i: usize, j: usize) -> bool {
    i == j || succ(len, i) == j || succ(len, j) == i
}

/// Delta of removing edges `(T[i], T[i+1])` and `(T[j], T[j+1])` and adding
/// `(T[i], T[j])` and `(T[i+1], T[j+1])`.
///
/// Zero for degenerate pairs. Independent of which side of the cycle is
/// actually reversed.
pub fn two_opt(instance: &Instance, nodes: &[usize], i: usize, j: usize) -> i64 {
    let len = nodes.len();
    if len < 4 || is_degenerate_two_opt(len, i, j) {
        return 0;
    }
    let a = nodes[i];
    let b = nodes[succ(len, i)];
    let c = nodes[j];
    let d = nodes[succ(len, j)];
    instance.dist(a, c) + instance.dist(b, d) - instance.dist(a, b) - instance.dist(c, d)
}

/// Delta of replacing the selected node at position `i` with the unselected
/// node `u`.
///
/// A one-node tour has no edges, so only the costs change.
pub fn exchange(instance: &Instance, nodes: &[usize], i: usize, u: usize) -> i64 {
    let len = nodes.len();
    let v = nodes[i];
    let cost_change = instance.cost(u) - instance.cost(v);
    if len == 1 {
        return cost_change;
    }
    let a = nodes[pred(len, i)];
    let b = nodes[succ(len, i)];
    instance.dist(a, u) + instance.dist(u, b) - instance.dist(a, v) - instance.dist(v, b)
        + cost_change
}

/// Delta of swapping the nodes at positions `i` and `j`.
///
/// Adjacent positions share an edge and are handled separately from the
/// general four-edge case. Tours of fewer than three nodes are unchanged by
/// any swap.
pub fn swap(instance: &Instance, nodes: &[usize], i: usize, j: usize) -> i64 {
    let len = nodes.len();
    if i == j || len < 3 {
        return 0;
    }
    let (i, j) = if succ(len, j) == i { (j, i) } else { (i, j) };
    let u = nodes[i];
    let v = nodes[j];
    let d = |x: usize, y: usize| instance.dist(x, y);

    if succ(len, i) == j {
        // a u v b -> a v u b
        let a = nodes[pred(len, i)];
        let b = nodes[succ(len, j)];
        return d(a, v) + d(u, b) - d(a, u) - d(v, b);
    }

    let a = nodes[pred(len, i)];
    let b = nodes[succ(len, i)];
    let c = nodes[pred(len, j)];
    let e = nodes[succ(len, j)];
    d(a, v) + d(v, b) + d(c, u) + d(u, e) - d(a, u) - d(u, b) - d(c, v) - d(v, e)
}

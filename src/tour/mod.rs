//! Mutable tour state.
//!
//! A [`Tour`] is a flat cyclic array of the selected nodes plus an inverse
//! position map and a selection mask over all nodes. Moves rewrite only the
//! positions they touch and keep the three views consistent, together with
//! an incrementally tracked objective.

pub mod delta;

use crate::construction::random_path;
use crate::error::Result;
use crate::instance::Instance;
use crate::solution::Solution;
use delta::{is_degenerate_two_opt, pred, succ};
use rand::Rng;

/// Position marker of nodes outside the tour.
pub const UNSELECTED: usize = usize::MAX;

/// A cyclic range of tour positions: `len` positions starting at `start`,
/// wrapping past the end of the array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub const EMPTY: Span = Span { start: 0, len: 0 };

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The positions of the span in order, for a tour of `tour_len` nodes.
    pub fn positions(&self, tour_len: usize) -> impl Iterator<Item = usize> {
        let start = self.start;
        (0..self.len).map(move |offset| (start + offset) % tour_len)
    }
}

/// The current solution of a run, mutated in place by moves.
#[derive(Debug, Clone)]
pub struct Tour<'a> {
    instance: &'a Instance,
    nodes: Vec<usize>,
    pos: Vec<usize>,
    selected: Vec<bool>,
    objective: i64,
}

impl<'a> Tour<'a> {
    /// Builds a tour from a feasible path.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`](crate::Error::InvalidPath) unless `path` holds
    /// exactly `k` distinct nodes of the instance.
    pub fn from_path(instance: &'a Instance, path: Vec<usize>) -> Result<Self> {
        instance.check_path(&path)?;
        Ok(Self::from_checked_path(instance, path))
    }

    /// A uniformly random selection of `k` nodes in random order.
    pub fn random<R: Rng>(instance: &'a Instance, rng: &mut R) -> Self {
        Self::from_checked_path(instance, random_path(instance, rng))
    }

    pub(crate) fn from_checked_path(instance: &'a Instance, nodes: Vec<usize>) -> Self {
        let mut pos = vec![UNSELECTED; instance.n()];
        let mut selected = vec![false; instance.n()];
        for (i, &v) in nodes.iter().enumerate() {
            pos[v] = i;
            selected[v] = true;
        }
        let objective = instance.objective(&nodes);
        Self {
            instance,
            nodes,
            pos,
            selected,
            objective,
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, i: usize) -> usize {
        self.nodes[i]
    }

    #[inline]
    pub fn position(&self, node: usize) -> Option<usize> {
        match self.pos[node] {
            UNSELECTED => None,
            p => Some(p),
        }
    }

    #[inline]
    pub fn is_selected(&self, node: usize) -> bool {
        self.selected[node]
    }

    #[inline]
    pub fn objective(&self) -> i64 {
        self.objective
    }

    #[inline]
    pub fn next_index(&self, i: usize) -> usize {
        succ(self.nodes.len(), i)
    }

    #[inline]
    pub fn prev_index(&self, i: usize) -> usize {
        pred(self.nodes.len(), i)
    }

    /// Nodes currently outside the tour, in increasing id order.
    pub fn unselected(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter(|&(_, &s)| !s)
            .map(|(v, _)| v)
    }

    #[inline]
    pub fn delta_two_opt(&self, i: usize, j: usize) -> i64 {
        delta::two_opt(self.instance, &self.nodes, i, j)
    }

    #[inline]
    pub fn delta_exchange(&self, i: usize, u: usize) -> i64 {
        delta::exchange(self.instance, &self.nodes, i, u)
    }

    #[inline]
    pub fn delta_swap(&self, i: usize, j: usize) -> i64 {
        delta::swap(self.instance, &self.nodes, i, j)
    }

    /// Replaces edges `(T[i], T[i+1])` and `(T[j], T[j+1])` with
    /// `(T[i], T[j])` and `(T[i+1], T[j+1])`.
    ///
    /// Reverses whichever side of the cycle is shorter and returns the
    /// positions it rewrote; degenerate pairs leave the tour untouched and
    /// return [`Span::EMPTY`].
    pub fn apply_two_opt(&mut self, i: usize, j: usize) -> Span {
        let k = self.nodes.len();
        if k < 4 || is_degenerate_two_opt(k, i, j) {
            return Span::EMPTY;
        }
        let (i, j) = (i.min(j), i.max(j));
        let delta = self.delta_two_opt(i, j);

        let inner = j - i;
        let outer = k - inner;
        let span = if inner <= outer {
            Span {
                start: i + 1,
                len: inner,
            }
        } else {
            Span {
                start: (j + 1) % k,
                len: outer,
            }
        };
        self.reverse(span);
        self.objective += delta;
        span
    }

    /// Puts the unselected node `u` at position `i`, dropping the node that
    /// was there.
    pub fn apply_exchange(&mut self, i: usize, u: usize) {
        debug_assert!(!self.selected[u], "node {u} is already selected");
        if self.selected[u] {
            return;
        }
        let delta = self.delta_exchange(i, u);
        let v = std::mem::replace(&mut self.nodes[i], u);
        self.pos[v] = UNSELECTED;
        self.selected[v] = false;
        self.pos[u] = i;
        self.selected[u] = true;
        self.objective += delta;
    }

    /// Exchanges the nodes at positions `i` and `j`.
    pub fn apply_swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let delta = self.delta_swap(i, j);
        self.nodes.swap(i, j);
        self.pos[self.nodes[i]] = i;
        self.pos[self.nodes[j]] = j;
        self.objective += delta;
    }

    fn reverse(&mut self, span: Span) {
        let k = self.nodes.len();
        let mut left = span.start;
        let mut right = (span.start + span.len - 1) % k;
        for _ in 0..span.len / 2 {
            self.nodes.swap(left, right);
            self.pos[self.nodes[left]] = left;
            self.pos[self.nodes[right]] = right;
            left = succ(k, left);
            right = pred(k, right);
        }
    }

    /// Objective recomputed from the node order alone.
    pub fn recompute_objective(&self) -> i64 {
        self.instance.objective(&self.nodes)
    }

    /// Checks every structural invariant and the tracked objective.
    pub fn is_consistent(&self) -> bool {
        let positions_ok = self
            .nodes
            .iter()
            .enumerate()
            .all(|(i, &v)| self.pos[v] == i && self.selected[v]);
        let mask_ok = (0..self.instance.n())
            .all(|v| self.selected[v] == (self.pos[v] != UNSELECTED));
        let count = self.selected.iter().filter(|&&s| s).count();
        positions_ok
            && mask_ok
            && count == self.nodes.len()
            && self.objective == self.recompute_objective()
    }

    pub fn to_solution(&self) -> Solution {
        Solution {
            path: self.nodes.clone(),
            objective: self.objective,
        }
    }

    pub fn into_solution(self) -> Solution {
        Solution {
            path: self.nodes,
            objective: self.objective,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::{random_instance, rng};
    use proptest::prelude::*;

    #[test]
    fn test_from_path_rejects_infeasible() {
        let instance = random_instance(6, 1);
        assert!(matches!(
            Tour::from_path(&instance, vec![0, 1]),
            Err(Error::InvalidPath(_))
        ));
        assert!(Tour::from_path(&instance, vec![0, 1, 1]).is_err());
        let tour = Tour::from_path(&instance, vec![4, 0, 2]).unwrap();
        assert!(tour.is_consistent());
        assert_eq!(tour.position(2), Some(2));
        assert_eq!(tour.position(1), None);
        assert_eq!(tour.unselected().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_two_opt_reverses_shorter_side() {
        let instance = random_instance(20, 2);
        let path: Vec<usize> = (0..10).collect();
        let mut tour = Tour::from_path(&instance, path).unwrap();

        let span = tour.apply_two_opt(1, 3);
        assert_eq!(span, Span { start: 2, len: 2 });
        assert_eq!(tour.nodes(), &[0, 1, 3, 2, 4, 5, 6, 7, 8, 9]);

        let span = tour.apply_two_opt(0, 8);
        assert_eq!(span, Span { start: 9, len: 2 });
        assert_eq!(tour.nodes(), &[9, 1, 3, 2, 4, 5, 6, 7, 8, 0]);
        assert!(tour.is_consistent());
    }

    #[test]
    fn test_degenerate_two_opt_is_noop() {
        let instance = random_instance(8, 3);
        let mut tour = Tour::from_path(&instance, vec![0, 1, 2, 3]).unwrap();
        assert!(tour.apply_two_opt(1, 2).is_empty());
        assert!(tour.apply_two_opt(3, 0).is_empty());
        assert_eq!(tour.nodes(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_exchange_updates_mask_and_positions() {
        let instance = random_instance(6, 4);
        let mut tour = Tour::from_path(&instance, vec![0, 1, 2]).unwrap();
        tour.apply_exchange(1, 5);
        assert_eq!(tour.nodes(), &[0, 5, 2]);
        assert!(!tour.is_selected(1));
        assert!(tour.is_selected(5));
        assert_eq!(tour.position(5), Some(1));
        assert!(tour.is_consistent());
    }

    #[test]
    fn test_into_solution_keeps_objective() {
        let instance = random_instance(9, 5);
        let tour = Tour::random(&instance, &mut rng(5));
        let expected = tour.recompute_objective();
        let solution = tour.into_solution();
        assert_eq!(solution.objective, expected);
        assert!(instance.check_path(&solution.path).is_ok());
    }

    #[derive(Debug, Clone)]
    enum Op {
        TwoOpt(usize, usize),
        Exchange(usize, usize),
        Swap(usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..64, 0usize..64).prop_map(|(a, b)| Op::TwoOpt(a, b)),
            (0usize..64, 0usize..64).prop_map(|(a, b)| Op::Exchange(a, b)),
            (0usize..64, 0usize..64).prop_map(|(a, b)| Op::Swap(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn prop_moves_preserve_invariants(
            seed in 0u64..1000,
            n in 1usize..30,
            ops in prop::collection::vec(op(), 0..40),
        ) {
            let instance = random_instance(n, seed);
            let mut tour = Tour::random(&instance, &mut rng(seed));
            for op in ops {
                let k = tour.len();
                match op {
                    Op::TwoOpt(a, b) => {
                        tour.apply_two_opt(a % k, b % k);
                    }
                    Op::Exchange(a, b) => {
                        let outside: Vec<usize> = tour.unselected().collect();
                        if !outside.is_empty() {
                            tour.apply_exchange(a % k, outside[b % outside.len()]);
                        }
                    }
                    Op::Swap(a, b) => tour.apply_swap(a % k, b % k),
                }
                prop_assert!(tour.is_consistent());
                prop_assert_eq!(tour.len(), instance.k());
            }
        }
    }
}

//! Move enumeration for the full and the candidate-restricted
//! neighbourhoods.
//!
//! Every generator is local to one tour position or one node, so the same
//! code serves whole-tour scans, randomized first-improvement scans and
//! the move cache's regeneration after a change.
//!
//! Candidate restriction keeps a 2-opt cutting after positions `p` and `q`
//! when `{T[p], T[q]}` or `{T[p+1], T[q+1]}` is a candidate edge, and an
//! exchange of node `u` into position `p` when `{T[p-1], u}` or
//! `{u, T[p+1]}` is one. With every edge a candidate both neighbourhoods
//! coincide.

use super::moves::Move;
use crate::candidates::CandidateSet;
use crate::tour::delta::is_degenerate_two_opt;
use crate::tour::Tour;

/// Visit stamps for deduplicating nodes reached through two candidate
/// lists, reset in O(1) by bumping the epoch.
#[derive(Debug, Clone)]
pub(crate) struct Marks {
    stamps: Vec<u32>,
    epoch: u32,
}

impl Marks {
    pub fn new(n: usize) -> Self {
        Self {
            stamps: vec![0; n],
            epoch: 0,
        }
    }

    pub fn next_epoch(&mut self) {
        if self.epoch == u32::MAX {
            self.stamps.iter_mut().for_each(|s| *s = 0);
            self.epoch = 0;
        }
        self.epoch += 1;
    }

    /// Marks `v`; `true` the first time `v` is seen in this epoch.
    #[inline]
    pub fn mark(&mut self, v: usize) -> bool {
        if self.stamps[v] == self.epoch {
            false
        } else {
            self.stamps[v] = self.epoch;
            true
        }
    }
}

/// The neighbourhood a search runs in: everything, or only moves that
/// introduce a candidate edge.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Neighborhood<'c> {
    candidates: Option<&'c CandidateSet>,
}

impl<'c> Neighborhood<'c> {
    pub fn full() -> Self {
        Self { candidates: None }
    }

    pub fn restricted(candidates: &'c CandidateSet) -> Self {
        Self {
            candidates: Some(candidates),
        }
    }

    /// Every 2-opt cutting after position `p`. The same move is also
    /// produced from its other cut position.
    pub fn two_opt_at(&self, tour: &Tour<'_>, p: usize, visit: &mut impl FnMut(Move)) {
        let k = tour.len();
        if k < 4 {
            return;
        }
        let mut emit = |q: usize| {
            if !is_degenerate_two_opt(k, p, q) {
                visit(Move::TwoOpt { i: p, j: q });
            }
        };
        match self.candidates {
            None => (0..k).for_each(&mut emit),
            Some(candidates) => {
                for &y in candidates.adjacent(tour.node(p)) {
                    if let Some(q) = tour.position(y) {
                        emit(q);
                    }
                }
                for &y in candidates.adjacent(tour.node(tour.next_index(p))) {
                    if let Some(q) = tour.position(y) {
                        emit(tour.prev_index(q));
                    }
                }
            }
        }
    }

    /// Every 2-opt of the tour, each once.
    pub fn all_two_opts(&self, tour: &Tour<'_>, visit: &mut impl FnMut(Move)) {
        for p in 0..tour.len() {
            self.two_opt_at(tour, p, &mut |mv| {
                if let Move::TwoOpt { i, j } = mv {
                    if j > i {
                        visit(mv);
                    }
                }
            });
        }
    }

    /// Every exchange into position `p`.
    pub fn exchanges_at(
        &self,
        tour: &Tour<'_>,
        p: usize,
        marks: &mut Marks,
        visit: &mut impl FnMut(Move),
    ) {
        match self.candidates {
            Some(candidates) if tour.len() > 1 => {
                let a = tour.node(tour.prev_index(p));
                let b = tour.node(tour.next_index(p));
                marks.next_epoch();
                for &u in candidates.adjacent(a).iter().chain(candidates.adjacent(b)) {
                    if !tour.is_selected(u) && marks.mark(u) {
                        visit(Move::Exchange {
                            position: p,
                            node: u,
                        });
                    }
                }
            }
            _ => {
                for u in tour.unselected() {
                    visit(Move::Exchange {
                        position: p,
                        node: u,
                    });
                }
            }
        }
    }

    /// Every exchange of the tour.
    pub fn all_exchanges(&self, tour: &Tour<'_>, marks: &mut Marks, visit: &mut impl FnMut(Move)) {
        for p in 0..tour.len() {
            self.exchanges_at(tour, p, marks, visit);
        }
    }

    /// Every exchange that brings the unselected node `u` into the tour.
    /// May produce a position twice.
    pub fn exchanges_of(&self, tour: &Tour<'_>, u: usize, visit: &mut impl FnMut(Move)) {
        match self.candidates {
            Some(candidates) if tour.len() > 1 => {
                for &y in candidates.adjacent(u) {
                    if let Some(q) = tour.position(y) {
                        visit(Move::Exchange {
                            position: tour.next_index(q),
                            node: u,
                        });
                        visit(Move::Exchange {
                            position: tour.prev_index(q),
                            node: u,
                        });
                    }
                }
            }
            _ => {
                for p in 0..tour.len() {
                    visit(Move::Exchange {
                        position: p,
                        node: u,
                    });
                }
            }
        }
    }

    /// Every swap of position `p` with another position.
    pub fn swaps_at(&self, tour: &Tour<'_>, p: usize, visit: &mut impl FnMut(Move)) {
        if tour.len() < 3 {
            return;
        }
        for q in (0..tour.len()).filter(|&q| q != p) {
            visit(Move::Swap { i: p, j: q });
        }
    }

    /// Every swap of the tour, each once.
    pub fn all_swaps(&self, tour: &Tour<'_>, visit: &mut impl FnMut(Move)) {
        let k = tour.len();
        if k < 3 {
            return;
        }
        for i in 0..k {
            for j in i + 1..k {
                visit(Move::Swap { i, j });
            }
        }
    }
}

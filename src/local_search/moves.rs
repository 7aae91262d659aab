//! Move descriptions, their position-independent identities and the
//! records kept in the move cache.

use crate::tour::{Span, Tour};

/// A move addressed by tour positions. Only meaningful for the tour state
/// it was enumerated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Cut after positions `i` and `j` and reconnect crosswise.
    TwoOpt { i: usize, j: usize },
    /// Replace the node at `position` with the unselected `node`.
    Exchange { position: usize, node: usize },
    /// Exchange the nodes at positions `i` and `j`.
    Swap { i: usize, j: usize },
}

impl Move {
    #[inline]
    pub fn delta(&self, tour: &Tour<'_>) -> i64 {
        match *self {
            Move::TwoOpt { i, j } => tour.delta_two_opt(i, j),
            Move::Exchange { position, node } => tour.delta_exchange(position, node),
            Move::Swap { i, j } => tour.delta_swap(i, j),
        }
    }

    /// Applies the move and returns the contiguous run of positions whose
    /// node changed. A swap rewrites two positions that are not contiguous in
    /// general and reports [`Span::EMPTY`]; swaps never reach the move cache.
    pub fn apply(&self, tour: &mut Tour<'_>) -> Span {
        match *self {
            Move::TwoOpt { i, j } => tour.apply_two_opt(i, j),
            Move::Exchange { position, node } => {
                tour.apply_exchange(position, node);
                Span {
                    start: position,
                    len: 1,
                }
            }
            Move::Swap { i, j } => {
                tour.apply_swap(i, j);
                Span::EMPTY
            }
        }
    }

    /// The identity of this move in the current tour.
    pub fn key(&self, tour: &Tour<'_>) -> MoveKey {
        match *self {
            Move::TwoOpt { i, j } => two_opt_key(
                tour.node(i),
                tour.node(tour.next_index(i)),
                tour.node(j),
                tour.node(tour.next_index(j)),
            ),
            Move::Exchange { position, node } => exchange_key(
                tour.node(tour.prev_index(position)),
                tour.node(position),
                tour.node(tour.next_index(position)),
                node,
            ),
            Move::Swap { i, j } => MoveKey::Swap {
                nodes: Edge::new(tour.node(i), tour.node(j)),
            },
        }
    }
}

/// An undirected node pair with its endpoints in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }
}

#[inline]
fn sorted(a: Edge, b: Edge) -> [Edge; 2] {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}

/// Position-independent identity of a move.
///
/// A key names the edges a move removes and the edges (or neighbours) it
/// creates, so two moves with equal keys always have equal deltas. The
/// derived order is the tie-break between equally good moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveKey {
    TwoOpt {
        removed: [Edge; 2],
        added: [Edge; 2],
    },
    Exchange {
        removed: usize,
        inserted: usize,
        neighbors: Edge,
    },
    Swap {
        nodes: Edge,
    },
}

/// Key of the 2-opt removing `a -> b` and `c -> d` and adding `{a, c}` and
/// `{b, d}`.
#[inline]
fn two_opt_key(a: usize, b: usize, c: usize, d: usize) -> MoveKey {
    MoveKey::TwoOpt {
        removed: sorted(Edge::new(a, b), Edge::new(c, d)),
        added: sorted(Edge::new(a, c), Edge::new(b, d)),
    }
}

#[inline]
fn exchange_key(prev: usize, removed: usize, next: usize, inserted: usize) -> MoveKey {
    MoveKey::Exchange {
        removed,
        inserted,
        neighbors: Edge::new(prev, next),
    }
}

/// An improving move remembered by node identity, so that it survives
/// changes elsewhere in the tour.
///
/// 2-opt records keep both removed edges in the direction they were
/// traversed when recorded; the move is only the same move again while
/// the tour traverses both edges in the same relative direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRecord {
    TwoOpt {
        first: (usize, usize),
        second: (usize, usize),
        delta: i64,
    },
    Exchange {
        prev: usize,
        removed: usize,
        next: usize,
        inserted: usize,
        delta: i64,
    },
}

/// Where a recorded edge sits in the current tour.
struct EdgeAt {
    /// Position of the edge's first node in traversal order.
    cut: usize,
    /// Whether the tour traverses the edge in its recorded direction.
    forward: bool,
}

fn locate_edge(tour: &Tour<'_>, from: usize, to: usize) -> Option<EdgeAt> {
    let p = tour.position(from)?;
    let q = tour.position(to)?;
    if tour.next_index(p) == q {
        Some(EdgeAt {
            cut: p,
            forward: true,
        })
    } else if tour.next_index(q) == p {
        Some(EdgeAt {
            cut: q,
            forward: false,
        })
    } else {
        None
    }
}

impl MoveRecord {
    /// Records `mv` as found in `tour`. Swaps are never cached.
    pub fn capture(tour: &Tour<'_>, mv: Move, delta: i64) -> Option<Self> {
        match mv {
            Move::TwoOpt { i, j } => Some(MoveRecord::TwoOpt {
                first: (tour.node(i), tour.node(tour.next_index(i))),
                second: (tour.node(j), tour.node(tour.next_index(j))),
                delta,
            }),
            Move::Exchange { position, node } => Some(MoveRecord::Exchange {
                prev: tour.node(tour.prev_index(position)),
                removed: tour.node(position),
                next: tour.node(tour.next_index(position)),
                inserted: node,
                delta,
            }),
            Move::Swap { .. } => None,
        }
    }

    #[inline]
    pub fn delta(&self) -> i64 {
        match *self {
            MoveRecord::TwoOpt { delta, .. } | MoveRecord::Exchange { delta, .. } => delta,
        }
    }

    pub fn key(&self) -> MoveKey {
        match *self {
            MoveRecord::TwoOpt {
                first: (a, b),
                second: (c, d),
                ..
            } => two_opt_key(a, b, c, d),
            MoveRecord::Exchange {
                prev,
                removed,
                next,
                inserted,
                ..
            } => exchange_key(prev, removed, next, inserted),
        }
    }

    /// Maps the record back onto `tour`, or `None` when it no longer
    /// describes an applicable move with the recorded delta.
    ///
    /// A 2-opt is stale once either edge is gone or the two edges are
    /// traversed in different relative directions. An exchange is stale
    /// once the removed node left the tour, the inserted node joined it, or
    /// the removed node's neighbours changed.
    pub fn revalidate(&self, tour: &Tour<'_>) -> Option<Move> {
        match *self {
            MoveRecord::TwoOpt {
                first: (a, b),
                second: (c, d),
                ..
            } => {
                let e1 = locate_edge(tour, a, b)?;
                let e2 = locate_edge(tour, c, d)?;
                (e1.forward == e2.forward).then_some(Move::TwoOpt {
                    i: e1.cut,
                    j: e2.cut,
                })
            }
            MoveRecord::Exchange {
                prev,
                removed,
                next,
                inserted,
                ..
            } => {
                let p = tour.position(removed)?;
                if tour.is_selected(inserted) {
                    return None;
                }
                let around = Edge::new(
                    tour.node(tour.prev_index(p)),
                    tour.node(tour.next_index(p)),
                );
                (around == Edge::new(prev, next)).then_some(Move::Exchange {
                    position: p,
                    node: inserted,
                })
            }
        }
    }
}

/// Keeps the best improving move seen so far, ordered by `(delta, key)`.
#[derive(Debug, Default)]
pub(crate) struct BestMove {
    best: Option<(i64, MoveKey, Move)>,
}

impl BestMove {
    #[inline]
    pub fn offer(&mut self, tour: &Tour<'_>, mv: Move, delta: i64) {
        if delta >= 0 {
            return;
        }
        if let Some((d, _, _)) = self.best {
            if delta > d {
                return;
            }
        }
        let key = mv.key(tour);
        if let Some((d, k, _)) = self.best {
            if delta == d && key >= k {
                return;
            }
        }
        self.best = Some((delta, key, mv));
    }

    pub fn into_move(self) -> Option<(i64, Move)> {
        self.best.map(|(delta, _, mv)| (delta, mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::random_instance;

    #[test]
    fn test_two_opt_key_ignores_argument_order() {
        let instance = random_instance(16, 1);
        let tour = Tour::from_path(&instance, (0..8).collect()).unwrap();
        let a = Move::TwoOpt { i: 1, j: 5 }.key(&tour);
        let b = Move::TwoOpt { i: 5, j: 1 }.key(&tour);
        assert_eq!(a, b);
        assert_ne!(a, Move::TwoOpt { i: 1, j: 6 }.key(&tour));
    }

    #[test]
    fn test_record_survives_reversal_elsewhere() {
        let instance = random_instance(20, 2);
        let mut tour = Tour::from_path(&instance, (0..10).collect()).unwrap();
        let mv = Move::TwoOpt { i: 0, j: 4 };
        let record = MoveRecord::capture(&tour, mv, mv.delta(&tour)).unwrap();

        // Reversing positions 6..=8 leaves both edges (0,1) and (4,5) intact.
        tour.apply_two_opt(5, 8);
        let again = record.revalidate(&tour).unwrap();
        assert_eq!(again.key(&tour), record.key());
        assert_eq!(again.delta(&tour), record.delta());
    }

    #[test]
    fn test_record_stale_after_direction_flip() {
        let instance = random_instance(20, 3);
        let mut tour = Tour::from_path(&instance, (0..10).collect()).unwrap();
        let mv = Move::TwoOpt { i: 1, j: 6 };
        let record = MoveRecord::capture(&tour, mv, mv.delta(&tour)).unwrap();

        // Reverses positions 3..=7: (1,2) keeps its direction, (6,7) flips.
        tour.apply_two_opt(2, 7);
        assert!(record.revalidate(&tour).is_none());
    }

    #[test]
    fn test_record_stale_when_only_one_edge_flips() {
        let instance = random_instance(24, 4);
        let mut tour = Tour::from_path(&instance, (0..12).collect()).unwrap();
        let mv = Move::TwoOpt { i: 1, j: 8 };
        let record = MoveRecord::capture(&tour, mv, mv.delta(&tour)).unwrap();

        // Reverses positions 1..=4: edge (1,2) survives but is now walked 2 -> 1,
        // while (8,9) keeps its direction.
        tour.apply_two_opt(0, 4);
        assert!(tour.nodes()[..5] == [0, 4, 3, 2, 1]);
        assert!(record.revalidate(&tour).is_none());
    }

    #[test]
    fn test_record_valid_when_both_edges_flip() {
        let instance = random_instance(24, 5);
        let mut tour = Tour::from_path(&instance, (0..12).collect()).unwrap();
        let mv = Move::TwoOpt { i: 2, j: 4 };
        let record = MoveRecord::capture(&tour, mv, mv.delta(&tour)).unwrap();

        // Reverses positions 1..=6 so both (2,3) and (4,5) are walked backwards.
        tour.apply_two_opt(0, 6);
        let again = record.revalidate(&tour).unwrap();
        assert_eq!(again.key(&tour), record.key());
        assert_eq!(again.delta(&tour), record.delta());
    }

    #[test]
    fn test_exchange_record_staleness() {
        let instance = random_instance(12, 6);
        let mut tour = Tour::from_path(&instance, vec![0, 1, 2, 3, 4, 5]).unwrap();
        let mv = Move::Exchange {
            position: 2,
            node: 9,
        };
        let record = MoveRecord::capture(&tour, mv, mv.delta(&tour)).unwrap();
        assert_eq!(record.revalidate(&tour), Some(mv));

        tour.apply_exchange(4, 9);
        assert!(record.revalidate(&tour).is_none());
        tour.apply_exchange(4, 10);
        assert_eq!(record.revalidate(&tour), Some(mv));
        tour.apply_exchange(3, 11);
        assert!(record.revalidate(&tour).is_none());
    }

    #[test]
    fn test_apply_reports_changed_positions() {
        let instance = random_instance(12, 8);
        let mut tour = Tour::from_path(&instance, vec![0, 1, 2, 3, 4, 5]).unwrap();

        let span = Move::TwoOpt { i: 0, j: 2 }.apply(&mut tour);
        assert_eq!(span, Span { start: 1, len: 2 });
        assert_eq!(tour.nodes(), &[0, 2, 1, 3, 4, 5]);

        let exchange = Move::Exchange {
            position: 3,
            node: 7,
        };
        let span = exchange.apply(&mut tour);
        assert_eq!(span, Span { start: 3, len: 1 });
        assert_eq!(tour.nodes(), &[0, 2, 1, 7, 4, 5]);

        let span = Move::Swap { i: 1, j: 4 }.apply(&mut tour);
        assert_eq!(span, Span::EMPTY);
        assert_eq!(tour.nodes(), &[0, 4, 1, 7, 2, 5]);
        assert!(tour.is_consistent());
    }

    #[test]
    fn test_best_move_breaks_ties_by_key() {
        let instance = random_instance(12, 7);
        let tour = Tour::from_path(&instance, vec![0, 1, 2, 3, 4, 5]).unwrap();
        let low = Move::Exchange {
            position: 0,
            node: 6,
        };
        let high = Move::Exchange {
            position: 5,
            node: 6,
        };
        let (first, second) = if low.key(&tour) < high.key(&tour) {
            (low, high)
        } else {
            (high, low)
        };

        let mut best = BestMove::default();
        best.offer(&tour, second, -5);
        best.offer(&tour, first, -5);
        best.offer(&tour, second, -5);
        assert_eq!(best.into_move(), Some((-5, first)));

        let mut best = BestMove::default();
        best.offer(&tour, first, -5);
        best.offer(&tour, second, -6);
        best.offer(&tour, first, 0);
        assert_eq!(best.into_move(), Some((-6, second)));
    }
}

//! Local search execution engine.
//!
//! # Algorithm
//!
//! 1. Scan the neighbourhood of the current tour (2-opt or swap moves
//!    inside the tour, exchanges with unselected nodes)
//! 2. Steepest: apply the best improving move. Greedy: apply the first
//!    improving move of a randomized scan
//! 3. Repeat until no improving move exists
//!
//! Every accepted move lowers the integer objective, so the loop always
//! terminates.

use super::cache::MoveCache;
use super::config::{Discipline, IntraMove, LocalSearchConfig};
use super::moves::{BestMove, Move, MoveRecord};
use super::neighborhood::{Marks, Neighborhood};
use crate::candidates::CandidateSet;
use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::solution::Solution;
use crate::tour::{Span, Tour};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

/// Counters of one [`LocalSearch::improve`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalSearchStats {
    /// Improving moves applied.
    pub moves_applied: usize,
    /// Move deltas evaluated.
    pub evaluations: usize,
    /// Largest size the move cache reached (0 without a cache).
    pub peak_cache_size: usize,
}

/// A configured local search bound to one instance.
///
/// The candidate set, when the neighbourhood needs one, is built once here
/// and reused by every call, so drivers create one `LocalSearch` per run.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::local_search::{LocalSearch, LocalSearchConfig};
/// use u_selective_tsp::{Instance, Tour};
/// use rand::SeedableRng;
///
/// let points: Vec<(i64, i64)> = (0..12).map(|i| (i * 7 % 13, i * 5 % 11)).collect();
/// let instance = Instance::from_coordinates(&points, vec![1; 12]).unwrap();
/// let search = LocalSearch::new(&instance, LocalSearchConfig::default()).unwrap();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let mut tour = Tour::random(&instance, &mut rng);
/// let start = tour.objective();
/// search.improve(&mut tour, &mut rng);
/// assert!(tour.objective() <= start);
/// ```
#[derive(Debug, Clone)]
pub struct LocalSearch<'a> {
    instance: &'a Instance,
    config: LocalSearchConfig,
    candidates: Option<CandidateSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Intra,
    Inter,
}

/// Buffers reused across iterations of one `improve` call.
struct Scratch {
    marks: Marks,
    order: Vec<usize>,
    moves: Vec<Move>,
}

impl Scratch {
    fn new(n: usize) -> Self {
        Self {
            marks: Marks::new(n),
            order: Vec::new(),
            moves: Vec::new(),
        }
    }
}

fn offer_to_cache(cache: &mut MoveCache, tour: &Tour<'_>, mv: Move, evaluations: &mut usize) {
    *evaluations += 1;
    let delta = mv.delta(tour);
    if delta < 0 {
        if let Some(record) = MoveRecord::capture(tour, mv, delta) {
            cache.add(record);
        }
    }
}

impl<'a> LocalSearch<'a> {
    /// Validates `config` and prepares the neighbourhood.
    pub fn new(instance: &'a Instance, config: LocalSearchConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidConfig)?;
        let candidates = config
            .neighborhood
            .uses_candidates()
            .then(|| CandidateSet::build(instance, config.candidate_count));
        Ok(Self {
            instance,
            config,
            candidates,
        })
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    pub fn candidates(&self) -> Option<&CandidateSet> {
        self.candidates.as_ref()
    }

    fn neighborhood(&self) -> Neighborhood<'_> {
        match &self.candidates {
            Some(candidates) => Neighborhood::restricted(candidates),
            None => Neighborhood::full(),
        }
    }

    /// Runs local search from `path` and returns the local optimum.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] when `path` is not a feasible tour.
    pub fn optimize<R: Rng>(&self, path: Vec<usize>, rng: &mut R) -> Result<Solution> {
        let mut tour = Tour::from_path(self.instance, path)?;
        self.improve(&mut tour, rng);
        Ok(tour.into_solution())
    }

    /// Like [`optimize`](Self::optimize) for paths built inside the crate,
    /// which are feasible by construction.
    pub(crate) fn optimize_path<R: Rng>(&self, path: Vec<usize>, rng: &mut R) -> Solution {
        debug_assert!(self.instance.check_path(&path).is_ok());
        let mut tour = Tour::from_checked_path(self.instance, path);
        self.improve(&mut tour, rng);
        tour.into_solution()
    }

    /// Improves `tour` in place until it is a local optimum of the
    /// configured neighbourhood.
    pub fn improve<R: Rng>(&self, tour: &mut Tour<'_>, rng: &mut R) -> LocalSearchStats {
        debug_assert!(std::ptr::eq(tour.instance(), self.instance));
        let mut stats = LocalSearchStats::default();
        if tour.is_empty() {
            return stats;
        }
        let mut scratch = Scratch::new(self.instance.n());
        match (self.config.discipline, self.config.neighborhood.uses_cache()) {
            (Discipline::Steepest, false) => self.steepest(tour, &mut scratch, &mut stats),
            (Discipline::Steepest, true) => self.steepest_cached(tour, &mut scratch, &mut stats),
            (Discipline::Greedy, _) => self.greedy(tour, rng, &mut scratch, &mut stats),
        }
        debug_assert_eq!(tour.objective(), tour.recompute_objective());
        stats
    }

    fn steepest(&self, tour: &mut Tour<'_>, scratch: &mut Scratch, stats: &mut LocalSearchStats) {
        let nb = self.neighborhood();
        loop {
            let mut best = BestMove::default();
            {
                let view = &*tour;
                let mut offer = |mv: Move| {
                    stats.evaluations += 1;
                    best.offer(view, mv, mv.delta(view));
                };
                match self.config.intra_move {
                    IntraMove::TwoOpt => nb.all_two_opts(view, &mut offer),
                    IntraMove::Swap => nb.all_swaps(view, &mut offer),
                }
                nb.all_exchanges(view, &mut scratch.marks, &mut offer);
            }
            let Some((delta, mv)) = best.into_move() else {
                break;
            };
            mv.apply(tour);
            stats.moves_applied += 1;
            trace!(?mv, delta, objective = tour.objective(), "steepest move");
        }
    }

    fn steepest_cached(
        &self,
        tour: &mut Tour<'_>,
        scratch: &mut Scratch,
        stats: &mut LocalSearchStats,
    ) {
        let nb = self.neighborhood();
        let mut cache = MoveCache::new();
        {
            let view = &*tour;
            let evaluations = &mut stats.evaluations;
            let mut record = |mv: Move| offer_to_cache(&mut cache, view, mv, evaluations);
            nb.all_two_opts(view, &mut record);
            nb.all_exchanges(view, &mut scratch.marks, &mut record);
        }
        debug!(size = cache.len(), "move cache initialized");
        stats.peak_cache_size = cache.len();

        while let Some((cached, mv)) = cache.take_best(tour) {
            debug_assert_eq!(
                cached.delta(),
                mv.delta(tour),
                "cached delta out of date for {cached:?}"
            );
            let removed = match mv {
                Move::Exchange { position, .. } => Some(tour.node(position)),
                _ => None,
            };
            let span = mv.apply(tour);
            stats.moves_applied += 1;
            trace!(?mv, delta = cached.delta(), objective = tour.objective(), "cached move");

            let view = &*tour;
            let evaluations = &mut stats.evaluations;
            let mut record = |mv: Move| offer_to_cache(&mut cache, view, mv, evaluations);
            match (mv, removed) {
                (Move::Exchange { position, .. }, Some(removed)) => {
                    Self::regenerate_after_exchange(
                        nb,
                        view,
                        position,
                        removed,
                        &mut scratch.marks,
                        &mut record,
                    );
                }
                _ => Self::regenerate_after_reversal(
                    nb,
                    view,
                    span,
                    &mut scratch.marks,
                    &mut record,
                ),
            }
            stats.peak_cache_size = stats.peak_cache_size.max(cache.len());
        }
    }

    /// Re-enumerates every move whose edges or neighbours changed when the
    /// positions of `span` were reversed.
    fn regenerate_after_reversal(
        nb: Neighborhood<'_>,
        tour: &Tour<'_>,
        span: Span,
        marks: &mut Marks,
        offer: &mut impl FnMut(Move),
    ) {
        if span.is_empty() {
            return;
        }
        let k = tour.len();
        let before = tour.prev_index(span.start);
        for offset in 0..=span.len {
            nb.two_opt_at(tour, (before + offset) % k, offer);
        }
        let last = (span.start + span.len - 1) % k;
        let mut ends = vec![before, span.start, last, tour.next_index(last)];
        ends.sort_unstable();
        ends.dedup();
        for p in ends {
            nb.exchanges_at(tour, p, marks, offer);
        }
    }

    /// Re-enumerates every move touching position `p`, where `removed` was
    /// just replaced, plus every way of bringing `removed` back.
    fn regenerate_after_exchange(
        nb: Neighborhood<'_>,
        tour: &Tour<'_>,
        p: usize,
        removed: usize,
        marks: &mut Marks,
        offer: &mut impl FnMut(Move),
    ) {
        let before = tour.prev_index(p);
        nb.two_opt_at(tour, before, offer);
        nb.two_opt_at(tour, p, offer);
        let mut around = vec![before, p, tour.next_index(p)];
        around.sort_unstable();
        around.dedup();
        for q in around {
            nb.exchanges_at(tour, q, marks, offer);
        }
        nb.exchanges_of(tour, removed, offer);
    }

    fn greedy<R: Rng>(
        &self,
        tour: &mut Tour<'_>,
        rng: &mut R,
        scratch: &mut Scratch,
        stats: &mut LocalSearchStats,
    ) {
        let nb = self.neighborhood();
        loop {
            let order = if rng.random_bool(self.config.inter_first_probability) {
                [Family::Inter, Family::Intra]
            } else {
                [Family::Intra, Family::Inter]
            };
            let found = order
                .into_iter()
                .find_map(|family| self.first_improving(nb, tour, family, rng, scratch, stats));
            let Some(mv) = found else {
                break;
            };
            mv.apply(tour);
            stats.moves_applied += 1;
            trace!(?mv, objective = tour.objective(), "greedy move");
        }
    }

    /// Scans the positions in random order, and the moves at each position
    /// in random order, returning the first improving move.
    fn first_improving<R: Rng>(
        &self,
        nb: Neighborhood<'_>,
        tour: &Tour<'_>,
        family: Family,
        rng: &mut R,
        scratch: &mut Scratch,
        stats: &mut LocalSearchStats,
    ) -> Option<Move> {
        let Scratch {
            marks,
            order,
            moves,
        } = scratch;
        order.clear();
        order.extend(0..tour.len());
        order.shuffle(rng);

        for &p in order.iter() {
            moves.clear();
            let mut push = |mv: Move| moves.push(mv);
            match (family, self.config.intra_move) {
                (Family::Intra, IntraMove::TwoOpt) => nb.two_opt_at(tour, p, &mut push),
                (Family::Intra, IntraMove::Swap) => nb.swaps_at(tour, p, &mut push),
                (Family::Inter, _) => nb.exchanges_at(tour, p, marks, &mut push),
            }
            moves.shuffle(rng);
            for &mv in moves.iter() {
                stats.evaluations += 1;
                if mv.delta(tour) < 0 {
                    return Some(mv);
                }
            }
        }
        None
    }
}

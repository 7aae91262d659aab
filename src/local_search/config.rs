//! Local search configuration.

use crate::candidates::DEFAULT_CANDIDATE_COUNT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How an improving move is picked each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Discipline {
    /// Scan the whole neighbourhood and apply the best move.
    #[default]
    Steepest,
    /// Scan in random order and apply the first improving move.
    Greedy,
}

/// Which moves are examined and how they are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeighborhoodKind {
    /// Every 2-opt pair and every exchange.
    Full,
    /// Only moves introducing a candidate edge.
    #[default]
    Candidates,
    /// The full neighbourhood served from the move cache.
    CachedFull,
    /// The candidate neighbourhood served from the move cache.
    CachedCandidates,
}

impl NeighborhoodKind {
    pub fn uses_candidates(self) -> bool {
        matches!(self, Self::Candidates | Self::CachedCandidates)
    }

    pub fn uses_cache(self) -> bool {
        matches!(self, Self::CachedFull | Self::CachedCandidates)
    }
}

/// The move family that reorders the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntraMove {
    /// Segment reversal.
    #[default]
    TwoOpt,
    /// Exchange of two tour positions.
    Swap,
}

/// Configuration of the local search engine.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::local_search::{Discipline, LocalSearchConfig, NeighborhoodKind};
///
/// let config = LocalSearchConfig::default()
///     .with_neighborhood(NeighborhoodKind::CachedCandidates)
///     .with_candidate_count(8);
/// assert_eq!(config.discipline, Discipline::Steepest);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalSearchConfig {
    pub discipline: Discipline,
    pub neighborhood: NeighborhoodKind,
    pub intra_move: IntraMove,
    /// Neighbours kept per node when the neighbourhood is candidate-based.
    pub candidate_count: usize,
    /// Probability that a greedy iteration tries exchanges before
    /// intra-route moves.
    pub inter_first_probability: f64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            discipline: Discipline::Steepest,
            neighborhood: NeighborhoodKind::Candidates,
            intra_move: IntraMove::TwoOpt,
            candidate_count: DEFAULT_CANDIDATE_COUNT,
            inter_first_probability: 0.5,
        }
    }
}

impl LocalSearchConfig {
    pub fn with_discipline(mut self, discipline: Discipline) -> Self {
        self.discipline = discipline;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: NeighborhoodKind) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_intra_move(mut self, intra_move: IntraMove) -> Self {
        self.intra_move = intra_move;
        self
    }

    pub fn with_candidate_count(mut self, count: usize) -> Self {
        self.candidate_count = count;
        self
    }

    pub fn with_inter_first_probability(mut self, p: f64) -> Self {
        self.inter_first_probability = p;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.neighborhood.uses_candidates() && self.candidate_count == 0 {
            return Err("candidate_count must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.inter_first_probability) {
            return Err(format!(
                "inter_first_probability must be in [0, 1], got {}",
                self.inter_first_probability
            ));
        }
        if self.discipline == Discipline::Greedy && self.neighborhood.uses_cache() {
            return Err("the move cache only supports the steepest discipline".into());
        }
        if self.intra_move == IntraMove::Swap && self.neighborhood != NeighborhoodKind::Full {
            return Err("swap moves are only available with the full neighborhood".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LocalSearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_greedy_with_cache() {
        let config = LocalSearchConfig::default()
            .with_discipline(Discipline::Greedy)
            .with_neighborhood(NeighborhoodKind::CachedFull);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_swap_outside_full() {
        let config = LocalSearchConfig::default().with_intra_move(IntraMove::Swap);
        assert!(config.validate().is_err());
        assert!(config
            .with_neighborhood(NeighborhoodKind::Full)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_rejects_bad_probability_and_zero_candidates() {
        assert!(LocalSearchConfig::default()
            .with_inter_first_probability(1.5)
            .validate()
            .is_err());
        assert!(LocalSearchConfig::default()
            .with_candidate_count(0)
            .validate()
            .is_err());
        assert!(LocalSearchConfig::default()
            .with_candidate_count(0)
            .with_neighborhood(NeighborhoodKind::Full)
            .validate()
            .is_ok());
    }
}

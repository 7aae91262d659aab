//! Variable Neighborhood Search configuration.

use crate::budget::validate_budget;
use crate::construction::StartStrategy;
use crate::local_search::LocalSearchConfig;
use crate::perturbation::{destroy_repair, double_bridge, random_exchanges, random_two_opts};
use crate::tour::Tour;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shaking neighbourhood, in order of increasing disruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShakeOperator {
    /// `intensity` random exchanges with unselected nodes.
    NodeExchange,
    /// `intensity` random 2-opt moves, at most `k / 2`.
    TwoOpt,
    /// Remove 20-30% of the tour and repair by cheapest insertion.
    DestroyRepair,
    /// Segment reconnection; falls back to random 2-opts on short tours.
    DoubleBridge,
}

impl ShakeOperator {
    pub const ALL: [ShakeOperator; 4] = [
        ShakeOperator::NodeExchange,
        ShakeOperator::TwoOpt,
        ShakeOperator::DestroyRepair,
        ShakeOperator::DoubleBridge,
    ];

    /// Operator of the zero-based neighbourhood `index`; indices past the
    /// last operator wrap around.
    pub fn of_index(index: usize) -> ShakeOperator {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Shakes `tour` in place.
    pub fn apply<R: Rng>(self, tour: &mut Tour<'_>, intensity: usize, rng: &mut R) {
        let k = tour.len();
        match self {
            ShakeOperator::NodeExchange => {
                let pool = tour.instance().n() - k;
                random_exchanges(tour, intensity.min(k).min(pool), rng);
            }
            ShakeOperator::TwoOpt => {
                random_two_opts(tour, intensity.min(k / 2), rng);
            }
            ShakeOperator::DestroyRepair => {
                destroy_repair(tour, rng);
            }
            ShakeOperator::DoubleBridge => {
                if !double_bridge(tour, rng) {
                    random_two_opts(tour, intensity.min(k / 2), rng);
                }
            }
        }
    }
}

/// How the next neighbourhood is chosen inside one VNS pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeighborhoodChange {
    /// The k-th step of a pass uses operator k.
    #[default]
    Sequential,
    /// Uniformly random operator.
    Random,
    /// Roulette over operator weights learned from past successes.
    Adaptive,
}

/// Configuration parameters for Variable Neighborhood Search.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::vns::{NeighborhoodChange, VnsConfig};
///
/// let config = VnsConfig::default()
///     .with_max_iterations(100)
///     .with_max_no_improve(40)
///     .with_neighborhood_change(NeighborhoodChange::Adaptive);
/// assert_eq!(config.max_neighborhoods, 4);
/// assert_eq!(config.max_no_improve, Some(40));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct VnsConfig {
    pub local_search: LocalSearchConfig,
    /// Neighbourhoods tried per pass before starting over.
    pub max_neighborhoods: usize,
    /// Strength of the exchange and 2-opt shakes.
    pub shaking_intensity: usize,
    pub neighborhood_change: NeighborhoodChange,
    /// Descend after each shake. Without it the search is a pure
    /// random walk over improving shakes.
    pub use_local_search: bool,
    /// Weight smoothing factor of the adaptive strategy, in (0, 1].
    pub reaction_factor: f64,
    pub start: StartStrategy,
    /// Maximum number of passes through the neighbourhoods.
    pub max_iterations: Option<usize>,
    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Stop after this many shakes in a row without improvement.
    pub max_no_improve: Option<usize>,
    /// Random seed (None for a fresh one).
    pub seed: Option<u64>,
}

impl Default for VnsConfig {
    fn default() -> Self {
        Self {
            local_search: LocalSearchConfig::default(),
            max_neighborhoods: 4,
            shaking_intensity: 3,
            neighborhood_change: NeighborhoodChange::Sequential,
            use_local_search: true,
            reaction_factor: 0.2,
            start: StartStrategy::Random,
            max_iterations: Some(500),
            time_limit_ms: None,
            max_no_improve: None,
            seed: None,
        }
    }
}

impl VnsConfig {
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
        self
    }

    pub fn with_max_neighborhoods(mut self, n: usize) -> Self {
        self.max_neighborhoods = n;
        self
    }

    pub fn with_shaking_intensity(mut self, intensity: usize) -> Self {
        self.shaking_intensity = intensity;
        self
    }

    pub fn with_neighborhood_change(mut self, change: NeighborhoodChange) -> Self {
        self.neighborhood_change = change;
        self
    }

    pub fn with_local_search_enabled(mut self, enabled: bool) -> Self {
        self.use_local_search = enabled;
        self
    }

    pub fn with_reaction_factor(mut self, factor: f64) -> Self {
        self.reaction_factor = factor;
        self
    }

    pub fn with_start(mut self, start: StartStrategy) -> Self {
        self.start = start;
        self
    }

    /// Sets the maximum number of passes.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets a time limit and drops the pass limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self.max_iterations = None;
        self
    }

    /// Sets the maximum shakes without improvement.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = Some(n);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        validate_budget(self.time_limit_ms, self.max_iterations)?;
        if self.max_neighborhoods == 0 {
            return Err("max_neighborhoods must be at least 1".into());
        }
        if self.shaking_intensity == 0 {
            return Err("shaking_intensity must be at least 1".into());
        }
        if self.reaction_factor <= 0.0 || self.reaction_factor > 1.0 {
            return Err(format!(
                "reaction_factor must be in (0, 1], got {}",
                self.reaction_factor
            ));
        }
        if self.max_no_improve == Some(0) {
            return Err("max_no_improve must be positive or None".into());
        }
        self.local_search.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{random_instance, rng};

    #[test]
    fn test_default_config() {
        let config = VnsConfig::default();
        assert_eq!(config.max_neighborhoods, 4);
        assert_eq!(config.shaking_intensity, 3);
        assert_eq!(config.neighborhood_change, NeighborhoodChange::Sequential);
        assert!(config.use_local_search);
        assert!((config.reaction_factor - 0.2).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = VnsConfig::default();
        assert!(base.clone().with_max_neighborhoods(0).validate().is_err());
        assert!(base.clone().with_shaking_intensity(0).validate().is_err());
        assert!(base.clone().with_reaction_factor(0.0).validate().is_err());
        assert!(base.with_max_no_improve(0).validate().is_err());
    }

    #[test]
    fn test_operator_index_wraps() {
        assert_eq!(ShakeOperator::of_index(0), ShakeOperator::NodeExchange);
        assert_eq!(ShakeOperator::of_index(3), ShakeOperator::DoubleBridge);
        assert_eq!(ShakeOperator::of_index(5), ShakeOperator::TwoOpt);
        for op in ShakeOperator::ALL {
            assert_eq!(ShakeOperator::of_index(op.index()), op);
        }
    }

    #[test]
    fn test_shakes_keep_tour_feasible() {
        for n in [2, 7, 16, 41] {
            let instance = random_instance(n, n as u64);
            let mut r = rng(n as u64);
            for op in ShakeOperator::ALL {
                let mut tour = Tour::random(&instance, &mut r);
                op.apply(&mut tour, 3, &mut r);
                assert!(tour.is_consistent(), "{op:?} on n = {n}");
                assert_eq!(tour.len(), instance.k());
            }
        }
    }
}

//! ILS configuration and perturbation operators.

use crate::budget::validate_budget;
use crate::construction::StartStrategy;
use crate::local_search::LocalSearchConfig;
use crate::perturbation::{destroy_random_rebuild, random_exchanges, random_two_opts};
use crate::tour::Tour;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kick applied to the current solution before each descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Perturbation {
    /// Two random exchanges with unselected nodes.
    #[default]
    DoubleExchange,
    /// Two or three random 2-opt moves. Tours too short for 2-opt get a
    /// double exchange.
    MultiTwoOpt,
    /// Remove a quarter of the tour, refill at random and scramble a
    /// window of it.
    DestroyRebuild,
}

impl Perturbation {
    /// Applies the kick to `tour`.
    pub fn apply<R: Rng>(self, tour: &mut Tour<'_>, rng: &mut R) {
        match self {
            Perturbation::DoubleExchange => {
                random_exchanges(tour, 2, rng);
            }
            Perturbation::MultiTwoOpt => {
                let moves = rng.random_range(2..=3);
                if random_two_opts(tour, moves, rng) == 0 {
                    random_exchanges(tour, 2, rng);
                }
            }
            Perturbation::DestroyRebuild => destroy_random_rebuild(tour, rng),
        }
    }
}

/// Configuration for Iterated Local Search.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::ils::{IlsConfig, Perturbation};
///
/// let config = IlsConfig::default()
///     .with_perturbation(Perturbation::MultiTwoOpt)
///     .with_time_limit_ms(500);
/// assert_eq!(config.time_limit_ms, Some(500));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct IlsConfig {
    pub local_search: LocalSearchConfig,
    pub perturbation: Perturbation,
    /// How the first solution is built.
    pub start: StartStrategy,
    /// Number of perturbation-descent rounds.
    pub max_iterations: Option<usize>,
    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Random seed (None for a fresh one).
    pub seed: Option<u64>,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            local_search: LocalSearchConfig::default(),
            perturbation: Perturbation::DoubleExchange,
            start: StartStrategy::Random,
            max_iterations: Some(1000),
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl IlsConfig {
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
        self
    }

    pub fn with_perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    pub fn with_start(mut self, start: StartStrategy) -> Self {
        self.start = start;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets a time limit and drops the iteration limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self.max_iterations = None;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        validate_budget(self.time_limit_ms, self.max_iterations)?;
        self.local_search.validate()
    }
}

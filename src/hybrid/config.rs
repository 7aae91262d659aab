//! Hybrid evolutionary algorithm configuration.

use crate::budget::validate_budget;
use crate::local_search::LocalSearchConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How two parents are combined into an offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Recombination {
    /// Keep the maximal sub-paths both parents share, randomly reversed,
    /// and fill up with random unused nodes, all in random order.
    #[default]
    CommonSubpaths,
    /// Keep one parent's nodes that the other parent also selects, in
    /// order, and repair by cheapest insertion.
    CommonNodesRepair,
}

/// Configuration for the hybrid evolutionary algorithm.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::hybrid::{HybridConfig, Recombination};
///
/// let config = HybridConfig::default()
///     .with_population_size(10)
///     .with_recombination(Recombination::CommonNodesRepair)
///     .with_max_iterations(100);
/// assert_eq!(config.population_size, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HybridConfig {
    pub local_search: LocalSearchConfig,
    /// Elite population size.
    pub population_size: usize,
    pub recombination: Recombination,
    /// Descend from every offspring before it competes.
    pub use_local_search: bool,
    /// Number of generations.
    pub max_iterations: Option<usize>,
    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Random seed (None for a fresh one).
    pub seed: Option<u64>,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            local_search: LocalSearchConfig::default(),
            population_size: 20,
            recombination: Recombination::CommonSubpaths,
            use_local_search: true,
            max_iterations: Some(1000),
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl HybridConfig {
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
        self
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_recombination(mut self, recombination: Recombination) -> Self {
        self.recombination = recombination;
        self
    }

    pub fn with_local_search_enabled(mut self, enabled: bool) -> Self {
        self.use_local_search = enabled;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets a time limit and drops the generation limit.
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
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        self.local_search.validate()
    }
}

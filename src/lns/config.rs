//! LNS configuration.

use crate::budget::validate_budget;
use crate::construction::StartStrategy;
use crate::local_search::LocalSearchConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which selected nodes the destroy step removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DestroyPolicy {
    /// Endpoints of the costliest edges, rank `i` kept with probability
    /// `exp(-3 i / k)`.
    #[default]
    WorstEdges,
    /// Nodes related to a random seed node by distance and cost
    /// similarity, rank `i` kept with probability `exp(-4 i / k)`.
    Shaw,
    /// One contiguous run of the tour.
    RandomSubpath,
    /// Roulette removal weighted by mean adjacent edge length plus node
    /// cost.
    Weighted,
}

/// Configuration for Large Neighborhood Search.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::lns::{DestroyPolicy, LnsConfig};
///
/// let config = LnsConfig::default()
///     .with_destroy_policy(DestroyPolicy::Shaw)
///     .with_destroy_fraction(0.25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct LnsConfig {
    pub local_search: LocalSearchConfig,
    pub destroy_policy: DestroyPolicy,
    /// Share of the selected nodes removed per iteration, in (0, 1).
    pub destroy_fraction: f64,
    /// Descend after every repair.
    pub use_local_search: bool,
    pub start: StartStrategy,
    /// Number of destroy-repair iterations.
    pub max_iterations: Option<usize>,
    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Random seed (None for a fresh one).
    pub seed: Option<u64>,
}

impl Default for LnsConfig {
    fn default() -> Self {
        Self {
            local_search: LocalSearchConfig::default(),
            destroy_policy: DestroyPolicy::WorstEdges,
            destroy_fraction: 0.3,
            use_local_search: true,
            start: StartStrategy::Random,
            max_iterations: Some(1000),
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl LnsConfig {
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
        self
    }

    pub fn with_destroy_policy(mut self, policy: DestroyPolicy) -> Self {
        self.destroy_policy = policy;
        self
    }

    pub fn with_destroy_fraction(mut self, fraction: f64) -> Self {
        self.destroy_fraction = fraction;
        self
    }

    pub fn with_local_search_enabled(mut self, enabled: bool) -> Self {
        self.use_local_search = enabled;
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
        if !(self.destroy_fraction > 0.0 && self.destroy_fraction < 1.0) {
            return Err(format!(
                "destroy_fraction must be in (0, 1), got {}",
                self.destroy_fraction
            ));
        }
        self.local_search.validate()
    }
}

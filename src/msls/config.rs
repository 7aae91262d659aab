//! MSLS configuration.

use crate::budget::validate_budget;
use crate::construction::StartStrategy;
use crate::local_search::LocalSearchConfig;

/// Configuration for Multiple Start Local Search.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::msls::MslsConfig;
///
/// let config = MslsConfig::default().with_max_iterations(50).with_seed(3);
/// assert_eq!(config.max_iterations, Some(50));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MslsConfig {
    /// Local search applied to every start.
    pub local_search: LocalSearchConfig,
    /// How starting solutions are built.
    pub start: StartStrategy,
    /// Number of starts.
    pub max_iterations: Option<usize>,
    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Random seed (None for a fresh one).
    pub seed: Option<u64>,
}

impl Default for MslsConfig {
    fn default() -> Self {
        Self {
            local_search: LocalSearchConfig::default(),
            start: StartStrategy::Random,
            max_iterations: Some(200),
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl MslsConfig {
    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
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

    /// Sets a time limit and drops the start count, so the run lasts the
    /// whole budget.
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

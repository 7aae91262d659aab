//! LNS execution loop.

use super::config::LnsConfig;
use super::destroy::destroy;
use crate::budget::{StopReason, StopWatch};
use crate::construction::{initial_path, repair};
use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::local_search::LocalSearch;
use crate::random::create_rng;
use crate::solution::Solution;
use crate::tour::Tour;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of an LNS run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LnsResult {
    pub best: Solution,
    /// Destroy-repair iterations completed.
    pub iterations: usize,
    /// Iterations whose result replaced the current solution.
    pub improvements: usize,
    /// Best objective after the initial descent and after every iteration.
    pub cost_history: Vec<i64>,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

/// Large Neighborhood Search runner.
pub struct LnsRunner;

impl LnsRunner {
    /// Runs LNS on `instance`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when `config` does not validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_selective_tsp::lns::{DestroyPolicy, LnsConfig, LnsRunner};
    /// use u_selective_tsp::Instance;
    ///
    /// let points: Vec<(i64, i64)> = (0..16).map(|i| (i * 13 % 31, i * 7 % 17)).collect();
    /// let instance = Instance::from_coordinates(&points, vec![2; 16]).unwrap();
    /// let config = LnsConfig::default()
    ///     .with_destroy_policy(DestroyPolicy::RandomSubpath)
    ///     .with_max_iterations(20)
    ///     .with_seed(1);
    /// let result = LnsRunner::run(&instance, &config).unwrap();
    /// assert_eq!(result.best.len(), 8);
    /// ```
    pub fn run(instance: &Instance, config: &LnsConfig) -> Result<LnsResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs LNS with an optional cancellation token, polled before every
    /// iteration.
    #[tracing::instrument(level = "debug", skip_all, fields(n = instance.n(), k = instance.k()))]
    pub fn run_with_cancel(
        instance: &Instance,
        config: &LnsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<LnsResult> {
        config.validate().map_err(Error::InvalidConfig)?;
        let watch = StopWatch::start(config.time_limit_ms, config.max_iterations, cancel);
        if instance.is_empty() {
            return Ok(LnsResult {
                best: Solution::empty(),
                iterations: 0,
                improvements: 0,
                cost_history: Vec::new(),
                stop_reason: StopReason::EmptyInstance,
                elapsed_ms: 0,
            });
        }

        let search = LocalSearch::new(instance, config.local_search.clone())?;
        let mut rng = create_rng(config.seed);
        debug!(
            policy = ?config.destroy_policy,
            fraction = config.destroy_fraction,
            "lns started"
        );

        let mut current = Tour::from_checked_path(
            instance,
            initial_path(instance, config.start, &mut rng),
        );
        search.improve(&mut current, &mut rng);
        let mut cost_history = vec![current.objective()];

        let mut iterations = 0;
        let mut improvements = 0;
        let stop_reason = loop {
            if let Some(reason) = watch.check(iterations) {
                break reason;
            }
            iterations += 1;

            let partial = destroy(
                instance,
                current.nodes(),
                config.destroy_policy,
                config.destroy_fraction,
                &mut rng,
            );
            let mut candidate = Tour::from_checked_path(instance, repair(instance, partial));
            if config.use_local_search {
                search.improve(&mut candidate, &mut rng);
            }

            if candidate.objective() < current.objective() {
                improvements += 1;
                trace!(
                    iteration = iterations,
                    objective = candidate.objective(),
                    "new best"
                );
                current = candidate;
            }
            cost_history.push(current.objective());
        };

        let best = current.into_solution();
        debug!(objective = best.objective, iterations, ?stop_reason, "lns finished");
        Ok(LnsResult {
            best,
            iterations,
            improvements,
            cost_history,
            stop_reason,
            elapsed_ms: watch.elapsed_ms(),
        })
    }
}

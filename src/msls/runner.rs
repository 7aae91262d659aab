//! MSLS execution loop.

use super::config::MslsConfig;
use crate::budget::{StopReason, StopWatch};
use crate::construction::initial_path;
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

/// Result of an MSLS run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MslsResult {
    /// Best local optimum over all starts.
    pub best: Solution,
    /// Starts completed.
    pub iterations: usize,
    /// Starts that produced a new best.
    pub improvements: usize,
    /// Move deltas evaluated by local search over all starts.
    pub evaluations: usize,
    /// Best objective after each start.
    pub cost_history: Vec<i64>,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

/// Multiple Start Local Search runner.
pub struct MslsRunner;

impl MslsRunner {
    /// Runs MSLS on `instance`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when `config` does not validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_selective_tsp::msls::{MslsConfig, MslsRunner};
    /// use u_selective_tsp::Instance;
    ///
    /// let points: Vec<(i64, i64)> = (0..20).map(|i| (i * 37 % 101, i * 53 % 97)).collect();
    /// let instance = Instance::from_coordinates(&points, vec![5; 20]).unwrap();
    /// let config = MslsConfig::default().with_max_iterations(5).with_seed(1);
    /// let result = MslsRunner::run(&instance, &config).unwrap();
    /// assert_eq!(result.best.len(), 10);
    /// assert_eq!(result.iterations, 5);
    /// ```
    pub fn run(instance: &Instance, config: &MslsConfig) -> Result<MslsResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs MSLS with an optional cancellation token, polled after every
    /// start. At least one start always completes.
    #[tracing::instrument(level = "debug", skip_all, fields(n = instance.n(), k = instance.k()))]
    pub fn run_with_cancel(
        instance: &Instance,
        config: &MslsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MslsResult> {
        config.validate().map_err(Error::InvalidConfig)?;
        let watch = StopWatch::start(config.time_limit_ms, config.max_iterations, cancel);
        if instance.is_empty() {
            return Ok(MslsResult {
                best: Solution::empty(),
                iterations: 0,
                improvements: 0,
                evaluations: 0,
                cost_history: Vec::new(),
                stop_reason: StopReason::EmptyInstance,
                elapsed_ms: 0,
            });
        }

        let search = LocalSearch::new(instance, config.local_search.clone())?;
        let mut rng = create_rng(config.seed);
        debug!(
            max_iterations = ?config.max_iterations,
            time_limit_ms = ?config.time_limit_ms,
            "msls started"
        );

        let mut best: Option<Solution> = None;
        let mut iterations = 0;
        let mut improvements = 0;
        let mut evaluations = 0;
        let mut cost_history = Vec::new();

        let stop_reason = loop {
            let path = initial_path(instance, config.start, &mut rng);
            let mut tour = Tour::from_checked_path(instance, path);
            evaluations += search.improve(&mut tour, &mut rng).evaluations;
            iterations += 1;

            if best.as_ref().is_none_or(|b| tour.objective() < b.objective) {
                improvements += 1;
                trace!(
                    iteration = iterations,
                    objective = tour.objective(),
                    "new best"
                );
                best = Some(tour.into_solution());
            }
            if let Some(b) = &best {
                cost_history.push(b.objective);
            }

            if let Some(reason) = watch.check(iterations) {
                break reason;
            }
        };

        let best = best.unwrap_or_else(Solution::empty);
        debug!(objective = best.objective, iterations, ?stop_reason, "msls finished");
        Ok(MslsResult {
            best,
            iterations,
            improvements,
            evaluations,
            cost_history,
            stop_reason,
            elapsed_ms: watch.elapsed_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::StartStrategy;
    use crate::local_search::{LocalSearchConfig, NeighborhoodKind};
    use crate::test_utils::random_instance;

    #[test]
    fn test_msls_returns_feasible_best() {
        let instance = random_instance(40, 1);
        let config = MslsConfig::default().with_max_iterations(10).with_seed(1);
        let result = MslsRunner::run(&instance, &config).unwrap();

        assert!(instance.check_path(&result.best.path).is_ok());
        assert_eq!(result.best.objective, instance.objective(&result.best.path));
        assert_eq!(result.iterations, 10);
        assert_eq!(result.cost_history.len(), 10);
        assert_eq!(result.stop_reason, StopReason::IterationLimit);
        assert!(result.improvements >= 1);
        assert!(
            result.cost_history.windows(2).all(|w| w[1] <= w[0]),
            "best history must not increase: {:?}",
            result.cost_history
        );
        assert_eq!(*result.cost_history.last().unwrap(), result.best.objective);
    }

    #[test]
    fn test_msls_is_reproducible_with_seed() {
        let instance = random_instance(30, 2);
        let config = MslsConfig::default()
            .with_max_iterations(5)
            .with_start(StartStrategy::Greedy)
            .with_seed(9);
        let a = MslsRunner::run(&instance, &config).unwrap();
        let b = MslsRunner::run(&instance, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_msls_more_starts_never_worse() {
        let instance = random_instance(40, 3);
        let config = MslsConfig::default()
            .with_local_search(
                LocalSearchConfig::default().with_neighborhood(NeighborhoodKind::CachedCandidates),
            )
            .with_seed(4);
        let few = MslsRunner::run(&instance, &config.clone().with_max_iterations(2)).unwrap();
        let many = MslsRunner::run(&instance, &config.with_max_iterations(12)).unwrap();
        // Same seed, so the first two starts coincide.
        assert!(many.best.objective <= few.best.objective);
    }

    #[test]
    fn test_msls_cancel_stops_after_first_start() {
        let instance = random_instance(20, 5);
        let flag = Arc::new(AtomicBool::new(true));
        let config = MslsConfig::default().with_seed(5);
        let result = MslsRunner::run_with_cancel(&instance, &config, Some(flag)).unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert!(instance.check_path(&result.best.path).is_ok());
    }

    #[test]
    fn test_msls_empty_and_invalid() {
        let empty = Instance::new(Vec::new(), Vec::new()).unwrap();
        let result = MslsRunner::run(&empty, &MslsConfig::default()).unwrap();
        assert!(result.best.is_empty());
        assert_eq!(result.stop_reason, StopReason::EmptyInstance);

        let instance = random_instance(10, 6);
        let config = MslsConfig {
            max_iterations: None,
            ..MslsConfig::default()
        };
        assert!(matches!(
            MslsRunner::run(&instance, &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}

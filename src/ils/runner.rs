//! ILS execution loop.
//!
//! # Algorithm
//!
//! 1. Build a starting solution and descend to a local optimum x
//! 2. Perturb a copy of x and descend again, giving x'
//! 3. If f(x') < f(x), set x = x'
//! 4. Repeat from 2 until the budget is spent

use super::config::IlsConfig;
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

/// Result of an ILS run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IlsResult {
    pub best: Solution,
    /// Perturbation rounds completed.
    pub iterations: usize,
    /// Local search runs, the initial descent included.
    pub local_searches: usize,
    /// Rounds whose result replaced the current solution.
    pub improvements: usize,
    /// Best objective after the initial descent and after every round.
    pub cost_history: Vec<i64>,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

/// Iterated Local Search runner.
pub struct IlsRunner;

impl IlsRunner {
    /// Runs ILS on `instance`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when `config` does not validate.
    pub fn run(instance: &Instance, config: &IlsConfig) -> Result<IlsResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs ILS with an optional cancellation token, polled before every
    /// round.
    #[tracing::instrument(level = "debug", skip_all, fields(n = instance.n(), k = instance.k()))]
    pub fn run_with_cancel(
        instance: &Instance,
        config: &IlsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<IlsResult> {
        config.validate().map_err(Error::InvalidConfig)?;
        let watch = StopWatch::start(config.time_limit_ms, config.max_iterations, cancel);
        if instance.is_empty() {
            return Ok(IlsResult {
                best: Solution::empty(),
                iterations: 0,
                local_searches: 0,
                improvements: 0,
                cost_history: Vec::new(),
                stop_reason: StopReason::EmptyInstance,
                elapsed_ms: 0,
            });
        }

        let search = LocalSearch::new(instance, config.local_search.clone())?;
        let mut rng = create_rng(config.seed);
        debug!(
            perturbation = ?config.perturbation,
            max_iterations = ?config.max_iterations,
            time_limit_ms = ?config.time_limit_ms,
            "ils started"
        );

        let mut current = Tour::from_checked_path(
            instance,
            initial_path(instance, config.start, &mut rng),
        );
        search.improve(&mut current, &mut rng);
        let mut local_searches = 1;
        let mut cost_history = vec![current.objective()];

        let mut iterations = 0;
        let mut improvements = 0;
        let stop_reason = loop {
            if let Some(reason) = watch.check(iterations) {
                break reason;
            }
            let mut candidate = current.clone();
            config.perturbation.apply(&mut candidate, &mut rng);
            search.improve(&mut candidate, &mut rng);
            local_searches += 1;
            iterations += 1;

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

        // Only strict improvements are accepted, so the current solution is
        // also the best one.
        let best = current.into_solution();
        debug!(objective = best.objective, iterations, ?stop_reason, "ils finished");
        Ok(IlsResult {
            best,
            iterations,
            local_searches,
            improvements,
            cost_history,
            stop_reason,
            elapsed_ms: watch.elapsed_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ils::Perturbation;
    use crate::msls::{MslsConfig, MslsRunner};
    use crate::test_utils::random_instance;

    #[test]
    fn test_ils_every_perturbation_improves_on_start() {
        let instance = random_instance(50, 1);
        for perturbation in [
            Perturbation::DoubleExchange,
            Perturbation::MultiTwoOpt,
            Perturbation::DestroyRebuild,
        ] {
            let config = IlsConfig::default()
                .with_perturbation(perturbation)
                .with_max_iterations(30)
                .with_seed(1);
            let result = IlsRunner::run(&instance, &config).unwrap();
            assert!(instance.check_path(&result.best.path).is_ok());
            assert_eq!(result.best.objective, instance.objective(&result.best.path));
            assert_eq!(result.iterations, 30);
            assert_eq!(result.local_searches, 31);
            assert_eq!(result.cost_history.len(), 31);
            assert!(
                result.best.objective <= result.cost_history[0],
                "{perturbation:?} got worse than its start"
            );
            assert!(result.cost_history.windows(2).all(|w| w[1] <= w[0]));
        }
    }

    #[test]
    fn test_ils_not_worse_than_single_descent() {
        let instance = random_instance(60, 2);
        let single = MslsRunner::run(
            &instance,
            &MslsConfig::default().with_max_iterations(1).with_seed(2),
        )
        .unwrap();
        let ils = IlsRunner::run(
            &instance,
            &IlsConfig::default().with_max_iterations(50).with_seed(2),
        )
        .unwrap();
        // Both start from the same random path drawn from the same seed.
        assert!(ils.best.objective <= single.best.objective);
    }

    #[test]
    fn test_ils_time_limit() {
        let instance = random_instance(30, 3);
        let config = IlsConfig::default().with_time_limit_ms(20).with_seed(3);
        let result = IlsRunner::run(&instance, &config).unwrap();
        assert_eq!(result.stop_reason, StopReason::TimeLimit);
        assert!(result.elapsed_ms >= 20);
        assert!(instance.check_path(&result.best.path).is_ok());
    }

    #[test]
    fn test_ils_tiny_instances() {
        for n in 1..=4 {
            let instance = random_instance(n, n as u64);
            for perturbation in [Perturbation::MultiTwoOpt, Perturbation::DestroyRebuild] {
                let config = IlsConfig::default()
                    .with_perturbation(perturbation)
                    .with_max_iterations(5)
                    .with_seed(0);
                let result = IlsRunner::run(&instance, &config).unwrap();
                assert!(instance.check_path(&result.best.path).is_ok());
            }
        }
    }
}

//! Hybrid evolutionary loop execution.

use super::config::HybridConfig;
use super::recombination::recombine;
use crate::budget::{StopReason, StopWatch};
use crate::construction::random_path;
use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::local_search::LocalSearch;
use crate::random::create_rng;
use crate::solution::Solution;
use crate::tour::Tour;
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Attempts per population slot when seeding the population.
const SEED_ATTEMPTS_PER_SLOT: usize = 50;

/// Result of a hybrid evolutionary run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HybridResult {
    /// Best member of the final population.
    pub best: Solution,
    /// Generations executed.
    pub generations: usize,
    /// Offspring that entered the population.
    pub replacements: usize,
    /// Population size reached. Smaller than configured when the instance
    /// has too few distinct local optima.
    pub population_size: usize,
    /// Best objective after seeding and after every generation.
    pub cost_history: Vec<i64>,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

fn worst_index(population: &[Solution]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .max_by_key(|&(_, s)| s.objective)
        .map(|(i, _)| i)
}

fn best_objective(population: &[Solution]) -> i64 {
    population.iter().map(|s| s.objective).min().unwrap_or(0)
}

/// Two parent indices, distinct whenever the population allows it.
fn pick_parents<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    let first = rng.random_range(0..len);
    if len < 2 {
        return (first, first);
    }
    let mut second = rng.random_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    (first, second)
}

/// Executes the hybrid evolutionary algorithm.
pub struct HybridRunner;

impl HybridRunner {
    /// Runs the hybrid evolutionary algorithm on `instance`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when `config` does not validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_selective_tsp::hybrid::{HybridConfig, HybridRunner};
    /// use u_selective_tsp::Instance;
    ///
    /// let points: Vec<(i64, i64)> = (0..30).map(|i| (i * 17 % 61, i * 23 % 59)).collect();
    /// let instance = Instance::from_coordinates(&points, vec![4; 30]).unwrap();
    /// let config = HybridConfig::default()
    ///     .with_population_size(6)
    ///     .with_max_iterations(20)
    ///     .with_seed(2);
    /// let result = HybridRunner::run(&instance, &config).unwrap();
    /// assert_eq!(result.best.len(), 15);
    /// ```
    pub fn run(instance: &Instance, config: &HybridConfig) -> Result<HybridResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs with an optional cancellation token, polled before every
    /// generation. Seeding the population always completes.
    #[tracing::instrument(level = "debug", skip_all, fields(n = instance.n(), k = instance.k()))]
    pub fn run_with_cancel(
        instance: &Instance,
        config: &HybridConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<HybridResult> {
        config.validate().map_err(Error::InvalidConfig)?;
        let watch = StopWatch::start(config.time_limit_ms, config.max_iterations, cancel);
        if instance.is_empty() {
            return Ok(HybridResult {
                best: Solution::empty(),
                generations: 0,
                replacements: 0,
                population_size: 0,
                cost_history: Vec::new(),
                stop_reason: StopReason::EmptyInstance,
                elapsed_ms: 0,
            });
        }

        let search = LocalSearch::new(instance, config.local_search.clone())?;
        let mut rng = create_rng(config.seed);

        // 1. Seed the population with distinct local optima
        let mut population: Vec<Solution> = Vec::with_capacity(config.population_size);
        let max_attempts = SEED_ATTEMPTS_PER_SLOT * config.population_size;
        let mut attempts = 0;
        while population.len() < config.population_size && attempts < max_attempts {
            attempts += 1;
            let candidate = search.optimize_path(random_path(instance, &mut rng), &mut rng);
            let objective = candidate.objective;
            if population.iter().all(|s| s.objective != objective) {
                population.push(candidate);
            }
        }
        debug!(
            population = population.len(),
            attempts,
            recombination = ?config.recombination,
            "hybrid population seeded"
        );

        let mut cost_history = vec![best_objective(&population)];
        let mut generations = 0;
        let mut replacements = 0;

        // 2. Steady-state evolution
        let stop_reason = loop {
            if let Some(reason) = watch.check(generations) {
                break reason;
            }
            generations += 1;

            let (i, j) = pick_parents(population.len(), &mut rng);
            let path = recombine(
                instance,
                config.recombination,
                &population[i].path,
                &population[j].path,
                &mut rng,
            );
            let mut child = Tour::from_checked_path(instance, path);
            if config.use_local_search {
                search.improve(&mut child, &mut rng);
            }

            let duplicate = population.iter().any(|s| s.objective == child.objective());
            if let Some(worst) = worst_index(&population) {
                if !duplicate && child.objective() < population[worst].objective {
                    if child.objective() < best_objective(&population) {
                        trace!(
                            generation = generations,
                            objective = child.objective(),
                            "new best"
                        );
                    }
                    population[worst] = child.into_solution();
                    replacements += 1;
                }
            }
            cost_history.push(best_objective(&population));
        };

        let best = population
            .iter()
            .min_by_key(|s| s.objective)
            .cloned()
            .unwrap_or_else(Solution::empty);
        debug!(
            objective = best.objective,
            generations,
            replacements,
            ?stop_reason,
            "hybrid finished"
        );
        Ok(HybridResult {
            best,
            generations,
            replacements,
            population_size: population.len(),
            cost_history,
            stop_reason,
            elapsed_ms: watch.elapsed_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hybrid::Recombination;
    use crate::test_utils::{random_instance, rng};

    #[test]
    fn test_hybrid_both_operators_return_feasible_best() {
        let instance = random_instance(50, 1);
        for recombination in [
            Recombination::CommonSubpaths,
            Recombination::CommonNodesRepair,
        ] {
            let config = HybridConfig::default()
                .with_population_size(8)
                .with_recombination(recombination)
                .with_max_iterations(25)
                .with_seed(1);
            let result = HybridRunner::run(&instance, &config).unwrap();
            assert!(
                instance.check_path(&result.best.path).is_ok(),
                "{recombination:?}"
            );
            assert_eq!(result.best.objective, instance.objective(&result.best.path));
            assert_eq!(result.generations, 25);
            assert_eq!(result.population_size, 8);
            assert_eq!(result.cost_history.len(), 26);
            assert!(result.cost_history.windows(2).all(|w| w[1] <= w[0]));
            assert!(result.replacements <= result.generations);
        }
    }

    #[test]
    fn test_population_capped_on_tiny_instance() {
        // Two nodes, k = 1: only two distinct solutions exist.
        let instance = Instance::new(vec![vec![0, 4], vec![4, 0]], vec![1, 2]).unwrap();
        let config = HybridConfig::default()
            .with_population_size(5)
            .with_local_search_enabled(false)
            .with_max_iterations(3)
            .with_seed(3);
        let result = HybridRunner::run(&instance, &config).unwrap();
        assert!(result.population_size <= 2);
        assert_eq!(result.best.objective, 1);
    }

    #[test]
    fn test_pick_parents_distinct() {
        let mut r = rng(4);
        for _ in 0..200 {
            let (a, b) = pick_parents(5, &mut r);
            assert_ne!(a, b);
            assert!(a < 5 && b < 5);
        }
        assert_eq!(pick_parents(1, &mut r), (0, 0));
    }

    #[test]
    fn test_hybrid_cancel_after_seeding() {
        let instance = random_instance(20, 5);
        let flag = Arc::new(AtomicBool::new(true));
        let config = HybridConfig::default().with_population_size(4).with_seed(5);
        let result = HybridRunner::run_with_cancel(&instance, &config, Some(flag)).unwrap();
        assert_eq!(result.generations, 0);
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert!(instance.check_path(&result.best.path).is_ok());
    }
}

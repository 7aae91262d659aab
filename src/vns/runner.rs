//! Variable Neighborhood Search execution engine.
//!
//! # Algorithm (Basic VNS)
//!
//! 1. Generate initial solution x, apply local search
//! 2. Set k = 1
//! 3. While stopping criterion not met:
//!    a. **Shaking**: Generate x' randomly in N_k(x)
//!    b. **Local search**: Apply local search to x' → x''
//!    c. **Move or not**: If f(x'') < f(x), set x = x'' and start a new
//!    pass at k = 1; otherwise k = k + 1
//!    d. A pass ends when k exceeds the neighbourhood count
//! 4. Return best solution found
//!
//! # Reference
//!
//! Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//! *Computers & Operations Research* 24(11), 1097-1100.

use super::config::{NeighborhoodChange, ShakeOperator, VnsConfig};
use crate::budget::{StopReason, StopWatch};
use crate::construction::initial_path;
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

/// Floor of an adaptive operator weight, so no operator is starved.
const MIN_WEIGHT: f64 = 0.05;

/// Result of a VNS run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VnsResult {
    /// Best solution found.
    pub best: Solution,
    /// Passes through the neighbourhoods started.
    pub iterations: usize,
    /// Shake-and-descend steps executed.
    pub shakes: usize,
    /// Steps that improved the current solution.
    pub improvements: usize,
    /// Pass at which the best solution was found.
    pub best_iteration: usize,
    /// Times each [`ShakeOperator`] was used, by [`ShakeOperator::index`].
    pub operator_usage: Vec<usize>,
    /// Times each operator led to an improvement.
    pub operator_successes: Vec<usize>,
    /// Final operator weights (all 1.0 unless the strategy is adaptive).
    pub operator_weights: Vec<f64>,
    /// Best objective at the end of each pass.
    pub cost_history: Vec<i64>,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

/// Tracks per-operator statistics for adaptive weight updates.
#[derive(Debug, Clone)]
struct OperatorStats {
    weight: f64,
    segment_score: f64,
    segment_uses: usize,
}

impl OperatorStats {
    fn new() -> Self {
        Self {
            weight: 1.0,
            segment_score: 0.0,
            segment_uses: 0,
        }
    }

    fn record(&mut self, score: f64) {
        self.segment_score += score;
        self.segment_uses += 1;
    }

    /// Exponential smoothing at the end of a pass:
    /// w = w * (1 - rho) + rho * (score / uses).
    fn update_weight(&mut self, reaction_factor: f64) {
        if self.segment_uses > 0 {
            let avg_score = self.segment_score / self.segment_uses as f64;
            self.weight = (self.weight * (1.0 - reaction_factor) + avg_score * reaction_factor)
                .max(MIN_WEIGHT);
        }
        self.segment_score = 0.0;
        self.segment_uses = 0;
    }
}

/// Roulette wheel selection on operator weights.
fn roulette_select<R: Rng>(stats: &[OperatorStats], rng: &mut R) -> usize {
    let total: f64 = stats.iter().map(|s| s.weight).sum();
    if total <= 0.0 || stats.is_empty() {
        return 0;
    }
    let mut roll = rng.random_range(0.0..total);
    for (i, stat) in stats.iter().enumerate() {
        roll -= stat.weight;
        if roll <= 0.0 {
            return i;
        }
    }
    stats.len() - 1
}

fn select_operator<R: Rng>(
    change: NeighborhoodChange,
    step: usize,
    stats: &[OperatorStats],
    rng: &mut R,
) -> ShakeOperator {
    match change {
        NeighborhoodChange::Sequential => ShakeOperator::of_index(step),
        NeighborhoodChange::Random => {
            ShakeOperator::of_index(rng.random_range(0..ShakeOperator::ALL.len()))
        }
        NeighborhoodChange::Adaptive => ShakeOperator::of_index(roulette_select(stats, rng)),
    }
}

/// Variable Neighborhood Search runner.
pub struct VnsRunner;

impl VnsRunner {
    /// Executes Basic VNS on `instance`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when `config` does not validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_selective_tsp::vns::{VnsConfig, VnsRunner};
    /// use u_selective_tsp::Instance;
    ///
    /// let points: Vec<(i64, i64)> = (0..24).map(|i| (i * 41 % 103, i * 29 % 89)).collect();
    /// let instance = Instance::from_coordinates(&points, vec![3; 24]).unwrap();
    /// let config = VnsConfig::default().with_max_iterations(10).with_seed(7);
    /// let result = VnsRunner::run(&instance, &config).unwrap();
    /// assert_eq!(result.best.len(), 12);
    /// ```
    pub fn run(instance: &Instance, config: &VnsConfig) -> Result<VnsResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs VNS with an optional cancellation token, polled before every
    /// shake.
    #[tracing::instrument(level = "debug", skip_all, fields(n = instance.n(), k = instance.k()))]
    pub fn run_with_cancel(
        instance: &Instance,
        config: &VnsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<VnsResult> {
        config.validate().map_err(Error::InvalidConfig)?;
        let watch = StopWatch::start(config.time_limit_ms, config.max_iterations, cancel);
        let operators = ShakeOperator::ALL.len();
        if instance.is_empty() {
            return Ok(VnsResult {
                best: Solution::empty(),
                iterations: 0,
                shakes: 0,
                improvements: 0,
                best_iteration: 0,
                operator_usage: vec![0; operators],
                operator_successes: vec![0; operators],
                operator_weights: vec![1.0; operators],
                cost_history: Vec::new(),
                stop_reason: StopReason::EmptyInstance,
                elapsed_ms: 0,
            });
        }

        let search = LocalSearch::new(instance, config.local_search.clone())?;
        let mut rng = create_rng(config.seed);
        debug!(
            change = ?config.neighborhood_change,
            max_neighborhoods = config.max_neighborhoods,
            intensity = config.shaking_intensity,
            "vns started"
        );

        let mut current = Tour::from_checked_path(
            instance,
            initial_path(instance, config.start, &mut rng),
        );
        search.improve(&mut current, &mut rng);

        let mut stats: Vec<OperatorStats> = (0..operators).map(|_| OperatorStats::new()).collect();
        let mut usage = vec![0; operators];
        let mut successes = vec![0; operators];
        let mut cost_history = Vec::new();
        let mut iterations = 0;
        let mut shakes = 0;
        let mut improvements = 0;
        let mut best_iteration = 0;
        let mut no_improve = 0;

        let stop_reason = 'outer: loop {
            if let Some(reason) = watch.check(iterations) {
                break reason;
            }
            iterations += 1;

            for step in 0..config.max_neighborhoods {
                if let Some(reason) = watch.interrupted() {
                    break 'outer reason;
                }
                let op = select_operator(config.neighborhood_change, step, &stats, &mut rng);
                usage[op.index()] += 1;
                shakes += 1;

                let mut candidate = current.clone();
                op.apply(&mut candidate, config.shaking_intensity, &mut rng);
                if config.use_local_search {
                    search.improve(&mut candidate, &mut rng);
                }

                if candidate.objective() < current.objective() {
                    current = candidate;
                    successes[op.index()] += 1;
                    stats[op.index()].record(1.0);
                    improvements += 1;
                    best_iteration = iterations;
                    no_improve = 0;
                    trace!(
                        iteration = iterations,
                        ?op,
                        objective = current.objective(),
                        "new best"
                    );
                    break;
                }
                stats[op.index()].record(0.0);
                no_improve += 1;
                if config.max_no_improve.is_some_and(|max| no_improve >= max) {
                    cost_history.push(current.objective());
                    break 'outer StopReason::NoImprovement;
                }
            }

            if config.neighborhood_change == NeighborhoodChange::Adaptive {
                for stat in &mut stats {
                    stat.update_weight(config.reaction_factor);
                }
            }
            cost_history.push(current.objective());
        };

        let best = current.into_solution();
        debug!(objective = best.objective, iterations, shakes, ?stop_reason, "vns finished");
        Ok(VnsResult {
            best,
            iterations,
            shakes,
            improvements,
            best_iteration,
            operator_usage: usage,
            operator_successes: successes,
            operator_weights: stats.iter().map(|s| s.weight).collect(),
            cost_history,
            stop_reason,
            elapsed_ms: watch.elapsed_ms(),
        })
    }
}

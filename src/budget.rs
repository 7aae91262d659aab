//! Stopping rules shared by the drivers.
//!
//! A run stops on the first of: wall-clock limit, iteration limit, an
//! external cancellation flag. Checks happen only between iterations, never
//! while a move is being applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a driver returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    TimeLimit,
    IterationLimit,
    /// Too many iterations in a row without a new best solution.
    NoImprovement,
    Cancelled,
    /// The instance has no node to select.
    EmptyInstance,
}

/// Checks the shared budget fields of a driver config.
pub(crate) fn validate_budget(
    time_limit_ms: Option<u64>,
    max_iterations: Option<usize>,
) -> Result<(), String> {
    if time_limit_ms.is_none() && max_iterations.is_none() {
        return Err("either time_limit_ms or max_iterations must be set".into());
    }
    if time_limit_ms == Some(0) {
        return Err("time_limit_ms must be positive or None".into());
    }
    if max_iterations == Some(0) {
        return Err("max_iterations must be positive or None".into());
    }
    Ok(())
}

/// Budget of one run, started when created.
#[derive(Debug)]
pub(crate) struct StopWatch {
    start: Instant,
    time_limit: Option<Duration>,
    max_iterations: Option<usize>,
    cancel: Option<Arc<AtomicBool>>,
}

impl StopWatch {
    pub fn start(
        time_limit_ms: Option<u64>,
        max_iterations: Option<usize>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            start: Instant::now(),
            time_limit: time_limit_ms.map(Duration::from_millis),
            max_iterations,
            cancel,
        }
    }

    /// The reason to stop after `iterations` completed iterations, if any.
    pub fn check(&self, iterations: usize) -> Option<StopReason> {
        if let Some(reason) = self.interrupted() {
            return Some(reason);
        }
        self.max_iterations
            .is_some_and(|max| iterations >= max)
            .then_some(StopReason::IterationLimit)
    }

    /// Cancellation or time limit, for polls inside an iteration.
    pub fn interrupted(&self) -> Option<StopReason> {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Some(StopReason::Cancelled);
            }
        }
        self.time_limit
            .is_some_and(|limit| self.start.elapsed() >= limit)
            .then_some(StopReason::TimeLimit)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

//! Independent repeated runs.
//!
//! Experiments repeat a method many times with different seeds and keep
//! every outcome. With the `parallel` feature the runs execute on the rayon
//! thread pool; results always come back in run order, so a fixed
//! `base_seed` gives the same output either way.

use crate::solution::Solution;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `f(run, base_seed + run)` for every `run` in `0..runs` and collects
/// the results in run order.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::batch::run_independent;
/// use u_selective_tsp::msls::{MslsConfig, MslsRunner};
/// use u_selective_tsp::Instance;
///
/// let points: Vec<(i64, i64)> = (0..12).map(|i| (i * 5 % 13, i * 3 % 7)).collect();
/// let instance = Instance::from_coordinates(&points, vec![1; 12]).unwrap();
/// let results = run_independent(4, 100, |_, seed| {
///     let config = MslsConfig::default().with_max_iterations(3).with_seed(seed);
///     MslsRunner::run(&instance, &config)
/// });
/// assert_eq!(results.len(), 4);
/// assert!(results.iter().all(|r| r.is_ok()));
/// ```
pub fn run_independent<T, F>(runs: usize, base_seed: u64, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, u64) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..runs)
            .into_par_iter()
            .map(|run| f(run, base_seed.wrapping_add(run as u64)))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..runs)
            .map(|run| f(run, base_seed.wrapping_add(run as u64)))
            .collect()
    }
}

/// Solution with the lowest objective. Ties go to the earliest.
pub fn best_of<'s, I>(solutions: I) -> Option<&'s Solution>
where
    I: IntoIterator<Item = &'s Solution>,
{
    solutions
        .into_iter()
        .fold(None, |best: Option<&Solution>, s| match best {
            Some(b) if b.objective <= s.objective => Some(b),
            _ => Some(s),
        })
}

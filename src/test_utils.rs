//! Instance generators shared by the unit tests.

use crate::instance::Instance;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(crate) fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random Euclidean instance with coordinates in a 1000 x 1000 square and
/// costs in `0..500`.
pub(crate) fn random_instance(n: usize, seed: u64) -> Instance {
    let mut rng = rng(seed);
    let points: Vec<(i64, i64)> = (0..n)
        .map(|_| (rng.random_range(0..1000), rng.random_range(0..1000)))
        .collect();
    let costs = (0..n).map(|_| rng.random_range(0..500)).collect();
    Instance::from_coordinates(&points, costs).unwrap()
}

/// Corners of a square with zero costs, listed in cycle order, so nodes
/// `i` and `j` share a side exactly when `i + j` is odd.
pub(crate) fn square(side: i64) -> Instance {
    Instance::from_coordinates(&[(0, 0), (side, 0), (side, side), (0, side)], vec![0; 4]).unwrap()
}

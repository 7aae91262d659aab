//! Per-run pseudorandom streams.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the generator a run threads through every randomized step.
///
/// `None` draws a fresh seed, so unseeded runs are independent.
pub(crate) fn create_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

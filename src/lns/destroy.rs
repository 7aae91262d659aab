//! Destroy policies.
//!
//! Each policy takes the current cyclic path and returns the surviving
//! nodes in the order they had in the tour.

use super::config::DestroyPolicy;
use crate::instance::Instance;
use rand::Rng;

/// Nodes removed from a tour of `k` nodes: `ceil(k * fraction)` clamped to
/// `[1, k - 1]`, or 0 when `k < 2`.
pub fn destroy_count(k: usize, fraction: f64) -> usize {
    if k < 2 {
        return 0;
    }
    ((k as f64 * fraction).ceil() as usize).clamp(1, k - 1)
}

/// Removes [`destroy_count`] nodes of `path` according to `policy`.
pub fn destroy<R: Rng>(
    instance: &Instance,
    path: &[usize],
    policy: DestroyPolicy,
    fraction: f64,
    rng: &mut R,
) -> Vec<usize> {
    let count = destroy_count(path.len(), fraction);
    if count == 0 {
        return path.to_vec();
    }
    let removed = match policy {
        DestroyPolicy::WorstEdges => worst_edges(instance, path, count, rng),
        DestroyPolicy::Shaw => shaw(instance, path, count, rng),
        DestroyPolicy::RandomSubpath => return random_subpath(path, count, rng),
        DestroyPolicy::Weighted => weighted(instance, path, count, rng),
    };
    path.iter()
        .zip(&removed)
        .filter(|&(_, &gone)| !gone)
        .map(|(&v, _)| v)
        .collect()
}

/// Edges ranked by `D + mean endpoint cost`, worst first; each pass keeps
/// rank `i` with probability `exp(-3 i / k)` and drops one of its
/// endpoints at random.
fn worst_edges<R: Rng>(
    instance: &Instance,
    path: &[usize],
    count: usize,
    rng: &mut R,
) -> Vec<bool> {
    let k = path.len();
    let mut edges: Vec<(f64, usize)> = (0..k)
        .map(|i| {
            let (a, b) = (path[i], path[(i + 1) % k]);
            let weight =
                instance.dist(a, b) as f64 + (instance.cost(a) + instance.cost(b)) as f64 / 2.0;
            (weight, i)
        })
        .collect();
    edges.sort_by(|x, y| y.0.total_cmp(&x.0));

    let mut removed = vec![false; k];
    let mut left = count;
    let mut rank = 0;
    while left > 0 {
        let accept = (-3.0 * rank as f64 / k as f64).exp();
        if rng.random::<f64>() < accept {
            let from = edges[rank].1;
            let at = if rng.random_bool(0.5) {
                from
            } else {
                (from + 1) % k
            };
            if !removed[at] {
                removed[at] = true;
                left -= 1;
            }
        }
        rank = (rank + 1) % k;
    }
    removed
}

/// Seed node plus the nodes most related to it, relatedness being
/// `D(seed, v) + |C(seed) - C(v)|` (lower is closer).
fn shaw<R: Rng>(instance: &Instance, path: &[usize], count: usize, rng: &mut R) -> Vec<bool> {
    let k = path.len();
    let seed_at = rng.random_range(0..k);
    let seed = path[seed_at];
    let mut related: Vec<(i64, usize)> = (0..k)
        .filter(|&i| i != seed_at)
        .map(|i| {
            let v = path[i];
            let cost_gap = (instance.cost(seed) - instance.cost(v)).abs();
            (instance.dist(seed, v) + cost_gap, i)
        })
        .collect();
    related.sort_by_key(|&(r, _)| r);

    let mut removed = vec![false; k];
    removed[seed_at] = true;
    let mut left = count - 1;
    let len = related.len() as f64;
    for (rank, &(_, i)) in related.iter().enumerate() {
        if left == 0 {
            break;
        }
        if rng.random::<f64>() < (-4.0 * rank as f64 / len).exp() {
            removed[i] = true;
            left -= 1;
        }
    }
    for &(_, i) in &related {
        if left == 0 {
            break;
        }
        if !removed[i] {
            removed[i] = true;
            left -= 1;
        }
    }
    removed
}

/// Drops `count` consecutive positions from a random start; the survivors
/// start right after the gap.
fn random_subpath<R: Rng>(path: &[usize], count: usize, rng: &mut R) -> Vec<usize> {
    let k = path.len();
    let start = rng.random_range(0..k);
    (count..k).map(|offset| path[(start + offset) % k]).collect()
}

/// Roulette removal without replacement, weight of position `i` being the
/// mean of its two tour edges plus its node cost.
fn weighted<R: Rng>(instance: &Instance, path: &[usize], count: usize, rng: &mut R) -> Vec<bool> {
    let k = path.len();
    let mut weights: Vec<f64> = (0..k)
        .map(|i| {
            let v = path[i];
            let prev = path[(i + k - 1) % k];
            let next = path[(i + 1) % k];
            (instance.dist(prev, v) + instance.dist(v, next)) as f64 / 2.0
                + instance.cost(v) as f64
        })
        .collect();

    let mut removed = vec![false; k];
    for _ in 0..count {
        let total: f64 = weights.iter().sum();
        let pick = if total > 0.0 {
            let mut roll = rng.random_range(0.0..total);
            let mut chosen = None;
            for (i, &w) in weights.iter().enumerate() {
                if w <= 0.0 {
                    continue;
                }
                roll -= w;
                chosen = Some(i);
                if roll <= 0.0 {
                    break;
                }
            }
            chosen
        } else {
            None
        };
        let i = pick.unwrap_or_else(|| {
            let open: Vec<usize> = (0..k).filter(|&i| !removed[i]).collect();
            open[rng.random_range(0..open.len())]
        });
        removed[i] = true;
        weights[i] = 0.0;
    }
    removed
}

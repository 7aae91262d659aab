//! Random kicks shared by the iterated and variable-neighbourhood drivers.
//!
//! Every operator mutates a [`Tour`] and leaves it feasible. When an
//! operator cannot act (no unselected node to bring in, a tour too short to
//! cut) it does nothing and reports how much it changed.

use crate::construction::repair;
use crate::tour::Tour;
use rand::Rng;

/// Smallest tour a double bridge is attempted on.
pub const DOUBLE_BRIDGE_MIN_LEN: usize = 8;

/// Position draws tried before a double bridge gives up.
const DOUBLE_BRIDGE_ATTEMPTS: usize = 10;

/// Replaces a random tour position with a random unselected node, `count`
/// times. Returns the number of exchanges applied.
pub fn random_exchanges<R: Rng>(tour: &mut Tour<'_>, count: usize, rng: &mut R) -> usize {
    if tour.is_empty() {
        return 0;
    }
    let mut pool: Vec<usize> = tour.unselected().collect();
    if pool.is_empty() {
        return 0;
    }
    for _ in 0..count {
        let position = rng.random_range(0..tour.len());
        let slot = rng.random_range(0..pool.len());
        let out = tour.node(position);
        tour.apply_exchange(position, pool[slot]);
        pool[slot] = out;
    }
    count
}

/// Applies `count` random non-degenerate 2-opt moves. Tours shorter than
/// four nodes have none and are left alone.
pub fn random_two_opts<R: Rng>(tour: &mut Tour<'_>, count: usize, rng: &mut R) -> usize {
    let k = tour.len();
    if k < 4 {
        return 0;
    }
    for _ in 0..count {
        let i = rng.random_range(0..k);
        let j = (i + rng.random_range(2..=k - 2)) % k;
        tour.apply_two_opt(i, j);
    }
    count
}

/// Removes about a quarter of the tour and refills it with random
/// unselected nodes at random positions, then scrambles a window of a
/// third of the tour.
///
/// Tours shorter than four nodes get a double exchange instead.
pub fn destroy_random_rebuild<R: Rng>(tour: &mut Tour<'_>, rng: &mut R) {
    let instance = tour.instance();
    let k = tour.len();
    if k < 4 {
        random_exchanges(tour, 2, rng);
        return;
    }
    let remove = (k / 4).clamp(1, k / 3);

    let mut path = tour.nodes().to_vec();
    let mut in_path = vec![false; instance.n()];
    for &v in &path {
        in_path[v] = true;
    }
    for _ in 0..remove {
        let at = rng.random_range(0..path.len());
        in_path[path.remove(at)] = false;
    }

    let mut pool: Vec<usize> = (0..instance.n()).filter(|&v| !in_path[v]).collect();
    while path.len() < k && !pool.is_empty() {
        let u = pool.swap_remove(rng.random_range(0..pool.len()));
        let at = rng.random_range(0..=path.len());
        path.insert(at, u);
    }

    let window = path.len() / 3;
    if window > 0 {
        let start = rng.random_range(0..path.len() - window);
        for offset in 0..window {
            let other = start + rng.random_range(0..window);
            path.swap(start + offset, other);
        }
    }

    *tour = Tour::from_checked_path(instance, path);
}

/// Removes a random 20-30% of the tour and refills it by cheapest
/// insertion. Tours shorter than four nodes are left alone.
pub fn destroy_repair<R: Rng>(tour: &mut Tour<'_>, rng: &mut R) -> usize {
    let instance = tour.instance();
    let k = tour.len();
    if k < 4 {
        return 0;
    }
    let fraction = 0.2 + rng.random::<f64>() * 0.1;
    let remove = ((k as f64 * fraction).ceil() as usize).clamp(1, k - 1);

    let mut path = tour.nodes().to_vec();
    for _ in 0..remove {
        path.remove(rng.random_range(0..path.len()));
    }
    *tour = Tour::from_checked_path(instance, repair(instance, path));
    remove
}

/// Cuts the tour at four random positions, each segment at least `k / 8`
/// long, and reconnects the three inner segments in reverse order.
///
/// Returns `false` without touching the tour when it has fewer than
/// [`DOUBLE_BRIDGE_MIN_LEN`] nodes or no valid cut set was drawn.
pub fn double_bridge<R: Rng>(tour: &mut Tour<'_>, rng: &mut R) -> bool {
    let k = tour.len();
    if k < DOUBLE_BRIDGE_MIN_LEN {
        return false;
    }
    let min_gap = k / 8;
    for _ in 0..DOUBLE_BRIDGE_ATTEMPTS {
        let mut cuts = [0usize; 4];
        for c in &mut cuts {
            *c = rng.random_range(0..k);
        }
        cuts.sort_unstable();
        let [p0, p1, p2, p3] = cuts;
        let gaps = [p1 - p0, p2 - p1, p3 - p2, k - p3 + p0];
        if gaps.iter().any(|&g| g < min_gap) {
            continue;
        }

        let old = tour.nodes();
        let mut path = Vec::with_capacity(k);
        path.extend_from_slice(&old[..=p0]);
        path.extend_from_slice(&old[p2 + 1..=p3]);
        path.extend_from_slice(&old[p1 + 1..=p2]);
        path.extend_from_slice(&old[p0 + 1..=p1]);
        path.extend_from_slice(&old[p3 + 1..]);
        *tour = Tour::from_checked_path(tour.instance(), path);
        return true;
    }
    false
}

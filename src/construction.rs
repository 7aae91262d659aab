//! Construction heuristics: random starts, greedy insertion builders and
//! the cheapest-insertion repair shared by the destroy/repair drivers.

use crate::instance::Instance;
use crate::solution::Solution;
use rand::seq::SliceRandom;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a driver builds the solutions it starts local search from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StartStrategy {
    /// Uniformly random selection in random order.
    #[default]
    Random,
    /// Weighted 2-regret insertion from a random start node.
    Greedy,
}

/// Weights of the 2-regret insertion score
/// `regret * (second_best - best) - objective * best`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegretWeights {
    pub regret: f64,
    pub objective: f64,
}

impl RegretWeights {
    /// Pure cheapest insertion.
    pub const GREEDY: RegretWeights = RegretWeights {
        regret: 0.0,
        objective: 1.0,
    };
    /// Pure 2-regret.
    pub const REGRET: RegretWeights = RegretWeights {
        regret: 1.0,
        objective: 0.0,
    };
    /// Equal blend of regret and insertion cost.
    pub const BALANCED: RegretWeights = RegretWeights {
        regret: 1.0,
        objective: 1.0,
    };
}

/// `k` distinct random nodes in random order.
pub fn random_path<R: Rng>(instance: &Instance, rng: &mut R) -> Vec<usize> {
    let mut nodes: Vec<usize> = (0..instance.n()).collect();
    nodes.shuffle(rng);
    nodes.truncate(instance.k());
    nodes
}

/// Builds the starting path for `strategy`.
pub fn initial_path<R: Rng>(
    instance: &Instance,
    strategy: StartStrategy,
    rng: &mut R,
) -> Vec<usize> {
    match strategy {
        StartStrategy::Random => random_path(instance, rng),
        StartStrategy::Greedy => {
            if instance.is_empty() {
                return Vec::new();
            }
            let start = rng.random_range(0..instance.n());
            regret_cycle(instance, start, RegretWeights::BALANCED).path
        }
    }
}

/// Cost of inserting `u` after position `after` of the cycle `cycle`.
#[inline]
fn insertion_cost(instance: &Instance, cycle: &[usize], after: usize, u: usize) -> i64 {
    match cycle.len() {
        0 => instance.cost(u),
        1 => 2 * instance.dist(cycle[0], u) + instance.cost(u),
        len => {
            let a = cycle[after];
            let b = cycle[(after + 1) % len];
            instance.dist(a, u) + instance.dist(u, b) - instance.dist(a, b) + instance.cost(u)
        }
    }
}

/// Cheapest insertion of `u` into `cycle`: `(cost, after)`.
fn cheapest_position(instance: &Instance, cycle: &[usize], u: usize) -> (i64, usize) {
    let slots = cycle.len().max(1);
    (0..slots)
        .map(|after| (insertion_cost(instance, cycle, after, u), after))
        .min()
        .unwrap_or((instance.cost(u), 0))
}

fn insert_after(cycle: &mut Vec<usize>, after: usize, u: usize) {
    if cycle.is_empty() {
        cycle.push(u);
    } else {
        cycle.insert(after + 1, u);
    }
}

/// One cheapest-insertion step over every node not in `in_cycle`.
/// Returns `false` when no node is left to insert.
fn insert_cheapest(instance: &Instance, cycle: &mut Vec<usize>, in_cycle: &mut [bool]) -> bool {
    let best = (0..instance.n())
        .filter(|&u| !in_cycle[u])
        .map(|u| {
            let (cost, after) = cheapest_position(instance, cycle, u);
            (cost, u, after)
        })
        .min();
    match best {
        Some((_, u, after)) => {
            insert_after(cycle, after, u);
            in_cycle[u] = true;
            true
        }
        None => false,
    }
}

/// Greedy repair: cheapest insertion into the cycle until it holds `k`
/// nodes. Nodes already in `partial` keep their relative order.
///
/// Deterministic; ties go to the smaller insertion cost, then the smaller
/// node id, then the earlier position.
pub fn repair(instance: &Instance, mut partial: Vec<usize>) -> Vec<usize> {
    let mut in_cycle = vec![false; instance.n()];
    for &v in &partial {
        in_cycle[v] = true;
    }
    while partial.len() < instance.k() {
        if !insert_cheapest(instance, &mut partial, &mut in_cycle) {
            break;
        }
    }
    partial
}

/// Cheapest-insertion cycle grown from `start`.
pub fn greedy_cycle(instance: &Instance, start: usize) -> Solution {
    regret_cycle(instance, start, RegretWeights::GREEDY)
}

/// Weighted 2-regret cycle construction from `start`.
///
/// The second node minimises `2 * D + C` (the true cost of a two-node
/// cycle) and the third is the cheapest insertion. From then on every
/// unselected node is scored with its best and second-best insertion cost
/// and the highest score wins, ties going to the cheaper insertion.
pub fn regret_cycle(instance: &Instance, start: usize, weights: RegretWeights) -> Solution {
    let k = instance.k();
    let mut cycle = Vec::with_capacity(k);
    if k == 0 {
        return Solution::empty();
    }
    let mut in_cycle = vec![false; instance.n()];
    cycle.push(start);
    in_cycle[start] = true;

    while cycle.len() < k.min(3) {
        if !insert_cheapest(instance, &mut cycle, &mut in_cycle) {
            break;
        }
    }

    while cycle.len() < k {
        let mut chosen: Option<(f64, i64, usize, usize)> = None;
        for u in (0..instance.n()).filter(|&u| !in_cycle[u]) {
            let mut best = (i64::MAX, 0);
            let mut second = i64::MAX;
            for after in 0..cycle.len() {
                let cost = insertion_cost(instance, &cycle, after, u);
                if cost < best.0 {
                    second = best.0;
                    best = (cost, after);
                } else if cost < second {
                    second = cost;
                }
            }
            let regret = if second == i64::MAX {
                0
            } else {
                second - best.0
            };
            let score = weights.regret * regret as f64 - weights.objective * best.0 as f64;
            let better = match chosen {
                None => true,
                Some((s, c, _, _)) => score > s || (score == s && best.0 < c),
            };
            if better {
                chosen = Some((score, best.0, u, best.1));
            }
        }
        let Some((_, _, u, after)) = chosen else {
            break;
        };
        insert_after(&mut cycle, after, u);
        in_cycle[u] = true;
    }

    Solution::new(instance, cycle)
}

/// Nearest-neighbour construction that may insert at either end of the
/// open path or between any two consecutive nodes, whichever adds the
/// least distance plus node cost. The result is closed into a cycle.
pub fn nearest_neighbor_any_position(instance: &Instance, start: usize) -> Solution {
    let k = instance.k();
    if k == 0 {
        return Solution::empty();
    }
    let mut path = Vec::with_capacity(k);
    let mut in_path = vec![false; instance.n()];
    path.push(start);
    in_path[start] = true;

    while path.len() < k {
        let mut best: Option<(i64, usize, usize)> = None;
        for u in (0..instance.n()).filter(|&u| !in_path[u]) {
            let first = path[0];
            let last = path[path.len() - 1];
            let mut options = vec![
                (instance.dist(u, first) + instance.cost(u), 0),
                (instance.dist(last, u) + instance.cost(u), path.len()),
            ];
            for at in 1..path.len() {
                let (a, b) = (path[at - 1], path[at]);
                let added = instance.dist(a, u) + instance.dist(u, b) - instance.dist(a, b);
                options.push((added + instance.cost(u), at));
            }
            if let Some(&(cost, at)) = options.iter().min_by_key(|&&(cost, _)| cost) {
                if best.is_none_or(|(c, _, _)| cost < c) {
                    best = Some((cost, u, at));
                }
            }
        }
        let Some((_, u, at)) = best else {
            break;
        };
        path.insert(at, u);
        in_path[u] = true;
    }

    Solution::new(instance, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{random_instance, rng};

    #[test]
    fn test_random_path_is_feasible() {
        let instance = random_instance(31, 1);
        let path = random_path(&instance, &mut rng(1));
        assert!(instance.check_path(&path).is_ok());
    }

    #[test]
    fn test_builders_are_feasible() {
        let instance = random_instance(41, 2);
        for start in [0, 17, 40] {
            for solution in [
                greedy_cycle(&instance, start),
                regret_cycle(&instance, start, RegretWeights::BALANCED),
                regret_cycle(&instance, start, RegretWeights::REGRET),
                nearest_neighbor_any_position(&instance, start),
            ] {
                assert!(instance.check_path(&solution.path).is_ok());
                assert_eq!(solution.objective, instance.objective(&solution.path));
                assert!(solution.path.contains(&start));
            }
        }
    }

    #[test]
    fn test_second_node_minimises_two_node_cycle() {
        // Node 1 is closer, but its cost makes the cycle 0-1-0 dearer than 0-2-0.
        let instance = Instance::from_coordinates(
            &[(0, 0), (1, 0), (5, 0), (100, 0)],
            vec![0, 20, 0, 0],
        )
        .unwrap();
        let solution = greedy_cycle(&instance, 0);
        assert_eq!(solution.path, vec![0, 2]);
        assert_eq!(solution.objective, 10);
    }

    #[test]
    fn test_greedy_beats_random_on_average() {
        let instance = random_instance(60, 3);
        let greedy = greedy_cycle(&instance, 0).objective;
        let mut r = rng(3);
        let random_mean: i64 = (0..20)
            .map(|_| instance.objective(&random_path(&instance, &mut r)))
            .sum::<i64>()
            / 20;
        assert!(
            greedy < random_mean,
            "greedy {greedy} should beat random mean {random_mean}"
        );
    }

    #[test]
    fn test_repair_fills_to_k_and_keeps_order() {
        let instance = random_instance(30, 4);
        let partial = vec![7, 3, 12];
        let repaired = repair(&instance, partial.clone());
        assert!(instance.check_path(&repaired).is_ok());
        let kept: Vec<usize> = repaired
            .iter()
            .copied()
            .filter(|v| partial.contains(v))
            .collect();
        let rotation = kept.iter().position(|&v| v == 7).unwrap();
        let mut rotated = kept[rotation..].to_vec();
        rotated.extend_from_slice(&kept[..rotation]);
        assert_eq!(rotated, partial);
    }

    #[test]
    fn test_repair_from_empty() {
        let instance = random_instance(9, 5);
        let repaired = repair(&instance, Vec::new());
        assert!(instance.check_path(&repaired).is_ok());
    }

    #[test]
    fn test_degenerate_sizes() {
        let empty = Instance::new(Vec::new(), Vec::new()).unwrap();
        let path = initial_path(&empty, StartStrategy::Greedy, &mut rng(0));
        assert!(path.is_empty());
        assert!(random_path(&empty, &mut rng(0)).is_empty());

        let single = Instance::new(vec![vec![0]], vec![4]).unwrap();
        let solution = greedy_cycle(&single, 0);
        assert_eq!(solution.path, vec![0]);
        assert_eq!(solution.objective, 4);
    }
}

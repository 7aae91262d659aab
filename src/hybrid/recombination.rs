//! Recombination operators.

use super::config::Recombination;
use crate::construction::repair;
use crate::instance::Instance;
use crate::similarity::{cycle_edges, undirected};
use rand::seq::SliceRandom;
use rand::Rng;

/// Offspring of `a` and `b` under `operator`.
pub fn recombine<R: Rng>(
    instance: &Instance,
    operator: Recombination,
    a: &[usize],
    b: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    match operator {
        Recombination::CommonSubpaths => common_subpaths(instance, a, b, rng),
        Recombination::CommonNodesRepair => common_nodes_repair(instance, a, b, rng),
    }
}

/// Maximal runs of `a` whose nodes and consecutive edges also appear in
/// `b`. The run crossing the end of `a` is joined into one.
fn shared_runs(instance: &Instance, a: &[usize], b: &[usize]) -> Vec<Vec<usize>> {
    let mut in_b = vec![false; instance.n()];
    for &v in b {
        in_b[v] = true;
    }
    let b_edges = cycle_edges(b);

    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut run: Vec<usize> = Vec::new();
    for &v in a {
        if !in_b[v] {
            if !run.is_empty() {
                runs.push(std::mem::take(&mut run));
            }
            continue;
        }
        if let Some(&last) = run.last() {
            if !b_edges.contains(&undirected(last, v)) {
                runs.push(std::mem::take(&mut run));
            }
        }
        run.push(v);
    }
    if !run.is_empty() {
        runs.push(run);
    }

    if runs.len() > 1 {
        let seam = (a.first(), a.last());
        let ends = (runs[0].first(), runs[runs.len() - 1].last());
        if let ((Some(&head), Some(&tail)), (Some(&first), Some(&last))) = (seam, ends) {
            if head == first && tail == last && b_edges.contains(&undirected(last, first)) {
                let front = runs.remove(0);
                if let Some(back) = runs.last_mut() {
                    back.extend(front);
                }
            }
        }
    }
    runs
}

/// Keeps every sub-path shared by both parents, reversing each with
/// probability 1/2, adds random unused nodes as one-node pieces until the
/// pieces hold `k` nodes, and chains all pieces in random order.
pub fn common_subpaths<R: Rng>(
    instance: &Instance,
    a: &[usize],
    b: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let k = instance.k();
    let mut pieces = shared_runs(instance, a, b);
    let mut used = vec![false; instance.n()];
    let mut count = 0;
    for piece in &mut pieces {
        if rng.random_bool(0.5) {
            piece.reverse();
        }
        for &v in piece.iter() {
            used[v] = true;
        }
        count += piece.len();
    }

    let mut pool: Vec<usize> = (0..instance.n()).filter(|&v| !used[v]).collect();
    pool.shuffle(rng);
    let fill = k.saturating_sub(count);
    pieces.extend(pool.into_iter().take(fill).map(|v| vec![v]));
    pieces.shuffle(rng);

    let mut path: Vec<usize> = pieces.into_iter().flatten().collect();
    path.truncate(k);
    path
}

/// Restricts a random parent to the nodes the other parent also selects,
/// keeping its order, and completes it by cheapest insertion.
pub fn common_nodes_repair<R: Rng>(
    instance: &Instance,
    a: &[usize],
    b: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let (base, other) = if rng.random_bool(0.5) { (a, b) } else { (b, a) };
    let mut in_other = vec![false; instance.n()];
    for &v in other {
        in_other[v] = true;
    }
    let partial = base.iter().copied().filter(|&v| in_other[v]).collect();
    repair(instance, partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::random_path;
    use crate::similarity::{common_edges, common_nodes};
    use crate::test_utils::{random_instance, rng};
    use proptest::prelude::*;

    #[test]
    fn test_shared_runs_join_across_seam() {
        let instance = random_instance(12, 1);
        let a = [0, 1, 2, 3, 4, 5];
        let b = [1, 0, 5, 9, 2, 3, 4, 8];
        // Shared edges: {0,1} {5,0} {2,3} {3,4}; {1,2} and {4,5} are not.
        let runs = shared_runs(&instance, &a, &b);
        assert_eq!(runs, vec![vec![2, 3, 4], vec![5, 0, 1]]);
    }

    #[test]
    fn test_identical_parents_reproduce_the_cycle() {
        let instance = random_instance(20, 2);
        let a = random_path(&instance, &mut rng(2));
        for seed in 0..10 {
            let child = common_subpaths(&instance, &a, &a, &mut rng(seed));
            assert_eq!(common_nodes(&child, &a), a.len());
            assert_eq!(common_edges(&child, &a), a.len());
        }
    }

    #[test]
    fn test_common_subpaths_keeps_shared_edges() {
        let instance = random_instance(40, 3);
        let mut r = rng(3);
        let a = random_path(&instance, &mut r);
        let mut b = a.clone();
        b.rotate_left(5);
        b[..3].reverse();
        let child = common_subpaths(&instance, &a, &b, &mut r);
        assert!(instance.check_path(&child).is_ok());
        // Shared runs survive intact, only their joints may change.
        let runs = shared_runs(&instance, &a, &b);
        let inner: usize = runs.iter().map(|run| run.len() - 1).sum();
        assert!(inner > 0);
        assert!(common_edges(&child, &a) >= inner);
    }

    #[test]
    fn test_common_nodes_repair_keeps_common_nodes() {
        let instance = random_instance(30, 4);
        let mut r = rng(4);
        let a = random_path(&instance, &mut r);
        let b = random_path(&instance, &mut r);
        let child = common_nodes_repair(&instance, &a, &b, &mut r);
        assert!(instance.check_path(&child).is_ok());
        for v in a.iter().filter(|v| b.contains(v)) {
            assert!(child.contains(v), "common node {v} lost");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_offspring_are_feasible(seed in 0u64..5_000, n in 1usize..50, op in 0usize..2) {
            let instance = random_instance(n, seed);
            let mut r = rng(seed);
            let a = random_path(&instance, &mut r);
            let b = random_path(&instance, &mut r);
            let operator = [
                Recombination::CommonSubpaths,
                Recombination::CommonNodesRepair,
            ][op];
            let child = recombine(&instance, operator, &a, &b, &mut r);
            prop_assert!(instance.check_path(&child).is_ok());
        }
    }
}

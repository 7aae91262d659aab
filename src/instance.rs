//! Problem instance: distance matrix, node costs and selection size.

use crate::error::{Error, Result};

/// Largest accepted difference between `D[i][j]` and `D[j][i]` for
/// [`Instance::new`]. Matrices built from rounded Euclidean distances can
/// disagree by one unit.
pub const DEFAULT_SYMMETRY_TOLERANCE: i64 = 1;

/// An immutable selective-TSP instance.
///
/// Holds `n` nodes, a row-major `n × n` distance matrix and one cost per
/// node. A feasible tour selects exactly [`k`](Self::k) `= ceil(n / 2)` of
/// the nodes. The instance is validated once on construction and is
/// read-only afterwards, so it can be shared between concurrent runs.
///
/// # Examples
///
/// ```
/// use u_selective_tsp::Instance;
///
/// let instance = Instance::new(
///     vec![vec![0, 3, 4], vec![3, 0, 5], vec![4, 5, 0]],
///     vec![1, 2, 3],
/// ).unwrap();
/// assert_eq!(instance.n(), 3);
/// assert_eq!(instance.k(), 2);
/// assert_eq!(instance.objective(&[0, 1]), 3 + 3 + 1 + 2);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    n: usize,
    k: usize,
    distances: Vec<i64>,
    costs: Vec<i64>,
}

impl Instance {
    /// Builds an instance, tolerating asymmetry up to
    /// [`DEFAULT_SYMMETRY_TOLERANCE`].
    pub fn new(distances: Vec<Vec<i64>>, costs: Vec<i64>) -> Result<Self> {
        Self::with_tolerance(distances, costs, DEFAULT_SYMMETRY_TOLERANCE)
    }

    /// Builds an instance with an explicit symmetry tolerance.
    ///
    /// A tolerance of 0 requires an exactly symmetric matrix. Accepted
    /// asymmetries are resolved in favour of the upper triangle, so the
    /// stored matrix is always exactly symmetric and reversing a path
    /// segment never changes its length.
    ///
    /// # Errors
    ///
    /// Returns a shape error when the matrix is not square, the cost vector
    /// has the wrong length, a diagonal entry is non-zero, any distance or
    /// cost is negative, or `|D[i][j] - D[j][i]|` exceeds `tolerance`.
    pub fn with_tolerance(
        distances: Vec<Vec<i64>>,
        costs: Vec<i64>,
        tolerance: i64,
    ) -> Result<Self> {
        let n = distances.len();
        let tolerance = tolerance.max(0);

        if let Some((row, r)) = distances.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(Error::NotSquare {
                row,
                len: r.len(),
                expected: n,
            });
        }
        if costs.len() != n {
            return Err(Error::CostLength {
                expected: n,
                got: costs.len(),
            });
        }
        if let Some((index, &value)) = costs.iter().enumerate().find(|&(_, &c)| c < 0) {
            return Err(Error::NegativeCost { index, value });
        }

        let mut flat: Vec<i64> = distances.into_iter().flatten().collect();
        for from in 0..n {
            for to in 0..n {
                let value = flat[from * n + to];
                if from == to && value != 0 {
                    return Err(Error::NonZeroDiagonal { index: from, value });
                }
                if value < 0 {
                    return Err(Error::NegativeDistance { from, to, value });
                }
            }
        }
        for from in 0..n {
            for to in from + 1..n {
                let forward = flat[from * n + to];
                let backward = flat[to * n + from];
                if (forward - backward).abs() > tolerance {
                    return Err(Error::Asymmetric {
                        from,
                        to,
                        forward,
                        backward,
                        tolerance,
                    });
                }
                flat[to * n + from] = forward;
            }
        }

        Ok(Self {
            n,
            k: n.div_ceil(2),
            distances: flat,
            costs,
        })
    }

    /// Builds an instance from planar integer coordinates, using Euclidean
    /// distances rounded to the nearest integer.
    pub fn from_coordinates(points: &[(i64, i64)], costs: Vec<i64>) -> Result<Self> {
        let distances = points
            .iter()
            .map(|&(x1, y1)| {
                points
                    .iter()
                    .map(|&(x2, y2)| {
                        let dx = (x2 - x1) as f64;
                        let dy = (y2 - y1) as f64;
                        (dx * dx + dy * dy).sqrt().round() as i64
                    })
                    .collect()
            })
            .collect();
        Self::with_tolerance(distances, costs, 0)
    }

    /// Total number of nodes.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of nodes every tour must select.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn dist(&self, from: usize, to: usize) -> i64 {
        self.distances[from * self.n + to]
    }

    #[inline]
    pub fn cost(&self, node: usize) -> i64 {
        self.costs[node]
    }

    pub fn costs(&self) -> &[i64] {
        &self.costs
    }

    /// Objective of a cyclic path computed from scratch: the distances of
    /// every consecutive pair (last back to first) plus the cost of every
    /// node on the path.
    ///
    /// This is the oracle that every incrementally tracked objective must
    /// agree with.
    pub fn objective(&self, path: &[usize]) -> i64 {
        let Some(&last) = path.last() else {
            return 0;
        };
        let mut prev = last;
        let mut total = 0;
        for &node in path {
            total += self.dist(prev, node) + self.cost(node);
            prev = node;
        }
        total
    }

    /// Checks that `path` is a feasible tour: exactly `k` distinct nodes,
    /// all in `0..n`.
    pub fn check_path(&self, path: &[usize]) -> Result<()> {
        if path.len() != self.k {
            return Err(Error::invalid_path(format!(
                "expected {} nodes, got {}",
                self.k,
                path.len()
            )));
        }
        let mut seen = vec![false; self.n];
        for &node in path {
            if node >= self.n {
                return Err(Error::invalid_path(format!(
                    "node {node} out of range for {} nodes",
                    self.n
                )));
            }
            if std::mem::replace(&mut seen[node], true) {
                return Err(Error::invalid_path(format!("node {node} appears twice")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec<i64>> {
        vec![vec![0, 3, 4], vec![3, 0, 5], vec![4, 5, 0]]
    }

    #[test]
    fn test_selection_size_is_half_rounded_up() {
        for (n, k) in [(0, 0), (1, 1), (2, 1), (3, 2), (4, 2), (5, 3), (200, 100)] {
            let instance = Instance::new(vec![vec![0; n]; n], vec![0; n]).unwrap();
            assert_eq!(instance.k(), k, "n = {n}");
        }
    }

    #[test]
    fn test_rejects_ragged_matrix() {
        let err = Instance::new(vec![vec![0, 1], vec![1]], vec![0, 0]).unwrap_err();
        assert_eq!(
            err,
            Error::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_rejects_cost_length_mismatch() {
        let err = Instance::new(triangle(), vec![1, 2]).unwrap_err();
        assert_eq!(
            err,
            Error::CostLength {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_rejects_negative_values() {
        let err = Instance::new(triangle(), vec![1, -2, 3]).unwrap_err();
        assert_eq!(
            err,
            Error::NegativeCost {
                index: 1,
                value: -2
            }
        );

        let mut d = triangle();
        d[0][2] = -4;
        d[2][0] = -4;
        let err = Instance::new(d, vec![0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            Error::NegativeDistance {
                from: 0,
                to: 2,
                value: -4
            }
        );
    }

    #[test]
    fn test_rejects_nonzero_diagonal() {
        let mut d = triangle();
        d[1][1] = 7;
        let err = Instance::new(d, vec![0, 0, 0]).unwrap_err();
        assert_eq!(err, Error::NonZeroDiagonal { index: 1, value: 7 });
    }

    #[test]
    fn test_symmetry_tolerance() {
        let mut d = triangle();
        d[0][1] = 4;
        let relaxed = Instance::new(d.clone(), vec![0, 0, 0]).unwrap();
        assert_eq!(relaxed.dist(0, 1), 4);
        assert_eq!(relaxed.dist(1, 0), 4);
        assert!(matches!(
            Instance::with_tolerance(d.clone(), vec![0, 0, 0], 0),
            Err(Error::Asymmetric { from: 0, to: 1, .. })
        ));

        d[0][1] = 6;
        assert!(matches!(
            Instance::new(d, vec![0, 0, 0]),
            Err(Error::Asymmetric {
                forward: 6,
                backward: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_objective_oracle() {
        let instance = Instance::new(triangle(), vec![1, 2, 3]).unwrap();
        assert_eq!(instance.objective(&[]), 0);
        assert_eq!(instance.objective(&[2]), 3);
        assert_eq!(instance.objective(&[0, 2]), 4 + 4 + 1 + 3);
        assert_eq!(instance.objective(&[0, 1, 2]), 3 + 5 + 4 + 6);
    }

    #[test]
    fn test_from_coordinates_rounds() {
        let instance =
            Instance::from_coordinates(&[(0, 0), (1, 1), (3, 4)], vec![0, 0, 0]).unwrap();
        assert_eq!(instance.dist(0, 1), 1);
        assert_eq!(instance.dist(0, 2), 5);
        assert_eq!(instance.dist(1, 2), 4);
        assert_eq!(instance.dist(2, 1), 4);
    }

    #[test]
    fn test_check_path() {
        let instance = Instance::new(triangle(), vec![0, 0, 0]).unwrap();
        assert!(instance.check_path(&[2, 0]).is_ok());
        assert!(instance.check_path(&[2]).is_err());
        assert!(instance.check_path(&[2, 2]).is_err());
        assert!(instance.check_path(&[0, 3]).is_err());
    }
}

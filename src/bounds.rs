//! Per-variable bounds implied by a partition.

use crate::partition::Partition;
use crate::traits::StructuredProblem;
use crate::utils::clip;

/// Concrete `(lower, upper)` box of every variable under one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundAssignment {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl BoundAssignment {
    /// Derive every variable's box from its segment in `partition`.
    pub fn from_partition<P: StructuredProblem>(problem: &P, partition: &Partition) -> Self {
        let n = problem.num_vars();
        let mut lower = Vec::with_capacity(n);
        let mut upper = Vec::with_capacity(n);
        for var in 0..n {
            let (lo, up) = problem.segment_bounds(partition.segment_of(var), var);
            lower.push(lo);
            upper.push(up);
        }
        Self { lower, upper }
    }

    /// Move a single variable into `segment`, returning its previous box.
    pub fn reassign<P: StructuredProblem>(
        &mut self,
        problem: &P,
        var: usize,
        segment: usize,
    ) -> (f64, f64) {
        let (lo, up) = problem.segment_bounds(segment, var);
        let old = (self.lower[var], self.upper[var]);
        self.lower[var] = lo;
        self.upper[var] = up;
        old
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower_sum(&self) -> f64 {
        self.lower.iter().sum()
    }

    pub fn upper_sum(&self) -> f64 {
        self.upper.iter().sum()
    }

    /// Clamp `value` into the box of `var`.
    #[inline]
    pub fn clip(&self, var: usize, value: f64) -> f64 {
        clip(value, self.lower[var], self.upper[var])
    }

    /// Allocation `x_i = clip(λ - b_i, lower_i, upper_i)` for multiplier `λ`.
    pub fn allocate<P: StructuredProblem>(&self, problem: &P, multiplier: f64) -> Vec<f64> {
        (0..self.len())
            .map(|var| self.clip(var, multiplier - problem.shift(var)))
            .collect()
    }
}

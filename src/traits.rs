//! Core trait describing a structured resource-allocation instance.
//!
//! The solver works on problems of the form
//!
//! ```text
//!     minimize    Σ (x_i + b_i)²
//!     subject to  Σ x_i = R
//!                 x_i ∈ [l_{i,0}, u_{i,0}] ∪ … ∪ [l_{i,m-1}, u_{i,m-1}]
//! ```
//!
//! where the segments are ordered and disjoint, and all bounds except the
//! outermost ones are shared between variables. Implement
//! [`StructuredProblem`] to hand such an instance to
//! [`RapEngine`](crate::engine::RapEngine); [`Instance`](crate::instance::Instance)
//! is the ready-made implementation built from plain vectors.

/// A quadratic resource-allocation instance with structured disjoint intervals.
///
/// Contract (checked by [`validate`](crate::validate::check_preconditions)
/// unless validation is disabled):
/// - `num_segments() >= 1`;
/// - shifts are non-increasing in the variable index;
/// - for every variable, segments are non-empty and ordered:
///   `upper(j) <= lower(j + 1)`;
/// - for `j >= 1` the lower bound of segment `j` is the same for all variables,
///   and for `j <= m - 2` the upper bound of segment `j` is the same for all
///   variables.
///
/// The engine additionally assumes the nesting conditions under which an
/// optimal solution assigns variables with larger shifts to lower segments.
/// Those conditions are the caller's responsibility.
pub trait StructuredProblem {
    /// Number of decision variables `n`.
    fn num_vars(&self) -> usize;

    /// Number of interval segments `m` available to every variable.
    fn num_segments(&self) -> usize;

    /// Total resource `R` the allocation must sum to.
    fn resource(&self) -> f64;

    /// Objective shift `b_i` of variable `var`.
    fn shift(&self, var: usize) -> f64;

    /// Closed bounds `(lower, upper)` of `segment` for variable `var`.
    fn segment_bounds(&self, segment: usize, var: usize) -> (f64, f64);

    /// Objective value `Σ (x_i + b_i)²` of an allocation.
    fn objective(&self, allocation: &[f64]) -> f64 {
        allocation
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let shifted = x + self.shift(i);
                shifted * shifted
            })
            .sum()
    }

    /// Whether `value` lies in one of the segments of variable `var`.
    fn contains(&self, var: usize, value: f64) -> bool {
        (0..self.num_segments()).any(|segment| {
            let (lower, upper) = self.segment_bounds(segment, var);
            lower <= value && value <= upper
        })
    }
}

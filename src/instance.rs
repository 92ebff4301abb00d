//! Vector-backed instance with shared middle bounds.
//!
//! Segment layout for `m = lower_fixed.len() + 1` segments:
//! - segment `0`: `[lower_var[i], upper_fixed[0]]`
//! - segment `j` (`1 <= j <= m - 2`): `[lower_fixed[j - 1], upper_fixed[j]]`
//! - segment `m - 1`: `[lower_fixed[m - 2], upper_var[i]]`
//!
//! With a single segment (`m = 1`, both fixed vectors empty) every variable
//! is simply boxed in `[lower_var[i], upper_var[i]]`.

use crate::error::PreconditionViolation;
use crate::traits::StructuredProblem;

#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    resource: f64,
    shifts: Vec<f64>,
    lower_fixed: Vec<f64>,
    upper_fixed: Vec<f64>,
    lower_var: Vec<f64>,
    upper_var: Vec<f64>,
}

impl Instance {
    /// Build an instance, checking only that the vectors have consistent shapes.
    ///
    /// Value-level preconditions (ordering, finiteness) are checked by the
    /// engine when validation is enabled.
    pub fn new(
        resource: f64,
        shifts: Vec<f64>,
        lower_fixed: Vec<f64>,
        upper_fixed: Vec<f64>,
        lower_var: Vec<f64>,
        upper_var: Vec<f64>,
    ) -> Result<Self, PreconditionViolation> {
        if lower_fixed.len() != upper_fixed.len() {
            return Err(PreconditionViolation::FixedBoundLength {
                lower: lower_fixed.len(),
                upper: upper_fixed.len(),
            });
        }
        if lower_var.len() != shifts.len() || upper_var.len() != shifts.len() {
            return Err(PreconditionViolation::VariableLength {
                shifts: shifts.len(),
                lower: lower_var.len(),
                upper: upper_var.len(),
            });
        }
        Ok(Self {
            resource,
            shifts,
            lower_fixed,
            upper_fixed,
            lower_var,
            upper_var,
        })
    }

    pub fn shifts(&self) -> &[f64] {
        &self.shifts
    }

    pub fn lower_fixed(&self) -> &[f64] {
        &self.lower_fixed
    }

    pub fn upper_fixed(&self) -> &[f64] {
        &self.upper_fixed
    }

    pub fn lower_var(&self) -> &[f64] {
        &self.lower_var
    }

    pub fn upper_var(&self) -> &[f64] {
        &self.upper_var
    }

    /// Same instance with a different resource value.
    pub fn with_resource(mut self, resource: f64) -> Self {
        self.resource = resource;
        self
    }
}

impl StructuredProblem for Instance {
    #[inline]
    fn num_vars(&self) -> usize {
        self.shifts.len()
    }

    #[inline]
    fn num_segments(&self) -> usize {
        self.lower_fixed.len() + 1
    }

    #[inline]
    fn resource(&self) -> f64 {
        self.resource
    }

    #[inline]
    fn shift(&self, var: usize) -> f64 {
        self.shifts[var]
    }

    fn segment_bounds(&self, segment: usize, var: usize) -> (f64, f64) {
        let last = self.lower_fixed.len();
        debug_assert!(segment <= last, "segment {segment} out of range");
        let lower = if segment == 0 {
            self.lower_var[var]
        } else {
            self.lower_fixed[segment - 1]
        };
        let upper = if segment == last {
            self.upper_var[var]
        } else {
            self.upper_fixed[segment]
        };
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_segments() -> Instance {
        Instance::new(
            0.0,
            vec![2.0, 1.0],
            vec![3.0, 8.0],
            vec![1.0, 5.0],
            vec![-2.0, -1.0],
            vec![10.0, 12.0],
        )
        .unwrap()
    }

    #[test]
    fn segment_layout_follows_shared_bounds() {
        let inst = three_segments();
        assert_eq!(inst.num_segments(), 3);
        assert_eq!(inst.segment_bounds(0, 0), (-2.0, 1.0));
        assert_eq!(inst.segment_bounds(0, 1), (-1.0, 1.0));
        assert_eq!(inst.segment_bounds(1, 0), (3.0, 5.0));
        assert_eq!(inst.segment_bounds(1, 1), (3.0, 5.0));
        assert_eq!(inst.segment_bounds(2, 0), (8.0, 10.0));
        assert_eq!(inst.segment_bounds(2, 1), (8.0, 12.0));
    }

    #[test]
    fn single_segment_uses_variable_bounds() {
        let inst = Instance::new(
            4.0,
            vec![3.0, 1.0],
            vec![],
            vec![],
            vec![-5.0, -5.0],
            vec![5.0, 6.0],
        )
        .unwrap();
        assert_eq!(inst.num_segments(), 1);
        assert_eq!(inst.segment_bounds(0, 1), (-5.0, 6.0));
    }

    #[test]
    fn shape_mismatches_are_rejected() {
        let err = Instance::new(12.0, vec![0.0; 3], vec![], vec![5.0], vec![0.0; 3], vec![10.0; 3])
            .unwrap_err();
        assert_eq!(
            err,
            PreconditionViolation::FixedBoundLength { lower: 0, upper: 1 }
        );

        let err = Instance::new(0.0, vec![0.0; 2], vec![], vec![], vec![0.0; 3], vec![1.0; 2])
            .unwrap_err();
        assert!(matches!(
            err,
            PreconditionViolation::VariableLength { shifts: 2, lower: 3, upper: 2 }
        ));
    }
}

//! Boundary validation of [`StructuredProblem`] preconditions.
//!
//! The sweep silently returns wrong answers on malformed input, so the engine
//! runs these checks before searching unless the caller opts out through
//! [`RapEngineBuilder::with_validation`](crate::builder::RapEngineBuilder::with_validation).

use crate::error::PreconditionViolation;
use crate::traits::StructuredProblem;

/// Check every precondition the sweep relies on, except the nesting
/// conditions on interval lengths.
///
/// Runs in `O(n · m)`.
pub fn check_preconditions<P: StructuredProblem>(problem: &P) -> Result<(), PreconditionViolation> {
    let n = problem.num_vars();
    let m = problem.num_segments();
    if m == 0 {
        return Err(PreconditionViolation::NoSegments);
    }

    finite("resource", 0, problem.resource())?;
    check_shifts(problem)?;

    for var in 0..n {
        let mut previous_upper: Option<f64> = None;
        for segment in 0..m {
            let (lower, upper) = problem.segment_bounds(segment, var);
            finite("segment_lower", segment, lower)?;
            finite("segment_upper", segment, upper)?;
            if lower > upper {
                return Err(PreconditionViolation::EmptySegment {
                    var,
                    segment,
                    lower,
                    upper,
                });
            }
            if let Some(prev) = previous_upper {
                if prev > lower {
                    return Err(PreconditionViolation::OverlappingSegments {
                        var,
                        segment: segment - 1,
                        upper: prev,
                        next_lower: lower,
                    });
                }
            }
            previous_upper = Some(upper);
        }
    }

    check_shared_bounds(problem)
}

fn finite(field: &'static str, index: usize, value: f64) -> Result<(), PreconditionViolation> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PreconditionViolation::NonFinite {
            field,
            index,
            value,
        })
    }
}

fn check_shifts<P: StructuredProblem>(problem: &P) -> Result<(), PreconditionViolation> {
    let mut previous = f64::INFINITY;
    for index in 0..problem.num_vars() {
        let value = problem.shift(index);
        finite("shift", index, value)?;
        if value > previous {
            return Err(PreconditionViolation::UnsortedShifts {
                index,
                previous,
                value,
            });
        }
        previous = value;
    }
    Ok(())
}

fn check_shared_bounds<P: StructuredProblem>(problem: &P) -> Result<(), PreconditionViolation> {
    let m = problem.num_segments();
    if problem.num_vars() == 0 {
        return Ok(());
    }
    for segment in 0..m {
        let (lower_0, upper_0) = problem.segment_bounds(segment, 0);
        for var in 1..problem.num_vars() {
            let (lower, upper) = problem.segment_bounds(segment, var);
            if segment >= 1 && lower != lower_0 {
                return Err(PreconditionViolation::UnsharedBound {
                    side: "lower",
                    segment,
                    var,
                    value: lower,
                    expected: lower_0,
                });
            }
            if segment + 1 < m && upper != upper_0 {
                return Err(PreconditionViolation::UnsharedBound {
                    side: "upper",
                    segment,
                    var,
                    value: upper,
                    expected: upper_0,
                });
            }
        }
    }
    Ok(())
}

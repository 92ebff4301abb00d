//! Error types returned by the solver.

use thiserror::Error;

/// Outcome of a solve that did not produce an allocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// No segment assignment admits an allocation summing to the resource.
    #[error("instance is infeasible: no segment assignment can reach the resource value")]
    Infeasible,
    /// The instance failed boundary validation.
    #[error("precondition violated: {0}")]
    PreconditionViolated(#[from] PreconditionViolation),
}

/// A violated input precondition, detected before any search is run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionViolation {
    #[error("fixed bound vectors differ in length: {lower} shared lower bounds vs {upper} shared upper bounds")]
    FixedBoundLength { lower: usize, upper: usize },

    #[error("per-variable vectors differ in length: {shifts} shifts, {lower} lower bounds, {upper} upper bounds")]
    VariableLength {
        shifts: usize,
        lower: usize,
        upper: usize,
    },

    #[error("instance must have at least one interval segment")]
    NoSegments,

    #[error("{field}[{index}] = {value} is not finite")]
    NonFinite {
        field: &'static str,
        index: usize,
        value: f64,
    },

    #[error("shifts must be non-increasing, but shift[{index}] = {value} exceeds shift[{}] = {previous}", .index - 1)]
    UnsortedShifts {
        index: usize,
        previous: f64,
        value: f64,
    },

    #[error("segment {segment} of variable {var} is empty: lower {lower} > upper {upper}")]
    EmptySegment {
        var: usize,
        segment: usize,
        lower: f64,
        upper: f64,
    },

    #[error("segments {segment} and {} of variable {var} overlap: upper {upper} > next lower {next_lower}", .segment + 1)]
    OverlappingSegments {
        var: usize,
        segment: usize,
        upper: f64,
        next_lower: f64,
    },

    #[error("{side} bound of segment {segment} is not shared: variable {var} has {value}, variable 0 has {expected}")]
    UnsharedBound {
        side: &'static str,
        segment: usize,
        var: usize,
        value: f64,
        expected: f64,
    },
}

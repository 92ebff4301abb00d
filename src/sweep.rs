//! Breakpoint sweep over the cursor positions of one trunk.
//!
//! For a fixed partition the optimal allocation is
//! `x_i = clip(λ - b_i, lower_i, upper_i)` for the multiplier `λ*` solving
//! `Σ x_i(λ) = R`. Every variable contributes a lower breakpoint
//! `lower_i + b_i` (below it, pinned at `lower_i`) and an upper breakpoint
//! `upper_i + b_i` (above it, pinned at `upper_i`). The sweep walks both
//! breakpoint sets in ascending order, keeping running totals so the resource
//! level at any candidate is available in O(1).
//!
//! Sliding the cursor moves one variable into a lower segment, which can only
//! lower the resource curve, so `λ*` is non-decreasing along the sweep. The
//! state therefore carries over between cursor positions: only the moved
//! variable is re-bounded and re-pushed, and its stale heap entries are
//! discarded lazily.
//!
//! The running totals accumulate rounding error over a trunk, so comparisons
//! against `R` that decide feasibility allow a slack proportional to the
//! magnitude of the data (see [`drift_tolerance`]).

use crate::bounds::BoundAssignment;
use crate::heap::BreakpointHeap;
use crate::partition::Partition;
use crate::traits::StructuredProblem;

/// Which piece of `clip(λ - b_i, lower_i, upper_i)` a variable is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    PinnedLow,
    Free,
    PinnedHigh,
}

/// Result of solving one cursor position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowOutcome {
    /// `Σ lower > R`: no multiplier works at this cursor position.
    Rejected,
    /// `Σ upper < R`: neither this nor any later cursor position can work.
    Exhausted,
    /// Optimal multiplier and objective for this cursor position.
    Solved { multiplier: f64, objective: f64 },
}

#[derive(Clone, Copy)]
enum Side {
    Lower,
    Upper,
}

pub(crate) struct TrunkSweep<'p, P: StructuredProblem> {
    problem: &'p P,
    resource: f64,
    partition: Partition,
    bounds: BoundAssignment,
    regime: Vec<Regime>,
    generation: Vec<u32>,
    lower_heap: BreakpointHeap,
    upper_heap: BreakpointHeap,
    /// Σ of bounds of pinned variables.
    bounded: f64,
    /// Σ b_i over free variables.
    free_shift_sum: f64,
    num_free: usize,
    /// Σ (bound_i + b_i)² over pinned variables.
    pinned_objective: f64,
    lower_sum: f64,
    upper_sum: f64,
    /// Slack for comparisons of running totals against `R`.
    tolerance: f64,
    /// Last breakpoint passed or multiplier found; never decreases.
    level: f64,
}

impl<'p, P: StructuredProblem> TrunkSweep<'p, P> {
    /// Start a sweep at `partition` with every variable pinned low.
    pub(crate) fn new(problem: &'p P, partition: Partition) -> Self {
        let n = problem.num_vars();
        let bounds = BoundAssignment::from_partition(problem, &partition);
        let lower_heap =
            BreakpointHeap::from_breakpoints((0..n).map(|i| bounds.lower[i] + problem.shift(i)));
        let upper_heap =
            BreakpointHeap::from_breakpoints((0..n).map(|i| bounds.upper[i] + problem.shift(i)));
        let pinned_objective = (0..n)
            .map(|i| {
                let bp = bounds.lower[i] + problem.shift(i);
                bp * bp
            })
            .sum();
        let lower_sum = bounds.lower_sum();
        let upper_sum = bounds.upper_sum();

        Self {
            problem,
            resource: problem.resource(),
            partition,
            regime: vec![Regime::PinnedLow; n],
            generation: vec![0; n],
            lower_heap,
            upper_heap,
            bounded: lower_sum,
            free_shift_sum: 0.0,
            num_free: 0,
            pinned_objective,
            lower_sum,
            upper_sum,
            tolerance: drift_tolerance(problem),
            level: f64::NEG_INFINITY,
            bounds,
        }
    }

    pub(crate) fn partition(&self) -> &Partition {
        &self.partition
    }

    #[cfg(test)]
    pub(crate) fn regime(&self, var: usize) -> Regime {
        self.regime[var]
    }

    /// Find `λ*` for the current cursor position.
    pub(crate) fn solve_window(&mut self) -> WindowOutcome {
        if self.lower_sum > self.resource + self.tolerance {
            return WindowOutcome::Rejected;
        }
        if self.upper_sum < self.resource - self.tolerance {
            return WindowOutcome::Exhausted;
        }

        let multiplier = loop {
            let lower = self.lower_heap.peek_valid(&self.generation);
            let upper = self.upper_heap.peek_valid(&self.generation);
            // On equal values the lower transition goes first, so a variable
            // with a degenerate box becomes free before it is pinned high.
            let (side, candidate) = match (lower, upper) {
                (Some(lo), Some(up)) if lo.breakpoint() <= up.breakpoint() => {
                    (Side::Lower, lo.breakpoint())
                }
                (_, Some(up)) => (Side::Upper, up.breakpoint()),
                (Some(lo), None) => (Side::Lower, lo.breakpoint()),
                (None, None) => {
                    // Everything is pinned high and Σ upper >= R.
                    #[cfg(feature = "tracing")]
                    tracing::trace!(level = self.level, "breakpoints exhausted");
                    break self.level;
                }
            };

            if self.num_free == 0 {
                // Fully pinned: the allocation is fixed, only a shortfall
                // beyond rounding needs another breakpoint.
                if self.bounded >= self.resource - self.tolerance {
                    assert!(
                        self.bounded <= self.resource + 4.0 * self.tolerance,
                        "resource overshoot with every variable pinned"
                    );
                    break candidate;
                }
            } else {
                let reached =
                    self.bounded + self.num_free as f64 * candidate - self.free_shift_sum;
                if reached >= self.resource {
                    break (self.resource - self.bounded + self.free_shift_sum)
                        / self.num_free as f64;
                }
            }

            match side {
                Side::Lower => {
                    if let Some(entry) = self.lower_heap.pop() {
                        self.release_low(entry.var);
                    }
                }
                Side::Upper => {
                    if let Some(entry) = self.upper_heap.pop() {
                        self.pin_high(entry.var);
                    }
                }
            }
            self.level = candidate;
        };

        self.level = self.level.max(multiplier);
        let objective = if self.num_free == 0 {
            self.pinned_objective
        } else {
            self.pinned_objective + self.num_free as f64 * multiplier * multiplier
        };
        WindowOutcome::Solved {
            multiplier,
            objective,
        }
    }

    /// Slide the cursor by one variable. Returns `false` once the cursor has
    /// reached `n` (or the partition is flat).
    pub(crate) fn slide(&mut self) -> bool {
        let n = self.problem.num_vars();
        let Some(var) = self.partition.advance(n) else {
            return false;
        };
        let segment = self.partition.segment_of(var);

        self.remove_contribution(var);
        let (old_lower, old_upper) = self.bounds.reassign(self.problem, var, segment);
        self.lower_sum += self.bounds.lower[var] - old_lower;
        self.upper_sum += self.bounds.upper[var] - old_upper;
        self.generation[var] += 1;
        self.insert_at_level(var);
        true
    }

    fn release_low(&mut self, var: usize) {
        debug_assert_eq!(self.regime[var], Regime::PinnedLow);
        let shift = self.problem.shift(var);
        let lower = self.bounds.lower[var];
        self.bounded -= lower;
        self.free_shift_sum += shift;
        self.num_free += 1;
        self.pinned_objective -= (lower + shift) * (lower + shift);
        self.regime[var] = Regime::Free;
    }

    fn pin_high(&mut self, var: usize) {
        debug_assert_eq!(self.regime[var], Regime::Free);
        let shift = self.problem.shift(var);
        let upper = self.bounds.upper[var];
        self.bounded += upper;
        self.free_shift_sum -= shift;
        self.num_free -= 1;
        self.pinned_objective += (upper + shift) * (upper + shift);
        self.regime[var] = Regime::PinnedHigh;
    }

    /// Undo `var`'s share of the running totals under its current regime.
    fn remove_contribution(&mut self, var: usize) {
        let shift = self.problem.shift(var);
        match self.regime[var] {
            Regime::PinnedLow => {
                let lower = self.bounds.lower[var];
                self.bounded -= lower;
                self.pinned_objective -= (lower + shift) * (lower + shift);
            }
            Regime::Free => {
                self.free_shift_sum -= shift;
                self.num_free -= 1;
            }
            Regime::PinnedHigh => {
                let upper = self.bounds.upper[var];
                self.bounded -= upper;
                self.pinned_objective -= (upper + shift) * (upper + shift);
            }
        }
    }

    /// Classify `var` against the current level with its new bounds and push
    /// the breakpoints it has not yet passed.
    fn insert_at_level(&mut self, var: usize) {
        let shift = self.problem.shift(var);
        let lower = self.bounds.lower[var];
        let upper = self.bounds.upper[var];
        let lower_bp = lower + shift;
        let upper_bp = upper + shift;
        let generation = self.generation[var];

        if self.level < lower_bp {
            self.bounded += lower;
            self.pinned_objective += lower_bp * lower_bp;
            self.lower_heap.push(lower_bp, var, generation);
            self.upper_heap.push(upper_bp, var, generation);
            self.regime[var] = Regime::PinnedLow;
        } else if self.level < upper_bp {
            self.free_shift_sum += shift;
            self.num_free += 1;
            self.upper_heap.push(upper_bp, var, generation);
            self.regime[var] = Regime::Free;
        } else {
            self.bounded += upper;
            self.pinned_objective += upper_bp * upper_bp;
            self.regime[var] = Regime::PinnedHigh;
        }
    }
}

/// Bound on the rounding drift of the running totals over one trunk.
///
/// Every variable touches the totals a bounded number of times per trunk,
/// and no partial sum exceeds `|R| + Σ (|b_i| + |lowest_i| + |highest_i|)`.
pub(crate) fn drift_tolerance<P: StructuredProblem>(problem: &P) -> f64 {
    let n = problem.num_vars();
    let top = problem.num_segments().saturating_sub(1);
    let magnitude = (0..n).fold(problem.resource().abs(), |acc, var| {
        let (lowest, _) = problem.segment_bounds(0, var);
        let (_, highest) = problem.segment_bounds(top, var);
        acc + problem.shift(var).abs() + lowest.abs() + highest.abs()
    });
    8.0 * (n + 1) as f64 * f64::EPSILON * magnitude
}

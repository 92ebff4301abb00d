//! Incumbent bookkeeping across partitions.

use crate::partition::Partition;

/// A solved partition: its optimal multiplier and objective.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub objective: f64,
    pub multiplier: f64,
    pub partition: Partition,
}

/// Counters collected while sweeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Trunks handed to the sweep.
    pub trunks: usize,
    /// Cursor positions examined, across all trunks.
    pub windows: usize,
    /// Cursor positions rejected because `Σ lower > R`.
    pub rejected_windows: usize,
    /// Cursor positions that produced a multiplier.
    pub solved_windows: usize,
}

impl SolveStats {
    /// Field-wise sum, for combining per-trunk counters.
    pub fn merge(self, other: Self) -> Self {
        Self {
            trunks: self.trunks + other.trunks,
            windows: self.windows + other.windows,
            rejected_windows: self.rejected_windows + other.rejected_windows,
            solved_windows: self.solved_windows + other.solved_windows,
        }
    }
}

/// Best candidate seen so far. A newcomer replaces the incumbent only if its
/// objective is strictly smaller, so among equal objectives the first one
/// offered wins.
#[derive(Debug, Clone, Default)]
pub struct Incumbent {
    best: Option<Candidate>,
}

impl Incumbent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate; returns `true` if it became the incumbent.
    ///
    /// The partition is only cloned when the candidate wins.
    pub fn offer(&mut self, objective: f64, multiplier: f64, partition: &Partition) -> bool {
        let improves = match &self.best {
            Some(best) => objective < best.objective,
            None => !objective.is_nan(),
        };
        if improves {
            self.best = Some(Candidate {
                objective,
                multiplier,
                partition: partition.clone(),
            });
        }
        improves
    }

    /// Keep whichever of two incumbents is better, preferring `self` on ties.
    pub fn merge(self, other: Self) -> Self {
        match (&self.best, &other.best) {
            (Some(a), Some(b)) if b.objective < a.objective => other,
            (None, Some(_)) => other,
            _ => self,
        }
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<Candidate> {
        self.best
    }
}

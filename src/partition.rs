//! Partitions of the variables into ordered interval segments.
//!
//! Because shifts are sorted non-increasingly, an optimal allocation puts
//! variables into segments monotonically: variables `0..e_0` use segment 0,
//! `e_0..e_1` segment 1, and so on. A [`Partition`] stores these exclusive
//! end indices. The first `m - 2` ends form the *trunk*, enumerated by
//! [`TrunkEnumerator`]; the last end is a cursor the sweep slides from the
//! trunk's last end up to `n`, moving one variable at a time from the top
//! segment into segment `m - 2`.

use std::ops::Range;

/// Assignment of variables to segments, described by exclusive end indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    /// `ends[j]` is one past the last variable of segment `j`; variables from
    /// `ends[m - 2]` on belong to the top segment. Empty for `m = 1`.
    ends: Vec<usize>,
}

impl Partition {
    /// Partition for a single-segment instance: every variable in segment 0.
    pub fn flat() -> Self {
        Self { ends: Vec::new() }
    }

    /// Seed a partition from a trunk: the cursor starts at the trunk's last
    /// end, so segment `m - 2` is empty and everything above the trunk sits in
    /// the top segment.
    pub fn seed(mut trunk: Vec<usize>) -> Self {
        let cursor = trunk.last().copied().unwrap_or(0);
        trunk.push(cursor);
        Self { ends: trunk }
    }

    /// Build a partition from explicit ends.
    ///
    /// # Panics
    /// Panics if `ends` is not non-decreasing.
    pub fn from_ends(ends: Vec<usize>) -> Self {
        assert!(
            ends.windows(2).all(|w| w[0] <= w[1]),
            "partition ends must be non-decreasing"
        );
        Self { ends }
    }

    /// All segment ends, trunk first, cursor last.
    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    /// Ends fixed for the duration of a sweep.
    pub fn trunk(&self) -> &[usize] {
        match self.ends.split_last() {
            Some((_, trunk)) => trunk,
            None => &[],
        }
    }

    /// The sliding end, `None` for a flat partition.
    pub fn cursor(&self) -> Option<usize> {
        self.ends.last().copied()
    }

    /// Variables currently in the sliding segment `m - 2`.
    pub fn window(&self) -> Range<usize> {
        let start = self.trunk().last().copied().unwrap_or(0);
        let end = self.cursor().unwrap_or(start);
        start..end
    }

    /// Segment index of `var`.
    pub fn segment_of(&self, var: usize) -> usize {
        self.ends.partition_point(|&end| end <= var)
    }

    /// Move the cursor one variable up. Returns the variable that left the
    /// top segment, or `None` if the cursor cannot advance.
    pub(crate) fn advance(&mut self, num_vars: usize) -> Option<usize> {
        let cursor = self.ends.last_mut()?;
        if *cursor >= num_vars {
            return None;
        }
        let moved = *cursor;
        *cursor += 1;
        Some(moved)
    }
}

/// Lazy lexicographic enumeration of trunks: non-decreasing `(m - 2)`-tuples
/// drawn from `0..=n`.
///
/// The iterator is cheap to clone and restarts from scratch on
/// [`TrunkEnumerator::new`]. With `m = 2` it yields a single empty trunk;
/// with `m < 2` it yields nothing.
#[derive(Debug, Clone)]
pub struct TrunkEnumerator {
    max_end: usize,
    next: Option<Vec<usize>>,
}

impl TrunkEnumerator {
    pub fn new(num_vars: usize, num_segments: usize) -> Self {
        let next = num_segments.checked_sub(2).map(|k| vec![0; k]);
        Self {
            max_end: num_vars,
            next,
        }
    }
}

impl Iterator for TrunkEnumerator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if let Some(pos) = current.iter().rposition(|&e| e < self.max_end) {
            let mut succ = current.clone();
            let bumped = succ[pos] + 1;
            for e in &mut succ[pos..] {
                *e = bumped;
            }
            self.next = Some(succ);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::num_trunks;

    #[test]
    fn seed_places_cursor_on_last_trunk_end() {
        let p = Partition::seed(vec![1, 3]);
        assert_eq!(p.ends(), &[1, 3, 3]);
        assert_eq!(p.trunk(), &[1, 3]);
        assert_eq!(p.cursor(), Some(3));
        assert!(p.window().is_empty());

        let p = Partition::seed(vec![]);
        assert_eq!(p.ends(), &[0]);
        assert_eq!(p.window(), 0..0);
    }

    #[test]
    fn segment_of_uses_exclusive_ends() {
        let p = Partition::from_ends(vec![2, 2, 4]);
        let segments: Vec<usize> = (0..6).map(|v| p.segment_of(v)).collect();
        assert_eq!(segments, vec![0, 0, 2, 2, 3, 3]);

        let flat = Partition::flat();
        assert_eq!(flat.segment_of(10), 0);
        assert_eq!(flat.cursor(), None);
    }

    #[test]
    fn advance_moves_one_variable_into_window() {
        let mut p = Partition::seed(vec![1]);
        assert_eq!(p.advance(3), Some(1));
        assert_eq!(p.window(), 1..2);
        assert_eq!(p.segment_of(1), 1);
        assert_eq!(p.segment_of(2), 2);
        assert_eq!(p.advance(3), Some(2));
        assert_eq!(p.advance(3), None);
        assert_eq!(p.cursor(), Some(3));

        assert_eq!(Partition::flat().advance(3), None);
    }

    #[test]
    fn enumerator_is_lexicographic() {
        let trunks: Vec<Vec<usize>> = TrunkEnumerator::new(2, 4).collect();
        assert_eq!(
            trunks,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 1],
                vec![1, 2],
                vec![2, 2]
            ]
        );
    }

    #[test]
    fn enumerator_degenerate_segment_counts() {
        assert_eq!(
            TrunkEnumerator::new(5, 2).collect::<Vec<_>>(),
            vec![Vec::<usize>::new()]
        );
        assert_eq!(TrunkEnumerator::new(5, 1).count(), 0);
        assert_eq!(TrunkEnumerator::new(0, 3).collect::<Vec<_>>(), vec![vec![0]]);
    }

    #[test]
    fn enumerator_count_matches_formula_and_restarts() {
        for n in 0..6 {
            for m in 2..6 {
                let it = TrunkEnumerator::new(n, m);
                let again = it.clone();
                assert_eq!(it.count(), num_trunks(n, m), "n={n} m={m}");
                assert_eq!(again.count(), num_trunks(n, m));
            }
        }
    }
}

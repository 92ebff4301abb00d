//! Min-heaps of breakpoints with lazy deletion.
//!
//! Each entry carries the generation of its variable at push time. When a
//! variable's bounds change its generation is bumped, and any older entry is
//! dropped the next time it reaches the top of a heap.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Breakpoint value ordered by [`f64::total_cmp`], so heap order is total.
#[derive(Clone, Copy, Debug)]
pub struct TotalF64(pub f64);

impl PartialEq for TotalF64 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for TotalF64 {}
impl PartialOrd for TotalF64 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for TotalF64 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Heap entry, ordered lexicographically by value, variable, generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BreakpointEntry {
    pub value: TotalF64,
    pub var: usize,
    pub generation: u32,
}

impl BreakpointEntry {
    #[inline]
    pub fn breakpoint(&self) -> f64 {
        self.value.0
    }
}

#[derive(Debug, Default, Clone)]
pub struct BreakpointHeap {
    heap: BinaryHeap<Reverse<BreakpointEntry>>,
}

impl BreakpointHeap {
    /// Heapify one entry per variable, all at generation zero.
    pub fn from_breakpoints<I>(breakpoints: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let heap = breakpoints
            .into_iter()
            .enumerate()
            .map(|(var, value)| {
                Reverse(BreakpointEntry {
                    value: TotalF64(value),
                    var,
                    generation: 0,
                })
            })
            .collect();
        Self { heap }
    }

    pub fn push(&mut self, value: f64, var: usize, generation: u32) {
        self.heap.push(Reverse(BreakpointEntry {
            value: TotalF64(value),
            var,
            generation,
        }));
    }

    /// Smallest entry whose generation is current, discarding stale ones.
    pub fn peek_valid(&mut self, generations: &[u32]) -> Option<BreakpointEntry> {
        while let Some(Reverse(top)) = self.heap.peek() {
            if generations[top.var] == top.generation {
                return Some(*top);
            }
            self.heap.pop();
        }
        None
    }

    pub fn pop(&mut self) -> Option<BreakpointEntry> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

//! Signed per-row changes.
//!
//! A `Delta` pairs a row value with the net number of copies that appeared
//! (positive) or disappeared (negative) between two observations.

use alloc::vec::Vec;

/// Net change of one distinct data item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delta<T> {
    pub data: T,
    /// `+k`: `k` copies appeared. `-k`: `k` copies disappeared.
    pub diff: i64,
}

impl<T> Delta<T> {
    #[inline]
    pub fn new(data: T, diff: i64) -> Self {
        Self { data, diff }
    }

    /// Returns true if copies disappeared.
    #[inline]
    pub fn is_delete(&self) -> bool {
        self.diff < 0
    }

    /// Number of copies involved, in either direction.
    #[inline]
    pub fn multiplicity(&self) -> usize {
        self.diff.unsigned_abs() as usize
    }

    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }
}

/// Per-row changes between two observations, one entry per distinct row.
pub type DeltaBatch<T> = Vec<Delta<T>>;

/// Sum of all diffs: the change in total row count.
pub fn net_count<T>(batch: &[Delta<T>]) -> i64 {
    batch.iter().map(|d| d.diff).sum()
}

//! Multiplicity-exact difference between two observations.
//!
//! For every distinct row seen `k` times before and `k'` times after, the
//! result holds `max(k - k', 0)` copies in `old` and `max(k' - k, 0)` copies
//! in `new`. The `min(k, k')` unchanged copies appear in neither.

use crate::bag::RowBag;
use crate::delta::{net_count, DeltaBatch};
use alloc::vec::Vec;
use deltacheck_core::Row;

/// The (old, new) pair of multisets describing a change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultisetDelta {
    /// Rows present before but no longer present.
    pub old: Vec<Row>,
    /// Rows present now that were not present before.
    pub new: Vec<Row>,
}

impl MultisetDelta {
    /// Returns true if nothing changed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.old.is_empty() && self.new.is_empty()
    }

    /// Builds the delta from per-row net changes.
    pub fn from_deltas(deltas: &DeltaBatch<Row>) -> Self {
        let mut result = Self::default();
        for delta in deltas {
            let target = if delta.is_delete() {
                &mut result.old
            } else {
                &mut result.new
            };
            target.extend(core::iter::repeat(delta.data().clone()).take(delta.multiplicity()));
        }
        result
    }

    /// Net row count change (`new.len() - old.len()`).
    pub fn net_change(&self) -> i64 {
        self.new.len() as i64 - self.old.len() as i64
    }
}

/// Computes the multiset difference from `before` to `after`.
pub fn multiset_diff(before: &[Row], after: &[Row]) -> MultisetDelta {
    let deltas = RowBag::compare(before, after).deltas();
    debug_assert_eq!(
        net_count(&deltas),
        after.len() as i64 - before.len() as i64
    );
    MultisetDelta::from_deltas(&deltas)
}

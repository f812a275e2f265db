//! Hash-bucketed two-sided row multiset.
//!
//! A `RowBag` counts occurrences of each distinct row on a left and a right
//! side. Rows are grouped by hash into buckets and exact equality is only
//! resolved between rows of the same bucket, so building a bag over `n` rows
//! costs `O(n)` row comparisons on average.

use crate::delta::{Delta, DeltaBatch};
use alloc::vec::Vec;
use core::hash::BuildHasher;
use deltacheck_core::Row;
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;

/// One side of a two-sided comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Occurrence counts of one distinct row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BagEntry {
    row: Row,
    left: usize,
    right: usize,
}

impl BagEntry {
    /// The distinct row value.
    #[inline]
    pub fn row(&self) -> &Row {
        &self.row
    }

    /// Occurrences on the left side.
    #[inline]
    pub fn left(&self) -> usize {
        self.left
    }

    /// Occurrences on the right side.
    #[inline]
    pub fn right(&self) -> usize {
        self.right
    }

    /// Right count minus left count.
    #[inline]
    pub fn diff(&self) -> i64 {
        self.right as i64 - self.left as i64
    }

    /// Returns true if both sides hold the row equally often.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.left == self.right
    }
}

/// A two-sided multiset of rows.
#[derive(Clone, Debug, Default)]
pub struct RowBag {
    hasher: DefaultHashBuilder,
    /// Row hash -> indices into `entries` of rows with that hash.
    buckets: HashMap<u64, Vec<usize>>,
    /// Distinct rows in first-seen order.
    entries: Vec<BagEntry>,
}

impl RowBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag with `left` on the left side and `right` on the right.
    pub fn compare<'a, L, R>(left: L, right: R) -> Self
    where
        L: IntoIterator<Item = &'a Row>,
        R: IntoIterator<Item = &'a Row>,
    {
        let mut bag = Self::new();
        for row in left {
            bag.add(row, Side::Left);
        }
        for row in right {
            bag.add(row, Side::Right);
        }
        bag
    }

    /// Records one occurrence of `row` on `side`.
    pub fn add(&mut self, row: &Row, side: Side) {
        let index = self.find_or_insert(row);
        let entry = &mut self.entries[index];
        match side {
            Side::Left => entry.left += 1,
            Side::Right => entry.right += 1,
        }
    }

    fn find_or_insert(&mut self, row: &Row) -> usize {
        let hash = self.hasher.hash_one(row);
        let bucket = self.buckets.entry(hash).or_default();
        if let Some(&index) = bucket.iter().find(|&&i| self.entries[i].row == *row) {
            return index;
        }
        let index = self.entries.len();
        bucket.push(index);
        self.entries.push(BagEntry {
            row: row.clone(),
            left: 0,
            right: 0,
        });
        index
    }

    /// Returns the occurrence counts of `row` as `(left, right)`.
    pub fn counts(&self, row: &Row) -> (usize, usize) {
        let hash = self.hasher.hash_one(row);
        self.buckets
            .get(&hash)
            .and_then(|bucket| {
                bucket
                    .iter()
                    .map(|&i| &self.entries[i])
                    .find(|e| e.row == *row)
            })
            .map(|e| (e.left, e.right))
            .unwrap_or((0, 0))
    }

    /// Returns the number of distinct rows seen on either side.
    #[inline]
    pub fn distinct_len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no row has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if both sides are equal as multisets.
    pub fn is_balanced(&self) -> bool {
        self.entries.iter().all(BagEntry::is_balanced)
    }

    /// Returns all distinct rows in first-seen order.
    pub fn entries(&self) -> &[BagEntry] {
        &self.entries
    }

    /// Returns the entries whose left and right counts differ.
    pub fn unbalanced(&self) -> impl Iterator<Item = &BagEntry> {
        self.entries.iter().filter(|e| !e.is_balanced())
    }

    /// Returns the net change from left to right, one delta per distinct row.
    pub fn deltas(&self) -> DeltaBatch<Row> {
        self.unbalanced()
            .map(|e| Delta::new(e.row.clone(), e.diff()))
            .collect()
    }
}

/// Returns true if `a` and `b` hold the same rows with the same multiplicities.
pub fn multiset_eq(a: &[Row], b: &[Row]) -> bool {
    a.len() == b.len() && RowBag::compare(a, b).is_balanced()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use deltacheck_core::Value;

    fn row(id: i64, name: &str) -> Row {
        Row::new(vec![Value::Int64(id), Value::from(name)])
    }

    #[test]
    fn test_bag_counts() {
        let left = vec![row(1, "a"), row(1, "a"), row(2, "b")];
        let right = vec![row(1, "a"), row(3, "c")];
        let bag = RowBag::compare(&left, &right);

        assert_eq!(bag.distinct_len(), 3);
        assert_eq!(bag.counts(&row(1, "a")), (2, 1));
        assert_eq!(bag.counts(&row(2, "b")), (1, 0));
        assert_eq!(bag.counts(&row(3, "c")), (0, 1));
        assert_eq!(bag.counts(&row(4, "d")), (0, 0));
        assert!(!bag.is_balanced());
    }

    #[test]
    fn test_bag_width_tolerant() {
        let left = vec![Row::new(vec![Value::Int32(7), Value::Null])];
        let right = vec![Row::new(vec![Value::Int64(7), Value::Null])];
        assert!(RowBag::compare(&left, &right).is_balanced());
    }

    #[test]
    fn test_bag_deltas_in_first_seen_order() {
        let left = vec![row(1, "a"), row(2, "b"), row(2, "b")];
        let right = vec![row(3, "c"), row(2, "b")];
        let deltas = RowBag::compare(&left, &right).deltas();
        assert_eq!(
            deltas,
            vec![
                Delta::new(row(1, "a"), -1),
                Delta::new(row(2, "b"), -1),
                Delta::new(row(3, "c"), 1),
            ]
        );
    }

    #[test]
    fn test_multiset_eq() {
        let a = vec![row(1, "a"), row(2, "b"), row(1, "a")];
        let b = vec![row(1, "a"), row(1, "a"), row(2, "b")];
        let c = vec![row(1, "a"), row(2, "b"), row(2, "b")];
        assert!(multiset_eq(&a, &b));
        assert!(!multiset_eq(&a, &c));
        assert!(!multiset_eq(&a, &a[..2]));
        assert!(multiset_eq(&[], &[]));
    }
}

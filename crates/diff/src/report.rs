//! Mismatch reports between an expected and an actual multiset of rows.

use crate::bag::RowBag;
use crate::diff::MultisetDelta;
use alloc::vec::Vec;
use core::fmt;
use deltacheck_core::Row;

/// A distinct row whose expected and actual multiplicities differ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowMismatch {
    /// The row value.
    pub row: Row,
    /// Occurrences expected.
    pub expected: usize,
    /// Occurrences found.
    pub actual: usize,
}

impl RowMismatch {
    /// More occurrences were expected than found.
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.expected > self.actual
    }

    /// More occurrences were found than expected.
    #[inline]
    pub fn is_unexpected(&self) -> bool {
        self.actual > self.expected
    }
}

impl fmt::Display for RowMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.is_missing() { "missing" } else { "unexpected" };
        write!(
            f,
            "{}: expected {}, found {} ({})",
            self.row, self.expected, self.actual, label
        )
    }
}

/// Structured difference between two multisets of rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MismatchReport {
    expected_len: usize,
    actual_len: usize,
    rows: Vec<RowMismatch>,
}

impl MismatchReport {
    /// Compares `expected` against `actual` as multisets.
    pub fn compare(expected: &[Row], actual: &[Row]) -> Self {
        let bag = RowBag::compare(expected, actual);
        let rows = bag
            .unbalanced()
            .map(|e| RowMismatch {
                row: e.row().clone(),
                expected: e.left(),
                actual: e.right(),
            })
            .collect();
        Self {
            expected_len: expected.len(),
            actual_len: actual.len(),
            rows,
        }
    }

    /// Returns true if the two multisets were equal.
    #[inline]
    pub fn is_match(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows expected.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.expected_len
    }

    /// Number of rows found.
    #[inline]
    pub fn actual_len(&self) -> usize {
        self.actual_len
    }

    /// Every mismatching distinct row, in first-seen order.
    #[inline]
    pub fn rows(&self) -> &[RowMismatch] {
        &self.rows
    }

    /// Rows found fewer times than expected.
    pub fn missing(&self) -> impl Iterator<Item = &RowMismatch> {
        self.rows.iter().filter(|m| m.is_missing())
    }

    /// Rows found more times than expected.
    pub fn unexpected(&self) -> impl Iterator<Item = &RowMismatch> {
        self.rows.iter().filter(|m| m.is_unexpected())
    }

    /// Looks up the mismatch for a specific row value.
    pub fn find(&self, row: &Row) -> Option<&RowMismatch> {
        self.rows.iter().find(|m| m.row == *row)
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            return write!(f, "{} rows match", self.actual_len);
        }
        write!(
            f,
            "{} rows expected, {} found; {} distinct rows differ",
            self.expected_len,
            self.actual_len,
            self.rows.len()
        )?;
        for mismatch in &self.rows {
            write!(f, "\n  {}", mismatch)?;
        }
        Ok(())
    }
}

/// Mismatch between an expected and an actual delta.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaMismatch {
    /// Comparison of expected and actual old rows.
    pub old: MismatchReport,
    /// Comparison of expected and actual new rows.
    pub new: MismatchReport,
}

impl DeltaMismatch {
    /// Compares an expected (old, new) pair against the actual delta.
    pub fn compare(expected_old: &[Row], expected_new: &[Row], actual: &MultisetDelta) -> Self {
        Self {
            old: MismatchReport::compare(expected_old, &actual.old),
            new: MismatchReport::compare(expected_new, &actual.new),
        }
    }

    /// Returns true if both sides matched.
    #[inline]
    pub fn is_match(&self) -> bool {
        self.old.is_match() && self.new.is_match()
    }
}

impl fmt::Display for DeltaMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "old data (removed rows): {}", self.old)?;
        write!(f, "\nnew data (added rows): {}", self.new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::multiset_diff;
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec;
    use deltacheck_core::Value;

    fn row(id: i64, name: &str) -> Row {
        Row::new(vec![Value::Int64(id), Value::from(name)])
    }

    #[test]
    fn test_report_match() {
        let a = vec![row(1, "a"), row(2, "b")];
        let b = vec![row(2, "b"), row(1, "a")];
        let report = MismatchReport::compare(&a, &b);
        assert!(report.is_match());
        assert_eq!(report.to_string(), "2 rows match");
    }

    #[test]
    fn test_report_duplicate_count() {
        let expected = vec![row(1, "a"), row(2, "b")];
        let actual = vec![row(1, "a"), row(2, "b"), row(2, "b")];
        let report = MismatchReport::compare(&expected, &actual);

        assert!(!report.is_match());
        assert_eq!(report.rows().len(), 1);
        let m = report.find(&row(2, "b")).unwrap();
        assert_eq!((m.expected, m.actual), (1, 2));
        assert!(m.is_unexpected());
        assert!(report.to_string().contains("(2, \"b\"): expected 1, found 2"));
    }

    #[test]
    fn test_report_missing_and_unexpected() {
        let expected = vec![row(1, "a"), row(1, "a"), row(2, "b")];
        let actual = vec![row(1, "a"), row(3, "c")];
        let report = MismatchReport::compare(&expected, &actual);

        assert_eq!(report.missing().count(), 2);
        assert_eq!(report.unexpected().count(), 1);
        assert_eq!(report.expected_len(), 3);
        assert_eq!(report.actual_len(), 2);
        assert_eq!(
            format!("{}", report.find(&row(1, "a")).unwrap()),
            "(1, \"a\"): expected 2, found 1 (missing)"
        );
    }

    #[test]
    fn test_delta_mismatch_reports_unexpected_addition() {
        let before = vec![row(1, "a"), row(2, "b")];
        let after = vec![row(2, "b"), row(3, "c")];
        let actual = multiset_diff(&before, &after);

        let ok = DeltaMismatch::compare(&[row(1, "a")], &[row(3, "c")], &actual);
        assert!(ok.is_match());

        let bad = DeltaMismatch::compare(&[row(1, "a")], &[], &actual);
        assert!(!bad.is_match());
        assert!(bad.old.is_match());
        let added = bad.new.find(&row(3, "c")).unwrap();
        assert!(added.is_unexpected());
        assert!(bad.to_string().contains("(3, \"c\"): expected 0, found 1 (unexpected)"));
    }
}

//! Assertion outcomes: failure details and log records.

use crate::error::Result;
use deltacheck_core::{DataSet, DataSource, Row};
use deltacheck_diff::{DeltaMismatch, MismatchReport};
use std::fmt;

/// The kind of check an assertion performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssertionKind {
    /// Snapshot versus fresh observation against an expected delta.
    Delta,
    /// Fresh observation against an expected data set.
    State,
    /// Two data sets compared by value.
    Equals,
}

impl AssertionKind {
    fn default_message(self) -> &'static str {
        match self {
            AssertionKind::Delta => "Delta assertion failed",
            AssertionKind::State => "State assertion failed",
            AssertionKind::Equals => "Data set equality assertion failed",
        }
    }
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionKind::Delta => f.write_str("delta"),
            AssertionKind::State => f.write_str("state"),
            AssertionKind::Equals => f.write_str("equals"),
        }
    }
}

/// Structured difference found by an assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    Delta(DeltaMismatch),
    Data(MismatchReport),
}

impl Mismatch {
    /// Returns true if expectation and observation agree.
    pub fn is_match(&self) -> bool {
        match self {
            Mismatch::Delta(m) => m.is_match(),
            Mismatch::Data(m) => m.is_match(),
        }
    }

    /// Returns the delta report, if this came from a delta assertion.
    pub fn as_delta(&self) -> Option<&DeltaMismatch> {
        match self {
            Mismatch::Delta(m) => Some(m),
            Mismatch::Data(_) => None,
        }
    }

    /// Returns the data set report, if this came from a state or equality
    /// assertion.
    pub fn as_data(&self) -> Option<&MismatchReport> {
        match self {
            Mismatch::Data(m) => Some(m),
            Mismatch::Delta(_) => None,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Delta(m) => write!(f, "{}", m),
            Mismatch::Data(m) => write!(f, "{}", m),
        }
    }
}

/// A failed assertion with its full diagnosis.
#[derive(Clone, Debug)]
pub struct AssertionFailure {
    kind: AssertionKind,
    message: Option<String>,
    source_name: String,
    mismatch: Mismatch,
}

impl AssertionFailure {
    pub(crate) fn new(
        kind: AssertionKind,
        message: Option<&str>,
        source: &DataSource,
        mismatch: Mismatch,
    ) -> Self {
        Self {
            kind,
            message: message.map(str::to_owned),
            source_name: source.to_string(),
            mismatch,
        }
    }

    /// The kind of assertion that failed.
    #[inline]
    pub fn kind(&self) -> AssertionKind {
        self.kind
    }

    /// The caller-supplied description, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Description of the data source that was checked.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The structured difference.
    #[inline]
    pub fn mismatch(&self) -> &Mismatch {
        &self.mismatch
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message().unwrap_or(self.kind.default_message());
        write!(f, "{} ({})\n{}", message, self.source_name, self.mismatch)
    }
}

/// Rows as seen by one side of an assertion.
#[derive(Clone, Copy, Debug)]
pub enum Observed<'a> {
    Data(&'a [Row]),
    Delta { old: &'a [Row], new: &'a [Row] },
}

struct RowList<'a>(&'a [Row]);

impl fmt::Display for RowList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", row)?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Observed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Data(rows) => write!(f, "{}", RowList(rows)),
            Observed::Delta { old, new } => {
                write!(f, "old {} new {}", RowList(old), RowList(new))
            }
        }
    }
}

/// Everything known about one assertion, handed to the assertion log.
#[derive(Clone, Copy, Debug)]
pub struct AssertionRecord<'a> {
    pub kind: AssertionKind,
    pub message: Option<&'a str>,
    pub source: &'a DataSource,
    pub expected: Observed<'a>,
    pub actual: Observed<'a>,
    pub mismatch: &'a Mismatch,
}

impl AssertionRecord<'_> {
    /// Returns true if the assertion passed.
    #[inline]
    pub fn passed(&self) -> bool {
        self.mismatch.is_match()
    }
}

pub(crate) fn equality(expected: &DataSet, actual: &DataSet) -> Mismatch {
    Mismatch::Data(MismatchReport::compare(expected.rows(), actual.rows()))
}

/// Checks that two data sets hold the same rows with the same
/// multiplicities, ignoring row order and data source identity.
///
/// Nothing is logged; [`Session::assert_equals`](crate::Session::assert_equals)
/// is the logged form of the same check.
pub fn assert_equals(expected: &DataSet, actual: &DataSet) -> Result<()> {
    let mismatch = equality(expected, actual);
    if mismatch.is_match() {
        return Ok(());
    }
    Err(AssertionFailure::new(AssertionKind::Equals, None, expected.source(), mismatch).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deltacheck_core::values;

    #[test]
    fn test_assert_equals_ignores_source_identity() {
        let a = DataSource::table("t", &["id"]).unwrap();
        let b = DataSource::query("SELECT id FROM t", &["id"]).unwrap();
        let mut x = a.data_set();
        x.rows_from([values![1], values![2]]).unwrap();
        let mut y = b.data_set();
        y.rows_from([values![2i64], values![1i64]]).unwrap();
        assert!(assert_equals(&x, &y).is_ok());
    }

    #[test]
    fn test_assert_equals_duplicate_count() {
        let source = DataSource::table("t", &["id", "v"]).unwrap();
        let mut expected = source.data_set();
        expected.rows_from([values![1, "a"], values![2, "b"]]).unwrap();
        let mut actual = source.data_set();
        actual
            .rows_from([values![1, "a"], values![2, "b"], values![2, "b"]])
            .unwrap();

        let err = assert_equals(&expected, &actual).unwrap_err();
        let failure = err.failure().unwrap();
        assert_eq!(failure.kind(), AssertionKind::Equals);
        let text = failure.to_string();
        assert!(text.starts_with("Data set equality assertion failed (table t)"));
        assert!(text.contains("(2, \"b\"): expected 1, found 2"));
    }

    #[test]
    fn test_observed_display() {
        let rows = vec![Row::new(vec![deltacheck_core::Value::Int32(1)])];
        let observed = Observed::Delta { old: &rows, new: &[] };
        assert_eq!(observed.to_string(), "old [(1)] new []");
    }
}

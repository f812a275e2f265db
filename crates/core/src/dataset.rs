//! Data sets: multisets of rows bound to one data source.
//!
//! A `DataSet` starts out writable. Freezing it moves the rows into a shared
//! immutable buffer; every mutator goes through one private gate, which
//! is the only place the read-only state is checked. There is no way back
//! from frozen to writable other than taking a copy with [`DataSet::copy_of`].

use crate::builder::Builder;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::source::DataSource;
use crate::value::Value;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

#[derive(Clone, Debug)]
enum Rows {
    Open(Vec<Row>),
    Frozen(Arc<[Row]>),
}

impl Rows {
    #[inline]
    fn as_slice(&self) -> &[Row] {
        match self {
            Rows::Open(rows) => rows.as_slice(),
            Rows::Frozen(rows) => &rows[..],
        }
    }
}

/// A multiset of rows bound to a single data source.
///
/// Insertion order is kept for display only; it plays no part in any
/// comparison performed on data sets.
#[derive(Clone, Debug)]
pub struct DataSet {
    source: DataSource,
    rows: Rows,
}

impl DataSet {
    /// Creates an empty, writable data set for `source`.
    pub fn new(source: &DataSource) -> Self {
        Self {
            source: source.clone(),
            rows: Rows::Open(Vec::new()),
        }
    }

    /// Creates a data set from rows whose arity has already been checked.
    fn from_rows(source: &DataSource, rows: Vec<Row>) -> Self {
        Self {
            source: source.clone(),
            rows: Rows::Open(rows),
        }
    }

    /// Creates a data set from rows, validating every row against the
    /// source's column count.
    pub fn with_rows(source: &DataSource, rows: impl IntoIterator<Item = Row>) -> Result<Self> {
        let rows: Vec<Row> = rows.into_iter().collect();
        check_arity(source, &rows)?;
        Ok(Self::from_rows(source, rows))
    }

    /// Returns the data source this set is bound to.
    #[inline]
    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Returns the rows in insertion order.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        self.rows.as_slice()
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// Returns true if the set holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Returns true if the set has been frozen.
    #[inline]
    pub fn is_read_only(&self) -> bool {
        matches!(self.rows, Rows::Frozen(_))
    }

    /// Marks the set read-only. Irreversible.
    pub fn set_read_only(&mut self) {
        if let Rows::Open(rows) = &mut self.rows {
            let rows = core::mem::take(rows);
            self.rows = Rows::Frozen(rows.into());
        }
    }

    /// Consumes the set and returns it frozen.
    pub fn freeze(mut self) -> Self {
        self.set_read_only();
        self
    }

    /// Consumes the set and returns its rows.
    pub fn into_rows(self) -> Vec<Row> {
        match self.rows {
            Rows::Open(rows) => rows,
            Rows::Frozen(rows) => rows.to_vec(),
        }
    }

    pub(crate) fn rows_mut(&mut self) -> Result<&mut Vec<Row>> {
        match &mut self.rows {
            Rows::Open(rows) => Ok(rows),
            Rows::Frozen(_) => Err(Error::read_only(self.source.to_string())),
        }
    }

    /// Appends a single row.
    pub fn row<I, V>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row = Row::for_source(&self.source, values)?;
        self.push(row)
    }

    /// Returns a row generator appending to this set.
    pub fn build(&mut self) -> Builder<'_> {
        Builder::new(self)
    }

    /// Appends an already constructed row.
    pub fn push(&mut self, row: Row) -> Result<&mut Self> {
        if row.len() != self.source.column_count() {
            return Err(Error::arity_mismatch(self.source.column_count(), row.len()));
        }
        self.rows_mut()?.push(row);
        Ok(self)
    }

    /// Appends many rows. Either every row is appended or none is.
    pub fn rows_from<R, I, V>(&mut self, rows: R) -> Result<&mut Self>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows_mut()?;
        let mut batch = Vec::new();
        for values in rows {
            batch.push(Row::for_source(&self.source, values)?);
        }
        self.rows_mut()?.extend(batch);
        Ok(self)
    }

    /// Appends all rows of `other`, which must share this set's source.
    pub fn add(&mut self, other: &DataSet) -> Result<&mut Self> {
        if other.source != self.source {
            return Err(Error::source_mismatch(
                self.source.to_string(),
                other.source.to_string(),
            ));
        }
        self.rows_mut()?.extend_from_slice(other.rows());
        Ok(self)
    }

    /// Returns a writable copy of this set.
    pub fn copy_of(&self) -> DataSet {
        Self::from_rows(&self.source, self.rows().to_vec())
    }

    /// Returns `count` rows starting at `start`.
    pub fn subset(&self, start: usize, count: usize) -> Result<DataSet> {
        let len = self.len();
        match start.checked_add(count) {
            Some(end) if end <= len => {
                Ok(Self::from_rows(&self.source, self.rows()[start..end].to_vec()))
            }
            _ => Err(Error::invalid_range(start, count, len)),
        }
    }

    /// Returns the row at `index` as a one-row set.
    pub fn singleton(&self, index: usize) -> Result<DataSet> {
        self.subset(index, 1)
    }

    /// Returns the first `n` rows.
    pub fn first(&self, n: usize) -> Result<DataSet> {
        self.subset(0, n)
    }

    /// Returns the last `n` rows.
    pub fn last(&self, n: usize) -> Result<DataSet> {
        match self.len().checked_sub(n) {
            Some(start) => self.subset(start, n),
            None => Err(Error::invalid_range(0, n, self.len())),
        }
    }

    /// Joins several sets of the same source into a new writable set.
    pub fn join<'a, I>(sets: I) -> Result<DataSet>
    where
        I: IntoIterator<Item = &'a DataSet>,
    {
        let mut sets = sets.into_iter();
        let first = sets
            .next()
            .ok_or_else(|| Error::invalid_operation("no data sets given for joining"))?;
        let mut joined = first.copy_of();
        for set in sets {
            joined.add(set)?;
        }
        Ok(joined)
    }
}

fn check_arity(source: &DataSource, rows: &[Row]) -> Result<()> {
    match rows.iter().find(|r| r.len() != source.column_count()) {
        Some(bad) => Err(Error::arity_mismatch(source.column_count(), bad.len())),
        None => Ok(()),
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.rows().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", row)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;
    use alloc::format;
    use alloc::vec;

    fn users() -> DataSource {
        DataSource::table("users", &["id", "name"]).unwrap()
    }

    fn sample(source: &DataSource) -> DataSet {
        let mut data = source.data_set();
        data.row(values![1, "a"])
            .unwrap()
            .row(values![2, "b"])
            .unwrap()
            .row(values![3, "c"])
            .unwrap();
        data
    }

    #[test]
    fn test_row_append_and_arity() {
        let source = users();
        let mut data = source.data_set();
        data.row(values![1, "a"]).unwrap();
        assert_eq!(data.len(), 1);

        let err = data.row(values![1]).unwrap_err();
        assert_eq!(err, Error::arity_mismatch(2, 1));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_bulk_append_is_all_or_nothing() {
        let source = users();
        let mut data = source.data_set();
        let result = data.rows_from(vec![
            vec![Value::from(1), Value::from("a")],
            vec![Value::from(2)],
        ]);
        assert!(result.is_err());
        assert!(data.is_empty());

        data.rows_from(vec![values![1, "a"], values![2, "b"]]).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_read_only_is_monotonic() {
        let source = users();
        let mut data = sample(&source);
        data.set_read_only();
        assert!(data.is_read_only());

        assert!(matches!(data.row(values![4, "d"]), Err(Error::ReadOnly { .. })));
        assert!(matches!(data.push(Row::new(vec![Value::Int32(4), Value::Null])), Err(Error::ReadOnly { .. })));
        let other = sample(&source);
        assert!(matches!(data.add(&other), Err(Error::ReadOnly { .. })));
        assert!(matches!(
            data.rows_from(vec![values![5, "e"]]),
            Err(Error::ReadOnly { .. })
        ));
        assert_eq!(data.len(), 3);

        data.set_read_only();
        assert!(data.is_read_only());
        assert!(!data.copy_of().is_read_only());
    }

    #[test]
    fn test_add_requires_same_source() {
        let a = users();
        let b = users();
        let mut data = sample(&a);
        let other = sample(&b);
        assert!(matches!(data.add(&other), Err(Error::SourceMismatch { .. })));

        let same = sample(&a);
        data.add(&same).unwrap();
        assert_eq!(data.len(), 6);
    }

    #[test]
    fn test_positional_subsets() {
        let source = users();
        let data = sample(&source);

        assert_eq!(data.first(2).unwrap().rows(), &data.rows()[..2]);
        assert_eq!(data.last(1).unwrap().rows(), &data.rows()[2..]);
        assert_eq!(data.subset(1, 2).unwrap().len(), 2);
        assert_eq!(data.singleton(0).unwrap().rows()[0], data.rows()[0]);
        assert_eq!(data.first(0).unwrap().len(), 0);

        assert_eq!(data.subset(2, 2).unwrap_err(), Error::invalid_range(2, 2, 3));
        assert!(data.singleton(3).is_err());
        assert!(data.first(4).is_err());
        assert!(data.last(4).is_err());
        assert!(data.subset(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_join() {
        let source = users();
        let a = sample(&source);
        let b = sample(&source).first(1).unwrap();
        let joined = DataSet::join([&a, &b]).unwrap();
        assert_eq!(joined.len(), 4);
        assert_eq!(joined.source(), &source);

        let other = sample(&users());
        assert!(DataSet::join([&a, &other]).is_err());
        assert!(DataSet::join(core::iter::empty::<&DataSet>()).is_err());
    }

    #[test]
    fn test_with_rows_checks_arity() {
        let source = users();
        let ok = DataSet::with_rows(&source, vec![Row::new(vec![Value::Int32(1), Value::Null])]);
        assert!(ok.is_ok());
        let bad = DataSet::with_rows(&source, vec![Row::new(vec![Value::Int32(1)])]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_into_rows() {
        let source = users();
        let open = sample(&source);
        let frozen = open.clone().freeze();
        assert_eq!(open.into_rows().len(), 3);

        let rows = frozen.into_rows();
        assert_eq!(rows[2], Row::new(vec![Value::Int32(3), Value::from("c")]));
        let mut reopened = DataSet::with_rows(&source, rows).unwrap();
        reopened.row(values![4, "d"]).unwrap();
        assert_eq!(reopened.len(), 4);
    }

    #[test]
    fn test_display() {
        let source = users();
        let data = sample(&source).first(2).unwrap();
        assert_eq!(format!("{}", data), "[(1, \"a\"), (2, \"b\")]");
    }
}

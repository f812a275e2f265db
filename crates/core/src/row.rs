//! Row structure for deltacheck.
//!
//! A `Row` is an immutable ordered tuple of column values. Equality and
//! hashing are value-based and follow the normalization rules of [`Value`].

use crate::error::{Error, Result};
use crate::source::DataSource;
use crate::value::Value;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

/// An immutable row of column values.
#[derive(Clone, Debug)]
pub struct Row {
    /// Values stored in this row, indexed by column position.
    values: Arc<[Value]>,
}

impl Row {
    /// Creates a row from the given values without an arity check.
    pub fn new(values: impl Into<Arc<[Value]>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Creates a row for `source`, failing if the arity differs from the
    /// source column count.
    pub fn for_source<I, V>(source: &DataSource, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.len() != source.column_count() {
            return Err(Error::arity_mismatch(source.column_count(), values.len()));
        }
        Ok(Self::new(values))
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets a value at the given column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the number of values in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self.values.iter().zip(other.values.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for Row {}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.values.len());
        for value in self.values.iter() {
            value.hash(state);
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str(")")
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
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

    #[test]
    fn test_row_new() {
        let row = Row::new(vec![Value::Int64(42), Value::String("Alice".into())]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::Int64(42)));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_row_for_source_checks_arity() {
        let source = users();
        assert!(Row::for_source(&source, values![1, "a"]).is_ok());
        let err = Row::for_source(&source, values![1]).unwrap_err();
        assert_eq!(err, Error::arity_mismatch(2, 1));
    }

    #[test]
    fn test_row_equality() {
        let row1 = Row::new(vec![Value::Int32(42), Value::Null]);
        let row2 = Row::new(vec![Value::Int64(42), Value::Null]);
        let row3 = Row::new(vec![Value::Null, Value::Int64(42)]);
        let row4 = Row::new(vec![Value::Int64(42)]);
        assert_eq!(row1, row2);
        assert_ne!(row1, row3);
        assert_ne!(row1, row4);
    }

    #[test]
    fn test_row_display() {
        let row = Row::new(vec![Value::Int32(1), Value::from("a"), Value::Null]);
        assert_eq!(format!("{}", row), "(1, \"a\", NULL)");
    }
}

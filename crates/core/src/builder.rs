//! Row generation for data sets.
//!
//! A [`Builder`] holds one filler per column of its data set's source and
//! appends generated rows in bulk. Fillers see the running index of the row
//! being generated, so sequences continue across calls to `generate`.

use crate::dataset::DataSet;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::value::Value;
use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::fmt;

enum Filler {
    Value(Value),
    Sequence { start: i64, step: i64 },
    Cycle(Vec<Value>),
    Custom(Box<dyn FnMut(usize) -> Value>),
}

impl Filler {
    fn next(&mut self, index: usize) -> Result<Value> {
        match self {
            Filler::Value(value) => Ok(value.clone()),
            Filler::Sequence { start, step } => i64::try_from(index)
                .ok()
                .and_then(|i| step.checked_mul(i))
                .and_then(|offset| start.checked_add(offset))
                .map(Value::Int64)
                .ok_or_else(|| Error::invalid_operation("sequence overflows a 64-bit integer")),
            // Never empty; checked when the filler is set.
            Filler::Cycle(values) => Ok(values[index % values.len()].clone()),
            Filler::Custom(f) => Ok(f(index)),
        }
    }
}

/// Generates rows for a [`DataSet`] from per-column fillers.
///
/// ```rust
/// use deltacheck_core::DataSource;
///
/// let users = DataSource::table("users", &["id", "name", "email"]).unwrap();
/// let mut data = users.data_set();
/// data.build()
///     .sequence("id", 1, 1).unwrap()
///     .cycle("name", ["alice", "bob"]).unwrap()
///     .remaining_null()
///     .generate(4).unwrap();
///
/// assert_eq!(data.len(), 4);
/// assert_eq!(data.to_string(), "[(1, \"alice\", NULL), (2, \"bob\", NULL), \
///     (3, \"alice\", NULL), (4, \"bob\", NULL)]");
/// ```
pub struct Builder<'a> {
    data: &'a mut DataSet,
    fillers: Vec<Option<Filler>>,
    generated: usize,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(data: &'a mut DataSet) -> Self {
        let columns = data.source().column_count();
        Self {
            data,
            fillers: (0..columns).map(|_| None).collect(),
            generated: 0,
        }
    }

    fn set(&mut self, column: &str, filler: Filler) -> Result<&mut Self> {
        let index = self
            .data
            .source()
            .column_index(column)
            .ok_or_else(|| Error::invalid_operation(format!("unknown column: {}", column)))?;
        self.fillers[index] = Some(filler);
        Ok(self)
    }

    /// Fills `column` with the same value in every row.
    pub fn value(&mut self, column: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.set(column, Filler::Value(value.into()))
    }

    /// Fills `column` with nulls.
    pub fn null(&mut self, column: &str) -> Result<&mut Self> {
        self.set(column, Filler::Value(Value::Null))
    }

    /// Fills `column` with `start`, `start + step`, `start + 2 * step`, ...
    pub fn sequence(&mut self, column: &str, start: i64, step: i64) -> Result<&mut Self> {
        self.set(column, Filler::Sequence { start, step })
    }

    /// Fills `column` by cycling through `values` in order.
    pub fn cycle<I, V>(&mut self, column: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(Error::invalid_operation(format!(
                "no values to cycle through for column {}",
                column
            )));
        }
        self.set(column, Filler::Cycle(values))
    }

    /// Fills `column` with `f(i)`, where `i` is the index of the row among
    /// all rows generated by this builder.
    pub fn with<F>(&mut self, column: &str, f: F) -> Result<&mut Self>
    where
        F: FnMut(usize) -> Value + 'static,
    {
        self.set(column, Filler::Custom(Box::new(f)))
    }

    /// Fills every column that has no filler yet with nulls.
    pub fn remaining_null(&mut self) -> &mut Self {
        for filler in self.fillers.iter_mut().filter(|f| f.is_none()) {
            *filler = Some(Filler::Value(Value::Null));
        }
        self
    }

    /// Number of rows generated so far.
    #[inline]
    pub fn generated(&self) -> usize {
        self.generated
    }

    /// Generates `count` rows and appends them to the data set. Either all
    /// rows are appended or none is.
    pub fn generate(&mut self, count: usize) -> Result<&mut Self> {
        if let Some(missing) = self.fillers.iter().position(Option::is_none) {
            return Err(Error::invalid_operation(format!(
                "no filler set for column {}",
                self.data.source().columns()[missing]
            )));
        }
        self.data.rows_mut()?;

        let mut rows = Vec::with_capacity(count);
        for i in 0..count {
            let index = self.generated + i;
            let mut values = Vec::with_capacity(self.fillers.len());
            for filler in self.fillers.iter_mut().flatten() {
                values.push(filler.next(index)?);
            }
            rows.push(Row::new(values));
        }
        self.data.rows_mut()?.extend(rows);
        self.generated += count;
        Ok(self)
    }
}

impl fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("source", self.data.source())
            .field("generated", &self.generated)
            .finish_non_exhaustive()
    }
}

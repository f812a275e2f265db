//! Collaborator contracts.
//!
//! The engine never talks to a data store directly. It asks a
//! [`QueryExecutor`] for fresh data and a [`TablePopulator`] to reset table
//! contents; both are supplied by the caller.

use deltacheck_core::{DataSet, DataSource};

/// Error type reported by collaborators.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Fetches the current rows of a data source.
///
/// Column order must be stable; row order may vary between calls. The result
/// must reflect the store's state at call time.
pub trait QueryExecutor {
    /// Returns a fresh data set bound to `source`.
    fn fetch(&mut self, source: &DataSource) -> Result<DataSet, BackendError>;
}

/// Replaces the contents of a table.
pub trait TablePopulator {
    /// Leaves the table of `data`'s source holding exactly the rows of
    /// `data`, atomically with respect to later fetches.
    fn populate(&mut self, data: &DataSet) -> Result<(), BackendError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &mut T {
    fn fetch(&mut self, source: &DataSource) -> Result<DataSet, BackendError> {
        (**self).fetch(source)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Box<T> {
    fn fetch(&mut self, source: &DataSource) -> Result<DataSet, BackendError> {
        (**self).fetch(source)
    }
}

impl<T: TablePopulator + ?Sized> TablePopulator for &mut T {
    fn populate(&mut self, data: &DataSet) -> Result<(), BackendError> {
        (**self).populate(data)
    }
}

impl<T: TablePopulator + ?Sized> TablePopulator for Box<T> {
    fn populate(&mut self, data: &DataSet) -> Result<(), BackendError> {
        (**self).populate(data)
    }
}

//! In-memory data store.
//!
//! `MemoryStore` implements both collaborator contracts over plain row
//! vectors. Tables are addressed by name; query sources are answered by
//! handlers registered under their SQL text. It is meant for tests and
//! demos of the assertion engine, where its mutators play the part of the
//! operation under test.

use crate::backend::{BackendError, QueryExecutor, TablePopulator};
use deltacheck_core::{DataSet, DataSource, Row, SourceKind, Value};
use hashbrown::HashMap;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by [`MemoryStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("table already exists: {0}")]
    TableExists(String),
    #[error("no handler registered for query: {0}")]
    UnknownQuery(String),
    #[error("cannot populate {0}: not a table")]
    NotATable(String),
    #[error(transparent)]
    Data(#[from] deltacheck_core::Error),
}

/// Handler answering a query source from the current store contents.
pub type QueryHandler = Box<dyn Fn(&MemoryStore, &[Value]) -> Vec<Row>>;

/// Rows held in memory, keyed by table name.
#[derive(Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, Vec<Row>>,
    queries: HashMap<String, QueryHandler>,
    reverse_fetch: bool,
    fetch_count: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table.
    pub fn create_table(&mut self, name: impl Into<String>) -> Result<(), StoreError> {
        let name = name.into();
        if self.tables.contains_key(&name) {
            return Err(StoreError::TableExists(name));
        }
        self.tables.insert(name, Vec::new());
        Ok(())
    }

    /// Returns true if the table exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns the rows of a table in storage order.
    pub fn table(&self, name: &str) -> Option<&[Row]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Vec<Row>, StoreError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    /// Appends a row to a table.
    pub fn insert<I, V>(&mut self, table: &str, values: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row = Row::new(values.into_iter().map(Into::into).collect::<Vec<Value>>());
        self.table_mut(table)?.push(row);
        Ok(())
    }

    /// Deletes every row matching `predicate`, returning how many were removed.
    pub fn delete_where<F>(&mut self, table: &str, mut predicate: F) -> Result<usize, StoreError>
    where
        F: FnMut(&Row) -> bool,
    {
        let rows = self.table_mut(table)?;
        let before = rows.len();
        rows.retain(|row| !predicate(row));
        Ok(before - rows.len())
    }

    /// Replaces every row matching `predicate` with `update(row)`, returning
    /// how many were changed.
    pub fn update_where<F, U>(
        &mut self,
        table: &str,
        mut predicate: F,
        mut update: U,
    ) -> Result<usize, StoreError>
    where
        F: FnMut(&Row) -> bool,
        U: FnMut(&Row) -> Row,
    {
        let rows = self.table_mut(table)?;
        let mut changed = 0;
        for row in rows.iter_mut().filter(|row| predicate(row)) {
            *row = update(row);
            changed += 1;
        }
        Ok(changed)
    }

    /// Registers the handler for a query source's SQL text.
    pub fn register_query<F>(&mut self, sql: impl Into<String>, handler: F)
    where
        F: Fn(&MemoryStore, &[Value]) -> Vec<Row> + 'static,
    {
        self.queries.insert(sql.into(), Box::new(handler));
    }

    /// Makes fetches return rows in reverse storage order.
    pub fn set_reverse_fetch(&mut self, enabled: bool) {
        self.reverse_fetch = enabled;
    }

    /// Number of fetches served so far.
    #[inline]
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    fn read(&self, source: &DataSource) -> Result<Vec<Row>, StoreError> {
        match source.kind() {
            SourceKind::Table { name } => self
                .table(name)
                .map(<[Row]>::to_vec)
                .ok_or_else(|| StoreError::TableNotFound(name.clone())),
            SourceKind::Query { sql } | SourceKind::BoundQuery { sql, .. } => {
                let handler = self
                    .queries
                    .get(sql)
                    .ok_or_else(|| StoreError::UnknownQuery(sql.clone()))?;
                Ok(handler(self, source.query_args()))
            }
        }
    }
}

impl QueryExecutor for MemoryStore {
    fn fetch(&mut self, source: &DataSource) -> Result<DataSet, BackendError> {
        self.fetch_count += 1;
        let mut rows = self.read(source)?;
        if self.reverse_fetch {
            rows.reverse();
        }
        let data = DataSet::with_rows(source, rows).map_err(StoreError::from)?;
        Ok(data)
    }
}

impl TablePopulator for MemoryStore {
    fn populate(&mut self, data: &DataSet) -> Result<(), BackendError> {
        let name = data
            .source()
            .table_name()
            .ok_or_else(|| StoreError::NotATable(data.source().to_string()))?;
        self.tables.insert(name.to_string(), data.rows().to_vec());
        Ok(())
    }
}

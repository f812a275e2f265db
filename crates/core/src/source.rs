//! Data source definitions.
//!
//! A `DataSource` names where rows come from: a physical table, an arbitrary
//! query, or a query with bound arguments. Sources are compared by identity:
//! two independently constructed sources over the same table are different
//! sources, while clones of one source are the same.

use crate::dataset::DataSet;
use crate::error::{Error, Result};
use crate::value::Value;
use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier of a data source.
pub type SourceId = u64;

/// Global counter for data source identities.
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

fn next_source_id() -> SourceId {
    NEXT_SOURCE_ID.fetch_add(1, Ordering::SeqCst)
}

/// What a data source reads from.
#[derive(Clone, Debug)]
pub enum SourceKind {
    /// All rows of a physical table.
    Table { name: String },
    /// An arbitrary query without arguments.
    Query { sql: String },
    /// A query with bound positional arguments.
    BoundQuery { sql: String, args: Vec<Value> },
}

#[derive(Debug)]
struct SourceInner {
    id: SourceId,
    kind: SourceKind,
    columns: Vec<String>,
}

/// Identity-compared producer of rows.
#[derive(Clone, Debug)]
pub struct DataSource {
    inner: Arc<SourceInner>,
}

impl DataSource {
    fn build(kind: SourceKind, columns: &[&str]) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::invalid_source("at least one column is required"));
        }
        let mut names: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            let column = column.trim();
            if column.is_empty() {
                return Err(Error::invalid_source("empty column name"));
            }
            if names.iter().any(|n| n.eq_ignore_ascii_case(column)) {
                return Err(Error::invalid_source(format!("duplicate column: {}", column)));
            }
            names.push(column.to_string());
        }
        Ok(Self {
            inner: Arc::new(SourceInner {
                id: next_source_id(),
                kind,
                columns: names,
            }),
        })
    }

    /// Creates a data source for all rows of a table.
    pub fn table(name: impl Into<String>, columns: &[&str]) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_source("empty table name"));
        }
        Self::build(SourceKind::Table { name }, columns)
    }

    /// Creates a data source for an arbitrary query.
    pub fn query(sql: impl Into<String>, columns: &[&str]) -> Result<Self> {
        Self::build(SourceKind::Query { sql: sql.into() }, columns)
    }

    /// Creates a data source for a query with bound arguments.
    pub fn bound_query<I, V>(sql: impl Into<String>, columns: &[&str], args: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let args = args.into_iter().map(Into::into).collect();
        Self::build(
            SourceKind::BoundQuery {
                sql: sql.into(),
                args,
            },
            columns,
        )
    }

    /// Returns the identity of this source.
    #[inline]
    pub fn id(&self) -> SourceId {
        self.inner.id
    }

    /// Returns the source variant.
    #[inline]
    pub fn kind(&self) -> &SourceKind {
        &self.inner.kind
    }

    /// Returns the column names.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.inner.columns
    }

    /// Returns the position of a column. Names match ignoring ASCII case,
    /// the same rule used to reject duplicate columns.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.inner
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Returns the number of columns every row of this source has.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.inner.columns.len()
    }

    /// Returns the table name for table sources.
    pub fn table_name(&self) -> Option<&str> {
        match &self.inner.kind {
            SourceKind::Table { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns true if rows of this source can be written back to a table.
    #[inline]
    pub fn is_table(&self) -> bool {
        matches!(self.inner.kind, SourceKind::Table { .. })
    }

    /// Returns the query text that produces this source's rows.
    pub fn query_text(&self) -> Cow<'_, str> {
        match &self.inner.kind {
            SourceKind::Table { name } => {
                Cow::Owned(format!("SELECT {} FROM {}", self.inner.columns.join(", "), name))
            }
            SourceKind::Query { sql } | SourceKind::BoundQuery { sql, .. } => Cow::Borrowed(sql),
        }
    }

    /// Returns the arguments bound to the query, if any.
    pub fn query_args(&self) -> &[Value] {
        match &self.inner.kind {
            SourceKind::BoundQuery { args, .. } => args.as_slice(),
            _ => &[],
        }
    }

    /// Creates an empty, writable data set bound to this source.
    pub fn data_set(&self) -> DataSet {
        DataSet::new(self)
    }
}

impl PartialEq for DataSource {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for DataSource {}

impl Hash for DataSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            SourceKind::Table { name } => write!(f, "table {}", name),
            SourceKind::Query { sql } => write!(f, "query `{}`", sql),
            SourceKind::BoundQuery { sql, args } => {
                write!(f, "query `{}` with [", sql)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    #[test]
    fn test_table_source() {
        let source = DataSource::table("users", &["id", "name"]).unwrap();
        assert_eq!(source.column_count(), 2);
        assert_eq!(source.table_name(), Some("users"));
        assert_eq!(source.query_text(), "SELECT id, name FROM users");
        assert!(source.query_args().is_empty());
        assert_eq!(source.to_string(), "table users");
        assert_eq!(source.column_index("name"), Some(1));
        assert_eq!(source.column_index("ID"), Some(0));
        assert_eq!(source.column_index("email"), None);
    }

    #[test]
    fn test_bound_query_source() {
        let source =
            DataSource::bound_query("SELECT id FROM users WHERE id > ?", &["id"], values![10]).unwrap();
        assert!(!source.is_table());
        assert_eq!(source.query_text(), "SELECT id FROM users WHERE id > ?");
        assert_eq!(source.query_args(), &[Value::Int32(10)]);
        assert_eq!(source.to_string(), "query `SELECT id FROM users WHERE id > ?` with [10]");
    }

    #[test]
    fn test_identity_equality() {
        let a = DataSource::table("users", &["id"]).unwrap();
        let b = DataSource::table("users", &["id"]).unwrap();
        let a2 = a.clone();
        assert_ne!(a, b);
        assert_eq!(a, a2);
        assert_eq!(a.id(), a2.id());
    }

    #[test]
    fn test_invalid_definitions() {
        assert!(DataSource::table("users", &[]).is_err());
        assert!(DataSource::table("", &["id"]).is_err());
        assert!(DataSource::query("SELECT 1", &["id", "ID"]).is_err());
        assert!(DataSource::query("SELECT 1", &[" "]).is_err());
    }
}

//! Deltacheck - Snapshot, delta and state assertions for data stores.
//!
//! A [`Session`] records snapshots of data sources and later checks how
//! their contents changed:
//!
//! - `populate` / `take_snapshot`: record the baseline of a source
//! - `assert_delta`, `assert_inserted`, `assert_deleted`, `assert_unchanged`:
//!   compare the baseline with a fresh observation against an expected change
//! - `assert_state`, `assert_empty`: compare a fresh observation against
//!   expected contents
//! - `assert_equals`: compare two data sets by value
//!
//! Every comparison is a multiset comparison: row order is ignored and
//! duplicate counts must match exactly.
//!
//! The session reaches the data store only through the [`QueryExecutor`] and
//! [`TablePopulator`] traits. [`MemoryStore`] implements both over in-memory
//! tables.
//!
//! # Example
//!
//! ```rust
//! use deltacheck::{values, DataSource, MemoryStore, Session, Value};
//!
//! let users = DataSource::table("users", &["id", "name"]).unwrap();
//! let mut store = MemoryStore::new();
//! store.create_table("users").unwrap();
//!
//! let mut session = Session::new(store);
//! let mut initial = users.data_set();
//! initial.row(values![1, "a"]).unwrap().row(values![2, "b"]).unwrap();
//! session.populate(&initial).unwrap();
//!
//! // Operation under test.
//! let store = session.backend_mut();
//! store.delete_where("users", |r| r.get(0) == Some(&Value::Int32(1))).unwrap();
//! store.insert("users", values![3, "c"]).unwrap();
//!
//! let mut old = users.data_set();
//! old.row(values![1, "a"]).unwrap();
//! let mut new = users.data_set();
//! new.row(values![3, "c"]).unwrap();
//! session.assert_delta(&old, &new).unwrap();
//!
//! let err = session.assert_deleted(&old).unwrap_err();
//! assert!(err.failure().is_some());
//! ```

pub mod assertion;
pub mod backend;
pub mod config;
pub mod error;
pub mod log;
pub mod memory;
pub mod session;

pub use assertion::{
    assert_equals, AssertionFailure, AssertionKind, AssertionRecord, Mismatch, Observed,
};
pub use backend::{BackendError, QueryExecutor, TablePopulator};
pub use config::{AssertConfig, SnapshotPolicy};
pub use error::{AssertError, ErrorKind, Operation, Result};
pub use log::{AssertionLog, TracingLog};
pub use memory::{MemoryStore, QueryHandler, StoreError};
pub use session::{Described, Session};

pub use deltacheck_core::{values, Builder, DataSet, DataSource, Row, SourceId, SourceKind, Value};
pub use deltacheck_diff::{DeltaMismatch, MismatchReport, MultisetDelta, RowMismatch};

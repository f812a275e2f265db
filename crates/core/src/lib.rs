//! Deltacheck Core - Values, rows, data sources and data sets.
//!
//! This crate provides the data model that deltacheck compares:
//!
//! - `Value`: A column value (Null, Boolean, Int32, Int64, Float64, String, DateTime, Bytes)
//! - `Row`: An immutable tuple of values with value-based equality
//! - `DataSource`: An identity-compared table or query
//! - `DataSet`: A multiset of rows bound to one data source
//! - `Builder`: Per-column row generation for a data set
//! - `Error`: Usage errors for data set operations
//!
//! Numeric values compare by mathematical value regardless of width, and
//! `Null` is equal only to `Null`.
//!
//! # Example
//!
//! ```rust
//! use deltacheck_core::{values, DataSource, Value};
//!
//! let users = DataSource::table("users", &["id", "name"]).unwrap();
//!
//! let mut data = users.data_set();
//! data.row(values![1, "Alice"]).unwrap();
//! data.row(values![2i64, Value::Null]).unwrap();
//!
//! assert_eq!(data.len(), 2);
//! assert_eq!(data.rows()[0].get(0), Some(&Value::Int64(1)));
//! assert!(data.row(values![3]).is_err());
//! ```

#![no_std]

extern crate alloc;

mod builder;
mod dataset;
mod error;
mod row;
mod source;
mod value;

pub use builder::Builder;
pub use dataset::DataSet;
pub use error::{Error, Result};
pub use row::Row;
pub use source::{DataSource, SourceId, SourceKind};
pub use value::{Normalized, Value};

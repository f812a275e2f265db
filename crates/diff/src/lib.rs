//! Deltacheck Diff - Multiset deltas and mismatch reports.
//!
//! This crate computes and explains differences between multisets of rows:
//!
//! - `Delta<T>`: A signed change to a data item (+k inserted, -k deleted)
//! - `RowBag`: A hash-bucketed two-sided row multiset
//! - `multiset_diff`: The (old, new) difference between two observations
//! - `MismatchReport` / `DeltaMismatch`: Per-row multiplicity differences
//!
//! Duplicates are never collapsed: a row present three times before and
//! once after contributes two copies to the old side.
//!
//! # Example
//!
//! ```rust
//! use deltacheck_core::{Row, Value};
//! use deltacheck_diff::{multiset_diff, MismatchReport};
//!
//! let r = |id: i64| Row::new(vec![Value::Int64(id)]);
//!
//! let before = vec![r(1), r(1), r(1), r(2)];
//! let after = vec![r(2), r(1), r(3)];
//!
//! let delta = multiset_diff(&before, &after);
//! assert_eq!(delta.old, vec![r(1), r(1)]);
//! assert_eq!(delta.new, vec![r(3)]);
//!
//! let report = MismatchReport::compare(&[r(1)], &[r(1), r(1)]);
//! assert!(!report.is_match());
//! ```

#![no_std]

extern crate alloc;

pub mod bag;
pub mod delta;
pub mod diff;
pub mod report;

pub use bag::{multiset_eq, BagEntry, RowBag, Side};
pub use delta::{net_count, Delta, DeltaBatch};
pub use diff::{multiset_diff, MultisetDelta};
pub use report::{DeltaMismatch, MismatchReport, RowMismatch};

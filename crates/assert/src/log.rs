//! Assertion logging.
//!
//! A [`Session`](crate::Session) reports assertions, queries, snapshots,
//! setup and collaborator failures to an [`AssertionLog`]. Which events are
//! reported is decided by [`AssertConfig`](crate::AssertConfig); the sink
//! only decides where they go. The default sink, [`TracingLog`], emits
//! `tracing` events.

use crate::assertion::AssertionRecord;
use crate::error::Operation;
use deltacheck_core::{DataSet, DataSource};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Receiver of session events.
pub trait AssertionLog {
    /// An assertion completed, passed or failed.
    fn assertion(&self, record: &AssertionRecord<'_>);

    /// An explicit query returned `data`.
    fn query(&self, _source: &DataSource, _data: &DataSet) {}

    /// `data` was recorded as the snapshot of `source`.
    fn snapshot(&self, _source: &DataSource, _data: &DataSet) {}

    /// `data` was written to its table.
    fn setup(&self, _source: &DataSource, _data: &DataSet) {}

    /// A collaborator call failed.
    fn execution_error(
        &self,
        _operation: Operation,
        _source: &DataSource,
        _error: &(dyn std::error::Error + 'static),
    ) {
    }
}

impl<T: AssertionLog + ?Sized> AssertionLog for Arc<T> {
    fn assertion(&self, record: &AssertionRecord<'_>) {
        (**self).assertion(record)
    }

    fn query(&self, source: &DataSource, data: &DataSet) {
        (**self).query(source, data)
    }

    fn snapshot(&self, source: &DataSource, data: &DataSet) {
        (**self).snapshot(source, data)
    }

    fn setup(&self, source: &DataSource, data: &DataSet) {
        (**self).setup(source, data)
    }

    fn execution_error(
        &self,
        operation: Operation,
        source: &DataSource,
        error: &(dyn std::error::Error + 'static),
    ) {
        (**self).execution_error(operation, source, error)
    }
}

/// Forwards session events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl AssertionLog for TracingLog {
    fn assertion(&self, record: &AssertionRecord<'_>) {
        let note = record.message.unwrap_or("");
        if record.passed() {
            info!(
                kind = %record.kind,
                source = %record.source,
                note,
                expected = %record.expected,
                actual = %record.actual,
                "assertion passed"
            );
        } else {
            warn!(
                kind = %record.kind,
                source = %record.source,
                note,
                expected = %record.expected,
                actual = %record.actual,
                diff = %record.mismatch,
                "assertion failed"
            );
        }
    }

    fn query(&self, source: &DataSource, data: &DataSet) {
        debug!(
            source = %source,
            sql = %source.query_text(),
            rows = data.len(),
            data = %data,
            "query"
        );
    }

    fn snapshot(&self, source: &DataSource, data: &DataSet) {
        debug!(source = %source, rows = data.len(), data = %data, "snapshot recorded");
    }

    fn setup(&self, source: &DataSource, data: &DataSet) {
        debug!(source = %source, rows = data.len(), data = %data, "table populated");
    }

    fn execution_error(
        &self,
        operation: Operation,
        source: &DataSource,
        error: &(dyn std::error::Error + 'static),
    ) {
        error!(operation = %operation, source = %source, error = %error, "collaborator call failed");
    }
}

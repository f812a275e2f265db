//! Assertion session: snapshot store plus delta and state engines.
//!
//! A `Session` owns one backend handle and the snapshots recorded through
//! it. Snapshots are keyed by data source identity and each source holds at
//! most one snapshot; recording a new one replaces the old one wholesale.
//!
//! Calls are synchronous and the session is not internally synchronized.
//! Callers running assertions from several threads must serialize access
//! per data source themselves.

use crate::assertion::{
    equality, AssertionFailure, AssertionKind, AssertionRecord, Mismatch, Observed,
};
use crate::backend::{BackendError, QueryExecutor, TablePopulator};
use crate::config::{AssertConfig, SnapshotPolicy};
use crate::error::{AssertError, Operation, Result};
use crate::log::{AssertionLog, TracingLog};
use deltacheck_core::{DataSet, DataSource, Error, Row, SourceId};
use deltacheck_diff::{multiset_diff, DeltaMismatch, MismatchReport};
use hashbrown::HashMap;

/// Assertion session over a backend `B`.
pub struct Session<B> {
    backend: B,
    config: AssertConfig,
    log: Box<dyn AssertionLog>,
    snapshots: HashMap<SourceId, DataSet>,
}

impl<B> Session<B> {
    /// Creates a session with the default configuration, logging to `tracing`.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, AssertConfig::default())
    }

    /// Creates a session with the given configuration.
    pub fn with_config(backend: B, config: AssertConfig) -> Self {
        Self {
            backend,
            config,
            log: Box::new(TracingLog),
            snapshots: HashMap::new(),
        }
    }

    /// Replaces the event sink.
    pub fn set_log(&mut self, log: impl AssertionLog + 'static) {
        self.log = Box::new(log);
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// Returns the configuration for modification.
    #[inline]
    pub fn config_mut(&mut self) -> &mut AssertConfig {
        &mut self.config
    }

    /// Returns the backend.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the backend for modification, e.g. to run the operation
    /// under test against it.
    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the session and returns the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Returns the snapshot recorded for `source`, if any.
    pub fn snapshot(&self, source: &DataSource) -> Option<&DataSet> {
        self.snapshots.get(&source.id())
    }

    /// Removes and returns the snapshot recorded for `source`.
    pub fn discard_snapshot(&mut self, source: &DataSource) -> Option<DataSet> {
        self.snapshots.remove(&source.id())
    }

    /// Returns a handle whose assertions carry `message` in their failures
    /// and log records.
    pub fn described<'s>(&'s mut self, message: &'s str) -> Described<'s, B> {
        Described {
            session: self,
            message,
        }
    }

    fn record(&mut self, data: DataSet) -> DataSet {
        let data = data.freeze();
        if self.config.log_snapshots {
            self.log.snapshot(data.source(), &data);
        }
        self.snapshots.insert(data.source().id(), data.clone());
        data
    }

    fn execution_failed(
        &self,
        operation: Operation,
        source: &DataSource,
        cause: BackendError,
    ) -> AssertError {
        if self.config.log_execution_errors {
            self.log.execution_error(operation, source, &*cause);
        }
        AssertError::execution(operation, source.to_string(), cause)
    }

    fn conclude(
        &self,
        kind: AssertionKind,
        message: Option<&str>,
        source: &DataSource,
        expected: Observed<'_>,
        actual: Observed<'_>,
        mismatch: Mismatch,
    ) -> Result<()> {
        let passed = mismatch.is_match();
        if self.config.logs_assertion(passed) {
            self.log.assertion(&AssertionRecord {
                kind,
                message,
                source,
                expected,
                actual,
                mismatch: &mismatch,
            });
        }
        if passed {
            Ok(())
        } else {
            Err(AssertionFailure::new(kind, message, source, mismatch).into())
        }
    }

    fn equals(&self, message: Option<&str>, expected: &DataSet, actual: &DataSet) -> Result<()> {
        self.conclude(
            AssertionKind::Equals,
            message,
            expected.source(),
            Observed::Data(expected.rows()),
            Observed::Data(actual.rows()),
            equality(expected, actual),
        )
    }

    /// Checks that two data sets are equal as multisets, irrespective of
    /// their data sources. Logged like any other assertion.
    pub fn assert_equals(&self, expected: &DataSet, actual: &DataSet) -> Result<()> {
        self.equals(None, expected, actual)
    }
}

impl<B: QueryExecutor> Session<B> {
    fn fetch(&mut self, source: &DataSource) -> Result<DataSet> {
        let outcome = self.backend.fetch(source).and_then(|data| {
            if data.source() == source {
                Ok(data)
            } else {
                Err(format!("fetch returned data for {}", data.source()).into())
            }
        });
        outcome.map_err(|cause| self.execution_failed(Operation::Fetch, source, cause))
    }

    /// Fetches the current rows of `source` without recording a snapshot.
    pub fn query(&mut self, source: &DataSource) -> Result<DataSet> {
        let data = self.fetch(source)?;
        if self.config.log_queries {
            self.log.query(source, &data);
        }
        Ok(data)
    }

    /// Fetches the current rows of `source` and records them as its
    /// snapshot. The returned data set is read-only.
    pub fn take_snapshot(&mut self, source: &DataSource) -> Result<DataSet> {
        let data = self.fetch(source)?;
        Ok(self.record(data))
    }

    fn delta(
        &mut self,
        message: Option<&str>,
        expected_old: &DataSet,
        expected_new: &DataSet,
    ) -> Result<()> {
        let source = expected_old.source();
        if expected_new.source() != source {
            return Err(Error::source_mismatch(source.to_string(), expected_new.source().to_string()).into());
        }
        self.delta_rows(message, source, expected_old.rows(), expected_new.rows())
    }

    fn delta_rows(
        &mut self,
        message: Option<&str>,
        source: &DataSource,
        expected_old: &[Row],
        expected_new: &[Row],
    ) -> Result<()> {
        let snapshot = self
            .snapshots
            .get(&source.id())
            .cloned()
            .ok_or_else(|| AssertError::NoSnapshot {
                source_name: source.to_string(),
            })?;
        let fresh = self.fetch(source)?;
        let actual = multiset_diff(snapshot.rows(), fresh.rows());
        let mismatch = DeltaMismatch::compare(expected_old, expected_new, &actual);
        let passed = mismatch.is_match();

        let outcome = self.conclude(
            AssertionKind::Delta,
            message,
            source,
            Observed::Delta {
                old: expected_old,
                new: expected_new,
            },
            Observed::Delta {
                old: &actual.old,
                new: &actual.new,
            },
            Mismatch::Delta(mismatch),
        );
        if !passed && self.config.snapshot_policy == SnapshotPolicy::DiscardOnFailure {
            self.snapshots.remove(&source.id());
        }
        outcome
    }

    fn state(&mut self, message: Option<&str>, source: &DataSource, expected: &[Row]) -> Result<()> {
        let fresh = self.fetch(source)?;
        let report = MismatchReport::compare(expected, fresh.rows());
        self.conclude(
            AssertionKind::State,
            message,
            source,
            Observed::Data(expected),
            Observed::Data(fresh.rows()),
            Mismatch::Data(report),
        )
    }

    /// Checks that, since the snapshot of their source, exactly
    /// `expected_old` was removed and exactly `expected_new` was added.
    ///
    /// Both data sets must share one data source, which must have a
    /// recorded snapshot. The snapshot is not modified when the assertion
    /// passes; see [`SnapshotPolicy`] for failures.
    pub fn assert_delta(&mut self, expected_old: &DataSet, expected_new: &DataSet) -> Result<()> {
        self.delta(None, expected_old, expected_new)
    }

    /// Checks that `data` was inserted and nothing else changed.
    pub fn assert_inserted(&mut self, data: &DataSet) -> Result<()> {
        self.delta_rows(None, data.source(), &[], data.rows())
    }

    /// Checks that `data` was deleted and nothing else changed.
    pub fn assert_deleted(&mut self, data: &DataSet) -> Result<()> {
        self.delta_rows(None, data.source(), data.rows(), &[])
    }

    /// Checks that `source` is unchanged since its snapshot.
    pub fn assert_unchanged(&mut self, source: &DataSource) -> Result<()> {
        self.delta_rows(None, source, &[], &[])
    }

    /// Checks that the source of `expected` currently holds exactly
    /// `expected`. No snapshot is needed or touched.
    pub fn assert_state(&mut self, expected: &DataSet) -> Result<()> {
        self.state(None, expected.source(), expected.rows())
    }

    /// Checks that `source` currently holds no rows.
    pub fn assert_empty(&mut self, source: &DataSource) -> Result<()> {
        self.state(None, source, &[])
    }
}

impl<B: TablePopulator> Session<B> {
    /// Makes the table of `data`'s source hold exactly `data` and records
    /// `data` as its snapshot without querying the table again.
    pub fn populate(&mut self, data: &DataSet) -> Result<()> {
        let source = data.source();
        if !source.is_table() {
            return Err(Error::invalid_operation(format!("cannot populate {}", source)).into());
        }
        if let Err(cause) = self.backend.populate(data) {
            return Err(self.execution_failed(Operation::Populate, source, cause));
        }
        if self.config.log_setup {
            self.log.setup(source, data);
        }
        self.record(data.copy_of());
        Ok(())
    }
}

/// Assertions on a [`Session`] that carry a descriptive message.
pub struct Described<'s, B> {
    session: &'s mut Session<B>,
    message: &'s str,
}

impl<B> Described<'_, B> {
    /// See [`Session::assert_equals`].
    pub fn assert_equals(&self, expected: &DataSet, actual: &DataSet) -> Result<()> {
        self.session.equals(Some(self.message), expected, actual)
    }
}

impl<B: QueryExecutor> Described<'_, B> {
    /// See [`Session::assert_delta`].
    pub fn assert_delta(&mut self, expected_old: &DataSet, expected_new: &DataSet) -> Result<()> {
        self.session.delta(Some(self.message), expected_old, expected_new)
    }

    /// See [`Session::assert_inserted`].
    pub fn assert_inserted(&mut self, data: &DataSet) -> Result<()> {
        self.session
            .delta_rows(Some(self.message), data.source(), &[], data.rows())
    }

    /// See [`Session::assert_deleted`].
    pub fn assert_deleted(&mut self, data: &DataSet) -> Result<()> {
        self.session
            .delta_rows(Some(self.message), data.source(), data.rows(), &[])
    }

    /// See [`Session::assert_unchanged`].
    pub fn assert_unchanged(&mut self, source: &DataSource) -> Result<()> {
        self.session.delta_rows(Some(self.message), source, &[], &[])
    }

    /// See [`Session::assert_state`].
    pub fn assert_state(&mut self, expected: &DataSet) -> Result<()> {
        self.session
            .state(Some(self.message), expected.source(), expected.rows())
    }

    /// See [`Session::assert_empty`].
    pub fn assert_empty(&mut self, source: &DataSource) -> Result<()> {
        self.session.state(Some(self.message), source, &[])
    }
}

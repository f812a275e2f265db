//! Session configuration.

use serde::Deserialize;

/// What happens to a snapshot when a delta assertion against it fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPolicy {
    /// Keep the snapshot; a later delta assertion compares against it again.
    #[default]
    Retain,
    /// Drop the snapshot; a new one must be recorded before the next delta
    /// assertion on that source.
    DiscardOnFailure,
}

/// Logging switches and snapshot policy of a [`Session`](crate::Session).
///
/// Logging never changes the outcome of an assertion.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssertConfig {
    /// Log every assertion, passed or failed.
    pub log_assertions: bool,
    /// Log failed assertions.
    pub log_assertion_errors: bool,
    /// Log collaborator failures.
    pub log_execution_errors: bool,
    /// Log data returned by explicit queries.
    pub log_queries: bool,
    /// Log recorded snapshots.
    pub log_snapshots: bool,
    /// Log table population.
    pub log_setup: bool,
    /// Snapshot handling after a failed delta assertion.
    pub snapshot_policy: SnapshotPolicy,
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            log_assertions: false,
            log_assertion_errors: true,
            log_execution_errors: true,
            log_queries: false,
            log_snapshots: false,
            log_setup: false,
            snapshot_policy: SnapshotPolicy::Retain,
        }
    }
}

impl AssertConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables every logging switch.
    pub fn full_logging(mut self) -> Self {
        self.log_assertions = true;
        self.log_assertion_errors = true;
        self.log_execution_errors = true;
        self.log_queries = true;
        self.log_snapshots = true;
        self.log_setup = true;
        self
    }

    /// Disables every logging switch.
    pub fn quiet(mut self) -> Self {
        self.log_assertions = false;
        self.log_assertion_errors = false;
        self.log_execution_errors = false;
        self.log_queries = false;
        self.log_snapshots = false;
        self.log_setup = false;
        self
    }

    /// Sets whether passed assertions are logged too.
    pub fn with_log_assertions(mut self, enabled: bool) -> Self {
        self.log_assertions = enabled;
        self
    }

    /// Sets whether failed assertions are logged.
    pub fn with_log_assertion_errors(mut self, enabled: bool) -> Self {
        self.log_assertion_errors = enabled;
        self
    }

    /// Sets whether collaborator failures are logged.
    pub fn with_log_execution_errors(mut self, enabled: bool) -> Self {
        self.log_execution_errors = enabled;
        self
    }

    /// Sets whether explicit query results are logged.
    pub fn with_log_queries(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// Sets whether recorded snapshots are logged.
    pub fn with_log_snapshots(mut self, enabled: bool) -> Self {
        self.log_snapshots = enabled;
        self
    }

    /// Sets whether table population is logged.
    pub fn with_log_setup(mut self, enabled: bool) -> Self {
        self.log_setup = enabled;
        self
    }

    /// Sets the snapshot policy.
    pub fn with_snapshot_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.snapshot_policy = policy;
        self
    }

    pub(crate) fn logs_assertion(&self, passed: bool) -> bool {
        self.log_assertions || (!passed && self.log_assertion_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AssertConfig::default();
        assert!(config.log_assertion_errors);
        assert!(config.log_execution_errors);
        assert!(!config.log_assertions);
        assert_eq!(config.snapshot_policy, SnapshotPolicy::Retain);
        assert!(config.logs_assertion(false));
        assert!(!config.logs_assertion(true));
    }

    #[test]
    fn test_builders() {
        let config = AssertConfig::new().full_logging();
        assert!(config.log_queries && config.log_snapshots && config.log_setup);
        assert!(config.logs_assertion(true));

        let config = config.quiet();
        assert!(!config.logs_assertion(false));

        let config = AssertConfig::new()
            .with_log_assertion_errors(false)
            .with_snapshot_policy(SnapshotPolicy::DiscardOnFailure);
        assert!(!config.logs_assertion(false));
        assert_eq!(config.snapshot_policy, SnapshotPolicy::DiscardOnFailure);
    }

    #[test]
    fn test_event_switch_builders() {
        let config = AssertConfig::new()
            .quiet()
            .with_log_queries(true)
            .with_log_setup(true);
        assert!(config.log_queries && config.log_setup);
        assert!(!config.log_snapshots && !config.log_execution_errors);

        let config = config
            .with_log_queries(false)
            .with_log_snapshots(true)
            .with_log_execution_errors(true);
        assert!(!config.log_queries);
        assert!(config.log_snapshots && config.log_execution_errors && config.log_setup);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: AssertConfig = serde_json::from_str(
            r#"{ "log_assertions": true, "snapshot_policy": "discard_on_failure" }"#,
        )
        .unwrap();
        assert!(config.log_assertions);
        assert!(config.log_assertion_errors);
        assert_eq!(config.snapshot_policy, SnapshotPolicy::DiscardOnFailure);
    }
}

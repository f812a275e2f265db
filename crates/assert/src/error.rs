//! Error types for assertions.
//!
//! Three kinds of error leave an assertion call, and callers can tell them
//! apart with [`AssertError::kind`]:
//!
//! - usage errors: the test itself is wrong (no snapshot, malformed data)
//! - assertion failures: the data store does not hold the expected data
//! - execution errors: a collaborator failed to fetch or populate

use crate::assertion::AssertionFailure;
use crate::backend::BackendError;
use std::fmt;
use thiserror::Error;

/// Result type alias for assertion operations.
pub type Result<T> = std::result::Result<T, AssertError>;

/// Collaborator operation that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Populate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Fetch => f.write_str("fetch"),
            Operation::Populate => f.write_str("populate"),
        }
    }
}

/// Coarse classification of an [`AssertError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Assertion,
    Execution,
}

/// Error returned by assertion and snapshot operations.
#[derive(Debug, Error)]
pub enum AssertError {
    /// Malformed data set operation.
    #[error("usage error: {0}")]
    Usage(#[from] deltacheck_core::Error),

    /// Delta assertion on a source without a recorded snapshot.
    #[error("usage error: no snapshot recorded for {source_name}")]
    NoSnapshot { source_name: String },

    /// The observed data did not match the expectation.
    #[error("{0}")]
    Failed(Box<AssertionFailure>),

    /// A collaborator call failed; no comparison was made.
    #[error("execution error: {operation} on {source_name} failed: {cause}")]
    Execution {
        operation: Operation,
        source_name: String,
        #[source]
        cause: BackendError,
    },
}

impl AssertError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssertError::Usage(_) | AssertError::NoSnapshot { .. } => ErrorKind::Usage,
            AssertError::Failed(_) => ErrorKind::Assertion,
            AssertError::Execution { .. } => ErrorKind::Execution,
        }
    }

    /// Returns true for test-authoring mistakes.
    #[inline]
    pub fn is_usage(&self) -> bool {
        self.kind() == ErrorKind::Usage
    }

    /// Returns the failure details if this is an assertion failure.
    pub fn failure(&self) -> Option<&AssertionFailure> {
        match self {
            AssertError::Failed(failure) => Some(failure.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn execution(
        operation: Operation,
        source_name: impl Into<String>,
        cause: BackendError,
    ) -> Self {
        AssertError::Execution {
            operation,
            source_name: source_name.into(),
            cause,
        }
    }
}

impl From<AssertionFailure> for AssertError {
    fn from(failure: AssertionFailure) -> Self {
        AssertError::Failed(Box::new(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_kinds() {
        let err = AssertError::from(deltacheck_core::Error::arity_mismatch(2, 1));
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.to_string().contains("2 columns expected"));

        let err = AssertError::NoSnapshot {
            source_name: "table users".into(),
        };
        assert!(err.is_usage());
        assert!(err.failure().is_none());
    }

    #[test]
    fn test_execution_error_keeps_cause() {
        let err = AssertError::execution(Operation::Fetch, "table users", "connection reset".into());
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert_eq!(
            err.to_string(),
            "execution error: fetch on table users failed: connection reset"
        );
        assert_eq!(err.source().unwrap().to_string(), "connection reset");
    }
}

//! Topology store error types
//!
//! Error codes:
//! - GMHA_TOPOLOGY_INVALID_INPUT (validation)
//! - GMHA_TOPOLOGY_NOT_FOUND (not found)
//! - GMHA_TOPOLOGY_DUPLICATE (validation)
//! - GMHA_TOPOLOGY_PERSISTENCE (persistence)
//! - GMHA_TOPOLOGY_CORRUPTED (persistence)
//!
//! None of these terminate the process; the dispatcher reports them and
//! reads the next command.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification used by the dispatcher when reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed operator input
    Validation,
    /// Referenced cluster does not exist
    NotFound,
    /// Storage read/write or encoding failure
    Persistence,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "VALIDATION"),
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::Persistence => write!(f, "PERSISTENCE"),
        }
    }
}

/// Errors returned by [`TopologyStore`](super::TopologyStore)
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("cluster already exists: {0}")]
    DuplicateCluster(String),

    /// The embedded database rejected an operation
    #[error("{context}: {source}")]
    Persistence {
        context: &'static str,
        #[source]
        source: redb::Error,
    },

    #[error("failed to create store directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stored value no longer decodes
    #[error("corrupted record in table '{table}' at key '{key}': {source}")]
    Corrupted {
        table: &'static str,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TopologyError {
    /// Wrap any redb error with the operation that produced it.
    pub(crate) fn persistence<E>(context: &'static str) -> impl FnOnce(E) -> Self
    where
        E: Into<redb::Error>,
    {
        move |source| TopologyError::Persistence {
            context,
            source: source.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TopologyError::InvalidInput(_) => "GMHA_TOPOLOGY_INVALID_INPUT",
            TopologyError::ClusterNotFound(_) => "GMHA_TOPOLOGY_NOT_FOUND",
            TopologyError::DuplicateCluster(_) => "GMHA_TOPOLOGY_DUPLICATE",
            TopologyError::Persistence { .. }
            | TopologyError::Directory { .. }
            | TopologyError::Encode(_) => "GMHA_TOPOLOGY_PERSISTENCE",
            TopologyError::Corrupted { .. } => "GMHA_TOPOLOGY_CORRUPTED",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TopologyError::InvalidInput(_) | TopologyError::DuplicateCluster(_) => {
                ErrorKind::Validation
            }
            TopologyError::ClusterNotFound(_) => ErrorKind::NotFound,
            TopologyError::Persistence { .. }
            | TopologyError::Directory { .. }
            | TopologyError::Corrupted { .. }
            | TopologyError::Encode(_) => ErrorKind::Persistence,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TopologyError::ClusterNotFound("x".into()).code(),
            "GMHA_TOPOLOGY_NOT_FOUND"
        );
        assert_eq!(
            TopologyError::DuplicateCluster("x".into()).code(),
            "GMHA_TOPOLOGY_DUPLICATE"
        );
        assert_eq!(
            TopologyError::InvalidInput("x".into()).code(),
            "GMHA_TOPOLOGY_INVALID_INPUT"
        );
    }

    #[test]
    fn test_kinds() {
        assert!(TopologyError::ClusterNotFound("a".into()).is_not_found());
        assert_eq!(
            TopologyError::DuplicateCluster("a".into()).kind(),
            ErrorKind::Validation
        );

        let bad = serde_json::from_slice::<Vec<u8>>(b"{").unwrap_err();
        let err = TopologyError::Corrupted {
            table: "hosts",
            key: "demo".into(),
            source: bad,
        };
        assert_eq!(err.kind(), ErrorKind::Persistence);
        let display = err.to_string();
        assert!(display.contains("hosts"));
        assert!(display.contains("demo"));
    }
}

//! Error types for jotter-core

use std::time::Duration;

use thiserror::Error;

/// Result type alias using jotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jotter-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error raised by the local cache
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP transport error raised by the remote document store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local cache failure that is not a SQLite error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Remote document store failure
    #[error("Network error: {0}")]
    Network(String),

    /// A cache or network call did not finish in time
    #[error("{kind} call timed out after {after:?}")]
    Timeout { kind: ErrorKind, after: Duration },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Timestamp string could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Configuration could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Which side of the sync boundary an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Cache,
    Network,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => f.write_str("cache"),
            Self::Network => f.write_str("network"),
            Self::Other => f.write_str("other"),
        }
    }
}

impl Error {
    /// Classify the error as a cache or network failure.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(_) | Self::Cache(_) => ErrorKind::Cache,
            Self::Http(_) | Self::Network(_) => ErrorKind::Network,
            Self::Timeout { kind, .. } => *kind,
            _ => ErrorKind::Other,
        }
    }

    /// Returns true when the call was cut off by a timeout.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

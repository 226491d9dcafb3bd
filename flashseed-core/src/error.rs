/// Structured error types for flashseed-core.
///
/// Each variant names the step that failed so the binary can print a
/// diagnostic without inspecting the underlying driver error.
use std::time::Duration;

use thiserror::Error;

use crate::models::ValidationError;

/// Main error type for flashseed-core operations
#[derive(Error, Debug)]
pub enum SeedError {
    /// Store unreachable or connection setup failed
    #[error("failed to connect to data store at {target}: {source}")]
    Connectivity {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// Connection setup did not finish within the connect timeout
    #[error("failed to connect to data store at {target}: timed out after {waited:?}")]
    ConnectTimeout { target: String, waited: Duration },

    /// Insert or update rejected by the store
    #[error("write to collection '{collection}' failed: {source}")]
    Write {
        collection: String,
        #[source]
        source: sqlx::Error,
    },

    /// Select rejected or connection lost mid-read
    #[error("read from collection '{collection}' failed: {source}")]
    Read {
        collection: String,
        #[source]
        source: sqlx::Error,
    },

    /// Connection release exceeded the bounded wait
    #[error("teardown did not complete within {waited:?}; connection abandoned")]
    TeardownTimeout { waited: Duration },

    /// Connection release reported an error
    #[error("teardown failed: {source}")]
    Teardown {
        #[source]
        source: sqlx::Error,
    },

    /// Update matched no record
    #[error("no flashcard with id {id}")]
    NotFound { id: i64 },

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A configured value failed validation
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type alias for flashseed-core operations
pub type Result<T> = std::result::Result<T, SeedError>;

impl SeedError {
    /// Create a connectivity error for the given target
    pub fn connectivity(target: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Connectivity {
            target: target.into(),
            source,
        }
    }

    /// Create a write error for the given collection
    pub fn write(collection: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Write {
            collection: collection.into(),
            source,
        }
    }

    /// Create a read error for the given collection
    pub fn read(collection: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Read {
            collection: collection.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Whether this error should abort the run.
    ///
    /// Only an abandoned teardown is tolerated: the work has finished by the
    /// time the bound expires. A close that reports an error is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TeardownTimeout { .. })
    }
}

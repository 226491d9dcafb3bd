//! Rejections for configured values.
//!
//! The collection name is spliced into SQL as an identifier, so it is checked
//! before any connection is opened. `field` names the setting that failed,
//! as it appears in the config file and in `FLASHSEED_*` variables.

use thiserror::Error;

/// A configured value was refused before reaching the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Longer than Postgres keeps for an identifier
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

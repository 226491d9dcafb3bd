//! Collection name validation
//!
//! Table names cannot be bound as query parameters, so the name is checked
//! against a strict identifier pattern and always emitted quoted.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Postgres truncates identifiers longer than this (NAMEDATALEN - 1)
const MAX_COLLECTION_NAME_LEN: usize = 63;

/// Default collection holding the flashcards
pub const DEFAULT_COLLECTION: &str = "flashcards";

/// Lowercase identifier: letter or underscore first, then letters, digits, underscores
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("invalid identifier regex"));

const IDENT_RULE: &str =
    "must be lowercase letters, digits or underscores, not starting with a digit";

/// Validated collection (table) name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Create a new collection name, validating identifier format.
    ///
    /// # Rules
    /// - Max 63 characters
    /// - Lowercase ASCII letters, digits, underscores
    /// - Must not start with a digit
    ///
    /// # Example
    /// ```
    /// use flashseed_core::models::CollectionName;
    ///
    /// assert!(CollectionName::new("flashcards").is_ok());
    /// assert!(CollectionName::new("Flashcards").is_err());
    /// assert!(CollectionName::new("cards; drop table x").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "collection" });
        }

        if s.len() > MAX_COLLECTION_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "collection",
                max: MAX_COLLECTION_NAME_LEN,
            });
        }

        if !IDENT_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "collection",
                reason: IDENT_RULE,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the collection name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a quoted SQL identifier.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl Default for CollectionName {
    fn default() -> Self {
        Self(DEFAULT_COLLECTION.to_owned())
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CollectionName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CollectionName> for String {
    fn from(value: CollectionName) -> Self {
        value.0
    }
}

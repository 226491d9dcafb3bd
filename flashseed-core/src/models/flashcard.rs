//! Flashcard record

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

/// One stored flashcard.
///
/// `id` is assigned by the store at insert time; `prompt` is opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i64,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl Flashcard {
    /// Decode a row produced by `SELECT *` / `RETURNING *`.
    ///
    /// Accepts `integer` or `bigint` ids, and treats a missing `answer`
    /// column as no answer.
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let id = match row.try_get::<i64, _>("id") {
            Ok(id) => id,
            Err(sqlx::Error::ColumnDecode { .. }) => i64::from(row.try_get::<i32, _>("id")?),
            Err(e) => return Err(e),
        };

        let answer = match row.try_get::<Option<String>, _>("answer") {
            Ok(answer) => answer,
            Err(sqlx::Error::ColumnNotFound(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            id,
            prompt: row.try_get("prompt")?,
            answer,
        })
    }
}

//! Postgres-backed store over a single connection (no pool).

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{ConnectOptions, Connection, PgConnection};
use tracing::debug;

use super::FlashcardStore;
use crate::error::{Result, SeedError};
use crate::models::{CollectionName, Flashcard};

/// Flashcard collection on one exclusively owned `PgConnection`.
pub struct PgFlashcardStore {
    conn: PgConnection,
    collection: CollectionName,
}

impl PgFlashcardStore {
    /// Open one connection. Failures are returned as the raw driver error so
    /// the caller can attach the target.
    pub async fn connect(
        options: &PgConnectOptions,
        collection: CollectionName,
    ) -> std::result::Result<Self, sqlx::Error> {
        let conn = options.connect().await?;
        Ok(Self { conn, collection })
    }

    fn write_err(&self, source: sqlx::Error) -> SeedError {
        SeedError::write(self.collection.as_str(), source)
    }

    fn read_err(&self, source: sqlx::Error) -> SeedError {
        SeedError::read(self.collection.as_str(), source)
    }
}

/// Insert statement for `collection`. The answer column is only named when
/// an answer is supplied, so collections without one still accept prompts.
fn insert_statement(collection: &CollectionName, with_answer: bool) -> String {
    if with_answer {
        format!(
            "INSERT INTO {} (prompt, answer) VALUES ($1, $2) RETURNING *",
            collection.quoted()
        )
    } else {
        format!("INSERT INTO {} (prompt) VALUES ($1) RETURNING *", collection.quoted())
    }
}

fn decode_all(rows: &[PgRow]) -> std::result::Result<Vec<Flashcard>, sqlx::Error> {
    rows.iter().map(Flashcard::from_row).collect()
}

#[async_trait]
impl FlashcardStore for PgFlashcardStore {
    fn collection(&self) -> &CollectionName {
        &self.collection
    }

    async fn insert(&mut self, prompt: &str, answer: Option<&str>) -> Result<Flashcard> {
        let sql = insert_statement(&self.collection, answer.is_some());

        let mut query = sqlx::query(&sql).bind(prompt);
        if let Some(answer) = answer {
            query = query.bind(answer);
        }

        let row = query
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| self.write_err(e))?;
        let card = Flashcard::from_row(&row).map_err(|e| self.write_err(e))?;

        debug!(id = card.id, collection = %self.collection, "inserted flashcard");
        Ok(card)
    }

    async fn list(&mut self) -> Result<Vec<Flashcard>> {
        let sql = format!("SELECT * FROM {}", self.collection.quoted());

        let rows = sqlx::query(&sql)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| self.read_err(e))?;
        let cards = decode_all(&rows).map_err(|e| self.read_err(e))?;

        debug!(count = cards.len(), collection = %self.collection, "read flashcards");
        Ok(cards)
    }

    async fn set_answer(&mut self, id: i64, answer: &str) -> Result<Flashcard> {
        let sql = format!(
            "UPDATE {} SET answer = $1 WHERE id = $2 RETURNING *",
            self.collection.quoted()
        );

        let row = sqlx::query(&sql)
            .bind(answer)
            .bind(id)
            .fetch_optional(&mut self.conn)
            .await
            .map_err(|e| self.write_err(e))?
            .ok_or(SeedError::NotFound { id })?;

        Flashcard::from_row(&row).map_err(|e| self.write_err(e))
    }

    async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|source| SeedError::Teardown { source })
    }
}

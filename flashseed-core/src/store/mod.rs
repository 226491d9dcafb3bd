//! Store access behind a trait so the session and pipeline can run against
//! Postgres or an in-memory collection.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CollectionName, Flashcard};

pub use memory::MemoryStore;
pub use postgres::PgFlashcardStore;

/// One open handle to a flashcard collection.
#[async_trait]
pub trait FlashcardStore: Send {
    /// Collection this handle reads and writes.
    fn collection(&self) -> &CollectionName;

    /// Append one flashcard. The prompt and the optional answer are passed
    /// as bound values.
    async fn insert(&mut self, prompt: &str, answer: Option<&str>) -> Result<Flashcard>;

    /// All flashcards in store order.
    async fn list(&mut self) -> Result<Vec<Flashcard>>;

    /// Set the answer of an existing flashcard.
    async fn set_answer(&mut self, id: i64, answer: &str) -> Result<Flashcard>;

    /// Release the underlying connection.
    async fn close(self) -> Result<()>
    where
        Self: Sized;
}

//! In-memory store used by tests and dry runs of the pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::FlashcardStore;
use crate::error::{Result, SeedError};
use crate::models::{CollectionName, Flashcard};

/// Collection kept in a `Vec`, with ids assigned like a serial column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: CollectionName,
    cards: Vec<Flashcard>,
    next_id: i64,
    close_delay: Option<Duration>,
    close_error: bool,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new(collection: CollectionName) -> Self {
        Self {
            collection,
            ..Self::default()
        }
    }

    /// Start from existing cards; new ids continue after the highest one.
    pub fn with_cards(mut self, cards: Vec<Flashcard>) -> Self {
        self.next_id = cards.iter().map(|c| c.id).max().unwrap_or(0);
        self.cards = cards;
        self
    }

    /// Make `close` take this long, to exercise the teardown bound.
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = Some(delay);
        self
    }

    /// Make `close` report a driver error.
    pub fn with_close_error(mut self) -> Self {
        self.close_error = true;
        self
    }

    /// Flag that flips to true once `close` has completed.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

#[async_trait]
impl FlashcardStore for MemoryStore {
    fn collection(&self) -> &CollectionName {
        &self.collection
    }

    async fn insert(&mut self, prompt: &str, answer: Option<&str>) -> Result<Flashcard> {
        self.next_id += 1;
        let card = Flashcard {
            id: self.next_id,
            prompt: prompt.to_owned(),
            answer: answer.map(str::to_owned),
        };
        self.cards.push(card.clone());
        Ok(card)
    }

    async fn list(&mut self) -> Result<Vec<Flashcard>> {
        Ok(self.cards.clone())
    }

    async fn set_answer(&mut self, id: i64, answer: &str) -> Result<Flashcard> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(SeedError::NotFound { id })?;
        card.answer = Some(answer.to_owned());
        Ok(card.clone())
    }

    async fn close(self) -> Result<()> {
        if let Some(delay) = self.close_delay {
            tokio::time::sleep(delay).await;
        }
        if self.close_error {
            return Err(SeedError::Teardown {
                source: sqlx::Error::WorkerCrashed,
            });
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

//! The seed-and-dump sequence: write one prompt, read the collection back.

use tracing::info;

use crate::error::Result;
use crate::models::Flashcard;
use crate::store::FlashcardStore;

/// Prompt inserted when the caller does not supply one.
pub const DEFAULT_PROMPT: &str = "how big is a football stadium";

/// Insert `prompt` (with `answer`, if given), then read every flashcard.
///
/// The read only runs once the write has succeeded.
pub async fn seed_and_dump<S: FlashcardStore>(
    store: &mut S,
    prompt: &str,
    answer: Option<&str>,
) -> Result<Vec<Flashcard>> {
    let created = store.insert(prompt, answer).await?;
    info!(id = created.id, collection = %store.collection(), "wrote flashcard");

    dump(store).await
}

/// Read every flashcard in store order.
pub async fn dump<S: FlashcardStore>(store: &mut S) -> Result<Vec<Flashcard>> {
    let cards = store.list().await?;
    info!(count = cards.len(), collection = %store.collection(), "read flashcards");
    Ok(cards)
}

/// Set the answer of one flashcard.
pub async fn answer<S: FlashcardStore>(
    store: &mut S,
    id: i64,
    answer: &str,
) -> Result<Flashcard> {
    let card = store.set_answer(id, answer).await?;
    info!(id = card.id, collection = %store.collection(), "answered flashcard");
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::models::CollectionName;
    use crate::store::MemoryStore;

    fn card(id: i64, prompt: &str) -> Flashcard {
        Flashcard {
            id,
            prompt: prompt.into(),
            answer: None,
        }
    }

    #[tokio::test]
    async fn empty_collection_end_to_end() {
        let mut store = MemoryStore::new(CollectionName::default());

        let cards = seed_and_dump(&mut store, DEFAULT_PROMPT, None).await.unwrap();

        assert_eq!(cards, vec![card(1, "how big is a football stadium")]);
    }

    #[tokio::test]
    async fn write_adds_exactly_one_record_with_fresh_id() {
        let existing = vec![card(1, "a"), card(2, "b"), card(5, "c")];
        let mut store = MemoryStore::new(CollectionName::default()).with_cards(existing.clone());
        let seen: HashSet<i64> = existing.iter().map(|c| c.id).collect();

        let after = seed_and_dump(&mut store, "capital of peru", None).await.unwrap();

        assert_eq!(after.len(), existing.len() + 1);
        let added: Vec<_> = after.iter().filter(|c| !existing.contains(c)).collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].prompt, "capital of peru");
        assert!(!seen.contains(&added[0].id));
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let existing = vec![card(1, "a"), card(2, "b")];
        let mut store = MemoryStore::new(CollectionName::default()).with_cards(existing);

        let first: HashSet<Flashcard> = dump(&mut store).await.unwrap().into_iter().collect();
        let second: HashSet<Flashcard> = dump(&mut store).await.unwrap().into_iter().collect();

        assert_eq!(first, second);
    }

    // The memory store never builds SQL; injection through a bound prompt is
    // covered by the ignored Postgres tests in store::postgres.
    #[tokio::test]
    async fn command_syntax_passes_through_pipeline_unchanged() {
        let mut store = MemoryStore::new(CollectionName::default());
        let payload = "\"); DROP TABLE flashcards; --";

        let cards = seed_and_dump(&mut store, payload, Some(payload)).await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].prompt, payload);
        assert_eq!(cards[0].answer.as_deref(), Some(payload));
    }

    #[tokio::test]
    async fn seed_with_answer_reports_answered_card() {
        let mut store = MemoryStore::new(CollectionName::default()).with_cards(vec![card(1, "a")]);

        let cards = seed_and_dump(&mut store, "capital of peru", Some("lima")).await.unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].prompt, "capital of peru");
        assert_eq!(cards[1].answer.as_deref(), Some("lima"));
    }

    #[tokio::test]
    async fn answer_sets_one_card() {
        let mut store = MemoryStore::new(CollectionName::default()).with_cards(vec![card(3, "q")]);

        let answered = answer(&mut store, 3, "a").await.unwrap();

        assert_eq!(answered.answer.as_deref(), Some("a"));
        assert_eq!(dump(&mut store).await.unwrap(), vec![answered]);
    }
}

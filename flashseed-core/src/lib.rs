//! flashseed-core: seed one flashcard into a Postgres collection and dump
//! the collection back, over a single connection that is always released
//! within a bounded wait.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, SeedError};
pub use models::{CollectionName, Flashcard, ValidationError};
pub use report::ReportFormat;
pub use store::{FlashcardStore, MemoryStore, PgFlashcardStore};

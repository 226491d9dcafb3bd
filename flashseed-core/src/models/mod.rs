//! Domain models: flashcard records and the validated collection name.

mod collection;
mod flashcard;
mod validation;

pub use collection::CollectionName;
pub use flashcard::Flashcard;
pub use validation::ValidationError;

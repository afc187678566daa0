//! Core deck library shared by the storage service and the CLI.
//!
//! Provides:
//! - Content-addressed deck identities and the Card value type
//! - The Deck / DeckService contract with an in-memory backend
//! - A batched card generation cache over an external card source
//! - A router that turns raw search responses into structured results

pub mod deck;
pub mod error;
pub mod generation;
pub mod memory;
pub mod search;
pub mod types;

pub use deck::{Deck, DeckService};
pub use error::{DeckError, GenerationError, InvalidDeckId, SearchError};
pub use generation::{
    BatchCardGenerator, CardGenerator, CardSource, FixedCardGenerator, DEFAULT_BATCH_SIZE,
};
pub use memory::{MemoryDeck, MemoryDeckService};
pub use search::{article_text, classify, route, ArticleFetch, DocumentSearch, ResponseShape};
pub use types::{normalize_name, Card, CardKey, DeckId, SearchResult};

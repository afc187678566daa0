//! Error types for scroll-core.

use crate::types::DeckId;
use thiserror::Error;

/// Errors raised by deck and directory operations, whatever the backend.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck not found: {0}")]
    NotFound(DeckId),

    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A string that is not a well-formed deck identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid deck id: {value:?}")]
pub struct InvalidDeckId {
    pub value: String,
}

/// Errors raised while classifying or fetching search responses.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("response shape not recognized: {url}")]
    UnrecognizedShape { url: String },

    #[error("invalid response url: {0}")]
    InvalidUrl(String),

    #[error("search endpoint returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors raised while producing generated cards.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator produced nothing for theme {theme:?} ({instructions:?})")]
    Exhausted { theme: String, instructions: String },

    #[error("document search failed: {0}")]
    Search(#[from] SearchError),

    #[error("generation failed: {0}")]
    Upstream(String),
}

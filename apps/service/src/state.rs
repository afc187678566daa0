//! Application state.

use crate::config::Config;
use crate::db::{DbError, SqlDeckService};
use scroll_core::{
    BatchCardGenerator, Card, CardGenerator, CardSource, Deck, DeckError, DeckId, DeckService,
    GenerationError, DEFAULT_BATCH_SIZE,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors from operations that span decks and generation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("no card generator configured")]
    NoGenerator,
}

/// Everything a front end needs, owned by the caller and passed around
/// explicitly.
pub struct AppState {
    pub decks: SqlDeckService,
    batch_size: usize,
    generator: Option<Arc<dyn CardGenerator + Send + Sync>>,
}

impl AppState {
    pub fn new(decks: SqlDeckService) -> Self {
        Self {
            decks,
            batch_size: DEFAULT_BATCH_SIZE,
            generator: None,
        }
    }

    /// Open the deck database named by `config` and adopt its batch size.
    pub fn from_config(config: &Config) -> Result<Self, DbError> {
        let mut state = Self::new(SqlDeckService::open(&config.sql)?);
        state.batch_size = config.generation.batch_size;
        Ok(state)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn with_generator(mut self, generator: Arc<dyn CardGenerator + Send + Sync>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Serve generated cards from `source` in batches of the configured size.
    pub fn with_card_source<S>(self, source: S) -> Self
    where
        S: CardSource + Send + Sync + 'static,
    {
        let batch_size = self.batch_size;
        self.with_generator(Arc::new(BatchCardGenerator::new(source, batch_size)))
    }

    /// Generate one card for the theme and append it to the deck.
    pub fn add_generated_card(
        &self,
        deck_id: &DeckId,
        theme: &str,
        instructions: &str,
    ) -> Result<Card, AppError> {
        let generator = self.generator.as_ref().ok_or(AppError::NoGenerator)?;
        let deck = self
            .decks
            .get(deck_id)?
            .ok_or_else(|| DeckError::NotFound(deck_id.clone()))?;

        let card = generator.create_card(theme, instructions)?;
        deck.add(card.clone())?;
        Ok(card)
    }
}

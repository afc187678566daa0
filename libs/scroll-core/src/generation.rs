//! Card generation with per-request batching.
//!
//! Producing cards is expensive (a search round trip plus an LM call), so the
//! batch generator asks its source for a whole batch at once and then serves
//! one card per request until the batch runs dry.

use crate::error::GenerationError;
use crate::types::{Card, CardKey};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Result<T> = std::result::Result<T, GenerationError>;

/// Number of cards requested per refill unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Produces one card for a theme and a set of instructions.
pub trait CardGenerator {
    fn create_card(&self, theme: &str, instructions: &str) -> Result<Card>;
}

/// External producer of cards, called once per batch.
///
/// Implementations must return at most `n` cards; returning none is allowed.
pub trait CardSource {
    fn generate(&self, theme: &str, instructions: &str, n: usize) -> Result<Vec<Card>>;
}

impl<S: CardSource + ?Sized> CardSource for &S {
    fn generate(&self, theme: &str, instructions: &str, n: usize) -> Result<Vec<Card>> {
        (**self).generate(theme, instructions, n)
    }
}

type Batch = Arc<Mutex<VecDeque<Card>>>;

/// Serves generated cards one at a time out of cached batches.
///
/// Each key has its own lock: a refill blocks later requests for the same
/// key until it lands, while other keys are served in the meantime.
pub struct BatchCardGenerator<S> {
    source: S,
    batch_size: usize,
    batches: Mutex<HashMap<CardKey, Batch>>,
}

impl<S: CardSource> BatchCardGenerator<S> {
    /// `batch_size` of zero is treated as one.
    pub fn new(source: S, batch_size: usize) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
            batches: Mutex::new(HashMap::new()),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Cards still cached for this theme and instructions.
    pub fn pending(&self, theme: &str, instructions: &str) -> usize {
        let batch = lock(&self.batches)
            .get(&CardKey::new(theme, instructions))
            .cloned();
        batch.map_or(0, |batch| lock(&batch).len())
    }

    /// Drop every cached batch.
    pub fn clear(&self) {
        lock(&self.batches).clear();
    }

    fn batch(&self, key: &CardKey) -> Batch {
        Arc::clone(lock(&self.batches).entry(key.clone()).or_default())
    }

    fn refill(&self, key: &CardKey) -> Result<VecDeque<Card>> {
        tracing::debug!(
            theme = key.theme(),
            instructions = key.instructions(),
            batch_size = self.batch_size,
            "refilling card batch"
        );
        let mut cards = self
            .source
            .generate(key.theme(), key.instructions(), self.batch_size)?;
        if cards.len() > self.batch_size {
            tracing::debug!(
                returned = cards.len(),
                batch_size = self.batch_size,
                "card source overshot batch size, truncating"
            );
            cards.truncate(self.batch_size);
        }
        if cards.is_empty() {
            tracing::warn!(theme = key.theme(), "card source returned an empty batch");
        }
        Ok(cards.into())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: CardSource> CardGenerator for BatchCardGenerator<S> {
    fn create_card(&self, theme: &str, instructions: &str) -> Result<Card> {
        let key = CardKey::new(theme, instructions);
        let batch = self.batch(&key);
        let mut cards = lock(&batch);

        if cards.is_empty() {
            *cards = self.refill(&key)?;
        }

        cards.pop_front().ok_or_else(|| GenerationError::Exhausted {
            theme: key.theme().to_string(),
            instructions: key.instructions().to_string(),
        })
    }
}

/// Generator that always hands out a copy of the same card.
#[derive(Debug, Clone)]
pub struct FixedCardGenerator {
    card: Card,
}

impl FixedCardGenerator {
    pub fn new(card: Card) -> Self {
        Self { card }
    }
}

impl CardGenerator for FixedCardGenerator {
    fn create_card(&self, _theme: &str, _instructions: &str) -> Result<Card> {
        Ok(self.card.clone())
    }
}

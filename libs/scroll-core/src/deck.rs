//! The deck contract shared by every storage backend.

use crate::error::DeckError;
use crate::types::{Card, DeckId};

type Result<T> = std::result::Result<T, DeckError>;

/// A named, ordered collection of cards.
///
/// Decks are handles: mutation goes through `&self` and lands in whatever
/// backend owns the deck. Cards keep their insertion order, duplicates included.
pub trait Deck {
    /// The normalized deck name. Never changes after construction.
    fn name(&self) -> &str;

    /// Identity derived from the name.
    fn id(&self) -> &DeckId;

    /// Append a card to the end of the deck.
    fn add(&self, card: Card) -> Result<()>;

    /// Remove the first card equal to `card`. Absent cards are not an error.
    fn remove(&self, card: &Card) -> Result<()>;

    /// Snapshot of the cards in insertion order.
    fn cards(&self) -> Result<Vec<Card>>;

    /// Iterate over a fresh snapshot of the cards.
    fn iter(&self) -> Result<std::vec::IntoIter<Card>> {
        Ok(self.cards()?.into_iter())
    }
}

/// Registry of decks keyed by identity.
///
/// At most one deck exists per identity; creation never overwrites.
pub trait DeckService {
    type Deck: Deck;

    /// All decks, sorted by name.
    fn decks(&self) -> Result<Vec<Self::Deck>>;

    fn get(&self, id: &DeckId) -> Result<Option<Self::Deck>>;

    /// Create an empty deck. Returns `None` when a deck with the same
    /// identity already exists; the existing deck is left untouched.
    fn create(&self, name: &str) -> Result<Option<Self::Deck>>;

    /// Register a deck built elsewhere, copying its current cards.
    ///
    /// Returns `false` without touching anything if the identity is taken.
    fn add(&self, deck: &dyn Deck) -> Result<bool>;

    /// Delete a deck and its cards. Unknown identities are ignored.
    fn remove(&self, id: &DeckId) -> Result<()>;
}

//! In-memory deck backend, for tests and transient decks.
//!
//! Nothing here persists. A `MemoryDeck` can be built standalone, filled, and
//! later promoted into a persistent directory with `DeckService::add`.

use crate::deck::{Deck, DeckService};
use crate::error::DeckError;
use crate::types::{normalize_name, Card, DeckId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type Result<T> = std::result::Result<T, DeckError>;

/// Deck held in process memory. Clones share the same cards.
#[derive(Debug, Clone)]
pub struct MemoryDeck {
    name: String,
    id: DeckId,
    cards: Arc<RwLock<Vec<Card>>>,
}

impl MemoryDeck {
    pub fn new(name: &str) -> Self {
        let name = normalize_name(name).to_string();
        let id = DeckId::from_name(&name);
        Self {
            name,
            id,
            cards: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Build a deck pre-filled with `cards`, in order.
    pub fn with_cards(name: &str, cards: impl IntoIterator<Item = Card>) -> Self {
        let deck = Self::new(name);
        deck.cards
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(cards);
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Deck for MemoryDeck {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &DeckId {
        &self.id
    }

    fn add(&self, card: Card) -> Result<()> {
        self.cards
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(card);
        Ok(())
    }

    fn remove(&self, card: &Card) -> Result<()> {
        let mut cards = self.cards.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(pos) = cards.iter().position(|c| c == card) {
            cards.remove(pos);
        }
        Ok(())
    }

    fn cards(&self) -> Result<Vec<Card>> {
        Ok(self
            .cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Directory of in-memory decks. Owned by the caller; there is no global instance.
#[derive(Debug, Default)]
pub struct MemoryDeckService {
    decks: RwLock<HashMap<DeckId, MemoryDeck>>,
}

impl MemoryDeckService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handle itself, so later changes made through `deck` stay
    /// visible here. Returns `false` if the identity is already taken.
    pub fn insert(&self, deck: MemoryDeck) -> bool {
        let mut decks = self.decks.write().unwrap_or_else(PoisonError::into_inner);
        if decks.contains_key(deck.id()) {
            return false;
        }
        decks.insert(deck.id().clone(), deck);
        true
    }

    pub fn len(&self) -> usize {
        self.decks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeckService for MemoryDeckService {
    type Deck = MemoryDeck;

    fn decks(&self) -> Result<Vec<MemoryDeck>> {
        let mut decks: Vec<MemoryDeck> = self
            .decks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        decks.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(decks)
    }

    fn get(&self, id: &DeckId) -> Result<Option<MemoryDeck>> {
        Ok(self
            .decks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    fn create(&self, name: &str) -> Result<Option<MemoryDeck>> {
        let deck = MemoryDeck::new(name);
        if self.insert(deck.clone()) {
            Ok(Some(deck))
        } else {
            Ok(None)
        }
    }

    fn add(&self, deck: &dyn Deck) -> Result<bool> {
        if self.get(deck.id())?.is_some() {
            return Ok(false);
        }
        let copy = MemoryDeck::with_cards(deck.name(), deck.cards()?);
        Ok(self.insert(copy))
    }

    fn remove(&self, id: &DeckId) -> Result<()> {
        self.decks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn name_is_trimmed() {
        let deck = MemoryDeck::new("  biology ");
        assert_eq!(deck.name(), "biology");
        assert_eq!(deck.id(), &DeckId::from_name("biology"));
    }

    #[test]
    fn same_name_same_id() {
        let a = MemoryDeck::new("science");
        let b = MemoryDeck::new("science");
        let c = MemoryDeck::new("math");
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn remove_only_first_occurrence() {
        let a = Card::new("a", "1");
        let b = Card::new("b", "2");
        let deck = MemoryDeck::with_cards("art", [a.clone(), b.clone(), a.clone()]);

        deck.remove(&a).unwrap();

        assert_eq!(deck.cards().unwrap(), vec![b, a]);
    }

    #[test]
    fn remove_missing_card_is_noop() {
        let deck = MemoryDeck::with_cards("art", [Card::new("a", "1")]);
        deck.remove(&Card::new("z", "26")).unwrap();
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn clones_share_cards() {
        let deck = MemoryDeck::new("history");
        let handle = deck.clone();
        handle.add(Card::new("q", "a")).unwrap();
        assert_eq!(deck.cards().unwrap(), vec![Card::new("q", "a")]);
    }

    #[test]
    fn iteration_is_restartable() {
        let deck = MemoryDeck::with_cards("art", [Card::new("a", "1"), Card::new("b", "2")]);
        let first: Vec<Card> = deck.iter().unwrap().collect();
        let second: Vec<Card> = deck.iter().unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn insert_keeps_handle_and_first_writer_wins() {
        let service = MemoryDeckService::new();
        let first = MemoryDeck::new("shared");
        let second = MemoryDeck::with_cards("shared", [Card::new("q", "a")]);

        assert!(service.insert(first.clone()));
        assert!(!service.insert(second));

        first.add(Card::new("late", "card")).unwrap();
        let stored = service.get(first.id()).unwrap().unwrap();
        assert_eq!(stored.cards().unwrap(), vec![Card::new("late", "card")]);
    }

    #[test]
    fn decks_are_sorted_by_name() {
        let service = MemoryDeckService::new();
        for name in ["zoology", "art", "math"] {
            service.create(name).unwrap();
        }
        let names: Vec<String> = service
            .decks()
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["art", "math", "zoology"]);
    }
}

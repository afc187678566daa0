//! Core value types: cards, deck identities, cache keys and search results.

use crate::error::InvalidDeckId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const DIGEST_HEX_LEN: usize = 64;

/// A question/answer flashcard, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub question: String,
    pub answer: String,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Strip the surrounding whitespace that never takes part in a deck name.
pub fn normalize_name(name: &str) -> &str {
    name.trim()
}

/// Deck identity: SHA-256 digest of the normalized deck name, hex encoded.
///
/// Identity equality is name equality, which is what keeps deck names unique.
/// Identities are primary keys in storage; a change to this format needs a
/// schema version bump so stored decks get rekeyed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeckId(String);

impl DeckId {
    /// Compute the identity of a deck name.
    pub fn from_name(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalize_name(name).as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Parse an identity string as produced by `Display`.
    pub fn parse(value: &str) -> Result<Self, InvalidDeckId> {
        let well_formed = value.len() == DIGEST_HEX_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidDeckId {
                value: value.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeckId {
    type Err = InvalidDeckId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DeckId {
    type Error = InvalidDeckId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DeckId> for String {
    fn from(id: DeckId) -> Self {
        id.0
    }
}

/// Key of one generation batch: a theme and the instructions that go with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    theme: String,
    instructions: String,
}

impl CardKey {
    pub fn new(theme: &str, instructions: &str) -> Self {
        Self {
            theme: theme.trim().to_string(),
            instructions: instructions.trim().to_string(),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}

/// One hit returned by a document search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub excerpt: String,
    pub title: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCIENCE_SHA256: &str = "9d948c73e0ad7a5a213a5e7e00b962531ca6b07992a06bd8c2fc2ac5ae23c51b";

    #[test]
    fn identity_is_sha256_of_trimmed_name() {
        assert_eq!(DeckId::from_name("Science").as_str(), SCIENCE_SHA256);
        assert_eq!(DeckId::from_name("  Science  ").as_str(), SCIENCE_SHA256);
        assert_eq!(DeckId::from_name("\tScience\n").as_str(), SCIENCE_SHA256);
    }

    #[test]
    fn identity_is_case_sensitive() {
        assert_ne!(DeckId::from_name("Science"), DeckId::from_name("science"));
    }

    #[test]
    fn distinct_names_have_distinct_identities() {
        assert_ne!(DeckId::from_name("math"), DeckId::from_name("science"));
        assert_ne!(DeckId::from_name("a b"), DeckId::from_name("ab"));
    }

    #[test]
    fn parse_accepts_display_output() {
        let id = DeckId::from_name("History");
        assert_eq!(id.to_string().parse::<DeckId>().unwrap(), id);
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        assert!(DeckId::parse("").is_err());
        assert!(DeckId::parse("History").is_err());
        assert!(DeckId::parse(&SCIENCE_SHA256.to_uppercase()).is_err());
        assert!(DeckId::parse(&SCIENCE_SHA256[1..]).is_err());
    }

    #[test]
    fn cards_compare_by_value() {
        assert_eq!(Card::new("Q", "A"), Card::new("Q", "A"));
        assert_ne!(Card::new("Q", "A"), Card::new("Q", "B"));
    }

    #[test]
    fn card_key_trims_both_parts() {
        assert_eq!(
            CardKey::new("  rust ", "short answers\n"),
            CardKey::new("rust", "short answers")
        );
        assert_ne!(CardKey::new("rust", "a"), CardKey::new("rust", "b"));
    }
}

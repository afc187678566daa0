//! SQLite schema definitions.

/// Current schema version, stored in `PRAGMA user_version`.
///
/// Version 1 keys decks by the SHA-256 hex digest of their trimmed name.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the deck database.
pub const SCHEMA: &str = r#"
-- Decks, keyed by the digest of their name
CREATE TABLE IF NOT EXISTS decks (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

-- Cards; seq gives the insertion order within a deck
CREATE TABLE IF NOT EXISTS cards (
    seq INTEGER PRIMARY KEY,
    deck_id TEXT NOT NULL REFERENCES decks(id) ON DELETE CASCADE ON UPDATE CASCADE,
    question TEXT NOT NULL,
    answer TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_cards_deck ON cards(deck_id, seq);
"#;

//! SQLite-backed decks and deck directory.
//!
//! Every operation opens its own connection and drops it before returning.
//! Multi-row effects run inside one transaction; an early return drops the
//! transaction uncommitted, which rolls it back.

use crate::config::SqlConfig;
use crate::db::connection::{rekey_decks, Database};
use crate::db::error::DbError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use scroll_core::types::normalize_name;
use scroll_core::{Card, Deck, DeckError, DeckId, DeckService};

type Result<T> = std::result::Result<T, DbError>;

/// A deck whose cards live in the database.
///
/// The handle holds only the identity; every call goes to storage and fails
/// with `NotFound` once the deck row is gone.
#[derive(Debug, Clone)]
pub struct SqlDeck {
    id: DeckId,
    name: String,
    db: Database,
}

impl SqlDeck {
    fn ensure_exists(&self, conn: &Connection) -> Result<()> {
        let found = conn
            .query_row(
                "SELECT 1 FROM decks WHERE id = ?1",
                params![self.id.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        found.ok_or_else(|| DbError::DeckNotFound(self.id.clone()))
    }

    fn insert_card(&self, card: &Card) -> Result<()> {
        let conn = self.db.connect()?;
        // The existence check is part of the insert itself.
        let inserted = conn.execute(
            "INSERT INTO cards (deck_id, question, answer)
             SELECT ?1, ?2, ?3 WHERE EXISTS (SELECT 1 FROM decks WHERE id = ?1)",
            params![self.id.as_str(), card.question, card.answer],
        )?;
        if inserted == 0 {
            return Err(DbError::DeckNotFound(self.id.clone()));
        }
        Ok(())
    }

    fn delete_first(&self, card: &Card) -> Result<()> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;
        self.ensure_exists(&tx)?;
        tx.execute(
            "DELETE FROM cards WHERE seq = (
                SELECT seq FROM cards
                WHERE deck_id = ?1 AND question = ?2 AND answer = ?3
                ORDER BY seq
                LIMIT 1
            )",
            params![self.id.as_str(), card.question, card.answer],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load_cards(&self) -> Result<Vec<Card>> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;
        self.ensure_exists(&tx)?;

        let cards = {
            let mut stmt =
                tx.prepare("SELECT question, answer FROM cards WHERE deck_id = ?1 ORDER BY seq")?;
            let cards = stmt
                .query_map(params![self.id.as_str()], |row| {
                    Ok(Card {
                        question: row.get(0)?,
                        answer: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            cards
        };

        tx.commit()?;
        Ok(cards)
    }
}

impl Deck for SqlDeck {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &DeckId {
        &self.id
    }

    fn add(&self, card: Card) -> std::result::Result<(), DeckError> {
        Ok(self.insert_card(&card)?)
    }

    fn remove(&self, card: &Card) -> std::result::Result<(), DeckError> {
        Ok(self.delete_first(card)?)
    }

    fn cards(&self) -> std::result::Result<Vec<Card>, DeckError> {
        Ok(self.load_cards()?)
    }
}

/// Deck directory backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqlDeckService {
    db: Database,
}

impl SqlDeckService {
    /// Open (and if needed initialize) the database described by `config`.
    pub fn open(config: &SqlConfig) -> Result<Self> {
        let db = Database::open(config)?;
        tracing::info!(database = db.path(), "deck database ready");
        Ok(Self { db })
    }

    /// Open the database named by the environment.
    pub fn load() -> Result<Self> {
        Self::open(&SqlConfig::load())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Recompute every stored deck identity from its name.
    ///
    /// Needed after a change of identity format. Returns the number of decks
    /// whose identity changed.
    pub fn reindex(&self) -> Result<usize> {
        let mut conn = self.db.connect()?;
        rekey_decks(&mut conn)
    }

    fn build_deck(&self, (id, name): (String, String)) -> Result<SqlDeck> {
        let id = DeckId::parse(&id).map_err(|e| DbError::InvalidData(e.to_string()))?;
        Ok(SqlDeck {
            id,
            name,
            db: self.db.clone(),
        })
    }

    fn list_decks(&self) -> Result<Vec<SqlDeck>> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare("SELECT id, name FROM decks ORDER BY name, id")?;
        let rows = stmt
            .query_map([], deck_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(|row| self.build_deck(row)).collect()
    }

    fn find_deck(&self, id: &DeckId) -> Result<Option<SqlDeck>> {
        let conn = self.db.connect()?;
        let row = conn
            .query_row(
                "SELECT id, name FROM decks WHERE id = ?1",
                params![id.as_str()],
                deck_row,
            )
            .optional()?;

        row.map(|row| self.build_deck(row)).transpose()
    }

    fn insert_deck(&self, name: &str) -> Result<Option<SqlDeck>> {
        let name = normalize_name(name);
        let id = DeckId::from_name(name);

        let conn = self.db.connect()?;
        // The primary key and UNIQUE(name) arbitrate concurrent creates.
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO decks (id, name) VALUES (?1, ?2)",
            params![id.as_str(), name],
        )?;
        if inserted == 0 {
            tracing::debug!(deck = %id, name, "deck already exists");
            return Ok(None);
        }

        tracing::info!(deck = %id, name, "created deck");
        Ok(Some(SqlDeck {
            id,
            name: name.to_string(),
            db: self.db.clone(),
        }))
    }

    fn store_deck(&self, id: &DeckId, name: &str, cards: &[Card]) -> Result<bool> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO decks (id, name) VALUES (?1, ?2)",
            params![id.as_str(), normalize_name(name)],
        )?;
        if inserted == 0 {
            tracing::debug!(deck = %id, "deck already stored, skipping");
            return Ok(false);
        }

        {
            let mut stmt =
                tx.prepare("INSERT INTO cards (deck_id, question, answer) VALUES (?1, ?2, ?3)")?;
            for card in cards {
                stmt.execute(params![id.as_str(), card.question, card.answer])?;
            }
        }
        tx.commit()?;

        tracing::info!(deck = %id, cards = cards.len(), "stored deck");
        Ok(true)
    }

    fn delete_deck(&self, id: &DeckId) -> Result<()> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;
        // Cards go with the deck through ON DELETE CASCADE.
        let deleted = tx.execute("DELETE FROM decks WHERE id = ?1", params![id.as_str()])?;
        tx.commit()?;

        if deleted > 0 {
            tracing::info!(deck = %id, "removed deck");
        }
        Ok(())
    }
}

fn deck_row(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

impl DeckService for SqlDeckService {
    type Deck = SqlDeck;

    fn decks(&self) -> std::result::Result<Vec<SqlDeck>, DeckError> {
        Ok(self.list_decks()?)
    }

    fn get(&self, id: &DeckId) -> std::result::Result<Option<SqlDeck>, DeckError> {
        Ok(self.find_deck(id)?)
    }

    fn create(&self, name: &str) -> std::result::Result<Option<SqlDeck>, DeckError> {
        Ok(self.insert_deck(name)?)
    }

    fn add(&self, deck: &dyn Deck) -> std::result::Result<bool, DeckError> {
        let cards = deck.cards()?;
        Ok(self.store_deck(deck.id(), deck.name(), &cards)?)
    }

    fn remove(&self, id: &DeckId) -> std::result::Result<(), DeckError> {
        Ok(self.delete_deck(id)?)
    }
}

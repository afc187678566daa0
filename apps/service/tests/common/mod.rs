//! Common test utilities and fixtures for integration tests.
//!
//! Provides a `TestContext` owning a temporary on-disk database, plus card
//! fixtures shared by the storage tests.

#![allow(dead_code)]

use anki_scroll_lib::{SqlConfig, SqlDeckService};
use rusqlite::Connection;
use scroll_core::{Card, MemoryDeckService};
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary SQLite database, removed when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
    pub path: PathBuf,
    pub service: SqlDeckService,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("decks.sqlite3");
        let service = SqlDeckService::open(&Self::config_for(&path)).expect("open deck database");
        Self { dir, path, service }
    }

    pub fn config(&self) -> SqlConfig {
        Self::config_for(&self.path)
    }

    fn config_for(path: &std::path::Path) -> SqlConfig {
        SqlConfig::new(path.to_string_lossy().into_owned())
    }

    /// Raw connection that bypasses the service, for asserting on rows.
    pub fn connect(&self) -> Connection {
        let conn = Connection::open(&self.path).expect("open raw connection");
        conn.pragma_update(None, "foreign_keys", true)
            .expect("enable foreign keys");
        conn
    }

    pub fn card_rows(&self, deck_id: &str) -> i64 {
        self.connect()
            .query_row(
                "SELECT COUNT(*) FROM cards WHERE deck_id = ?1",
                [deck_id],
                |row| row.get(0),
            )
            .expect("count cards")
    }
}

/// Fresh SQLite backend; keep the context alive for the test's duration.
pub fn sqlite_backend() -> (TestContext, SqlDeckService) {
    let ctx = TestContext::new();
    let service = ctx.service.clone();
    (ctx, service)
}

/// Fresh in-memory backend.
pub fn memory_backend() -> ((), MemoryDeckService) {
    ((), MemoryDeckService::new())
}

pub fn card_a() -> Card {
    Card::new("What is ownership?", "Each value has a single owner.")
}

pub fn card_b() -> Card {
    Card::new("What is borrowing?", "Referencing a value without owning it.")
}

pub fn card_c() -> Card {
    Card::new("What is a lifetime?", "The scope a reference is valid for.")
}

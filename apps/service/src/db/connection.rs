//! Connection lifecycle: one fresh connection per logical operation.

use crate::config::SqlConfig;
use crate::db::error::DbError;
use crate::db::schema::{SCHEMA, SCHEMA_VERSION};
use rusqlite::{params, Connection};
use scroll_core::DeckId;
use std::path::Path;
use std::time::Duration;

type Result<T> = std::result::Result<T, DbError>;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the deck database. Holds no open connection.
#[derive(Debug, Clone)]
pub struct Database {
    path: String,
}

impl Database {
    /// Open the database described by `config`, creating parent directories,
    /// the schema, and running identity migration when needed.
    ///
    /// In-memory databases are rejected: every operation opens its own
    /// connection, and each in-memory connection starts out empty.
    pub fn open(config: &SqlConfig) -> Result<Self> {
        if is_in_memory(&config.database) {
            return Err(DbError::InvalidData(format!(
                "in-memory database {:?} cannot back a deck store",
                config.database
            )));
        }

        let db = Self {
            path: config.database.clone(),
        };
        db.ensure_directory()?;
        db.initialize()?;
        Ok(db)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Open a new connection with foreign keys enforced.
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }

    fn ensure_directory(&self) -> Result<()> {
        if self.path.starts_with("file:") {
            return Ok(());
        }
        if let Some(parent) = Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn initialize(&self) -> Result<()> {
        let mut conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;

        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version < SCHEMA_VERSION {
            let rekeyed = rekey_decks(&mut conn)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tracing::info!(
                from = version,
                to = SCHEMA_VERSION,
                rekeyed,
                "migrated deck database"
            );
        }
        Ok(())
    }
}

fn is_in_memory(database: &str) -> bool {
    let database = database.trim();
    database.is_empty()
        || database == ":memory:"
        || (database.starts_with("file:") && database.contains("mode=memory"))
}

/// Recompute every deck id from its name, moving cards along with it.
///
/// Returns the number of decks whose id changed.
pub(crate) fn rekey_decks(conn: &mut Connection) -> Result<usize> {
    let tx = conn.transaction()?;

    let rows: Vec<(String, String)> = {
        let mut stmt = tx.prepare("SELECT id, name FROM decks")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows
    };

    let mut rekeyed = 0;
    for (id, name) in rows {
        let expected = DeckId::from_name(&name);
        if expected.as_str() != id {
            tx.execute(
                "UPDATE decks SET id = ?1 WHERE id = ?2",
                params![expected.as_str(), id],
            )?;
            tracing::debug!(old = %id, new = %expected, name = %name, "rekeyed deck");
            rekeyed += 1;
        }
    }

    tx.commit()?;
    Ok(rekeyed)
}

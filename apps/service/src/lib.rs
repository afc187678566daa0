//! Persistent deck storage, document search and card generation wiring.

pub mod config;
pub mod db;
pub mod generation;
pub mod search;
pub mod state;

pub use config::{Config, ConfigError, GenerationConfig, SearchConfig, SqlConfig};
pub use db::{Database, DbError, SqlDeck, SqlDeckService};
pub use generation::{CardWriter, Document, SearchGroundedSource};
pub use search::WikipediaSearch;
pub use state::{AppError, AppState};

//! Local SQLite deck storage.

pub mod connection;
pub mod error;
pub mod repository;
pub mod schema;

pub use connection::Database;
pub use error::DbError;
pub use repository::{SqlDeck, SqlDeckService};

//! Configuration loaded from the environment (and a `.env` file, if any).

use scroll_core::DEFAULT_BATCH_SIZE;
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_VAR: &str = "ANKI_SCROLL_DB_PATH";
pub const SEARCH_LANGUAGE_VAR: &str = "ANKI_SCROLL_SEARCH_LANGUAGE";
pub const BATCH_SIZE_VAR: &str = "ANKI_SCROLL_BATCH_SIZE";

const DB_FILE_NAME: &str = "anki_scroll.sqlite3";

/// An environment value that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidBatchSize { var: &'static str, value: String },
}

/// Where the deck database lives: a file path or a `file:` URI.
///
/// The store reconnects for every operation, so it must be on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlConfig {
    pub database: String,
}

impl SqlConfig {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
        }
    }

    /// Read `ANKI_SCROLL_DB_PATH`, defaulting to the local data directory.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(DB_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::new(path),
            _ => Self::new(default_db_path().to_string_lossy().into_owned()),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("anki-scroll"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DB_FILE_NAME)
}

/// Settings for the document search client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Wikipedia language edition, e.g. `en`.
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

/// Settings for batched card generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub batch_size: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sql: SqlConfig,
    pub search: SearchConfig,
    pub generation: GenerationConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let sql = SqlConfig::load();

        let mut search = SearchConfig::default();
        if let Ok(language) = std::env::var(SEARCH_LANGUAGE_VAR) {
            if !language.trim().is_empty() {
                search.language = language.trim().to_string();
            }
        }

        let mut generation = GenerationConfig::default();
        if let Ok(raw) = std::env::var(BATCH_SIZE_VAR) {
            generation.batch_size = parse_batch_size(&raw)?;
        }

        Ok(Self {
            sql,
            search,
            generation,
        })
    }
}

fn parse_batch_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidBatchSize {
            var: BATCH_SIZE_VAR,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_db_path_ends_with_file_name() {
        assert!(default_db_path().ends_with(DB_FILE_NAME));
    }

    #[test]
    fn batch_size_must_be_positive() {
        assert_eq!(parse_batch_size(" 12 ").unwrap(), 12);
        let err = parse_batch_size("0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBatchSize { ref value, .. } if value == "0"));
        assert_eq!(
            err.to_string(),
            "ANKI_SCROLL_BATCH_SIZE must be a positive integer, got \"0\""
        );
        assert!(parse_batch_size("many").is_err());
    }

    #[test]
    fn defaults() {
        assert_eq!(SearchConfig::default().language, "en");
        assert_eq!(GenerationConfig::default().batch_size, DEFAULT_BATCH_SIZE);
    }
}

//! Command-line front end over the deck store and the search client.

use std::io::Write;

use anki_scroll_lib::{AppState, Config, SqlConfig, SqlDeck, WikipediaSearch};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use scroll_core::search::DocumentSearch;
use scroll_core::{Card, Deck, DeckId, DeckService};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "anki-scroll")]
#[command(about = "Manage flashcard decks and search source documents")]
#[command(version)]
pub struct Cli {
    /// SQLite database file or URI
    #[arg(long, global = true, env = "ANKI_SCROLL_DB_PATH")]
    pub database: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all decks
    Decks,
    /// Create an empty deck
    Create { name: String },
    /// Show the cards of a deck (by id or name)
    Show { deck: String },
    /// Append a card to a deck
    Add {
        deck: String,
        #[arg(short, long)]
        question: String,
        #[arg(short, long)]
        answer: String,
    },
    /// Remove the first matching card from a deck
    RemoveCard {
        deck: String,
        #[arg(short, long)]
        question: String,
        #[arg(short, long)]
        answer: String,
    },
    /// Delete a deck and all its cards
    Delete { deck: String },
    /// Search source documents
    Search {
        query: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(database) = &cli.database {
        config.sql = SqlConfig::new(database.clone());
    }

    let stdout = std::io::stdout();
    execute(&cli, &config, &mut stdout.lock())
}

/// Run one command against the configured store, writing output to `out`.
pub fn execute(cli: &Cli, config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Command::Search { query, limit } => {
            let search = WikipediaSearch::new(&config.search)?;
            let results = search.search(query, *limit)?;
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                for result in &results {
                    writeln!(out, "{}\n  {}\n  {}", result.title, result.url, result.excerpt)?;
                }
            }
        }
        Command::Decks => {
            let state = open_state(config)?;
            let all = state.decks.decks()?;
            if cli.json {
                let listing: Vec<_> = all
                    .iter()
                    .map(|d| json!({ "id": d.id(), "name": d.name() }))
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
            } else {
                for deck in &all {
                    writeln!(out, "{}  {}", deck.id(), deck.name())?;
                }
            }
        }
        Command::Create { name } => match open_state(config)?.decks.create(name)? {
            Some(deck) => {
                if cli.json {
                    writeln!(out, "{}", json!({ "id": deck.id(), "name": deck.name() }))?;
                } else {
                    writeln!(out, "created {}  {}", deck.id(), deck.name())?;
                }
            }
            None => writeln!(out, "deck {:?} already exists", name.trim())?,
        },
        Command::Show { deck } => {
            let deck = find_deck(&open_state(config)?, deck)?;
            let cards = deck.cards()?;
            if cli.json {
                let body = json!({ "id": deck.id(), "name": deck.name(), "cards": cards });
                writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
            } else {
                writeln!(out, "{} ({} cards)", deck.name(), cards.len())?;
                for card in &cards {
                    writeln!(out, "Q: {}\nA: {}", card.question, card.answer)?;
                }
            }
        }
        Command::Add {
            deck,
            question,
            answer,
        } => {
            let deck = find_deck(&open_state(config)?, deck)?;
            deck.add(Card::new(question.as_str(), answer.as_str()))?;
            writeln!(out, "added card to {}", deck.name())?;
        }
        Command::RemoveCard {
            deck,
            question,
            answer,
        } => {
            let deck = find_deck(&open_state(config)?, deck)?;
            deck.remove(&Card::new(question.as_str(), answer.as_str()))?;
            writeln!(out, "removed card from {}", deck.name())?;
        }
        Command::Delete { deck } => {
            let state = open_state(config)?;
            let deck = find_deck(&state, deck)?;
            state.decks.remove(deck.id())?;
            writeln!(out, "deleted {}", deck.name())?;
        }
    }

    Ok(())
}

fn open_state(config: &Config) -> anyhow::Result<AppState> {
    AppState::from_config(config).context("failed to open deck database")
}

/// Accept either a deck id or a deck name.
fn resolve_deck_id(deck: &str) -> DeckId {
    DeckId::parse(deck).unwrap_or_else(|_| DeckId::from_name(deck))
}

fn find_deck(state: &AppState, deck: &str) -> anyhow::Result<SqlDeck> {
    let id = resolve_deck_id(deck);
    match state.decks.get(&id)? {
        Some(found) => Ok(found),
        None => bail!("deck not found: {deck}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Harness {
        _dir: tempfile::TempDir,
        config: Config,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = Config {
                sql: SqlConfig::new(dir.path().join("cli.sqlite3").to_string_lossy()),
                search: Default::default(),
                generation: Default::default(),
            };
            Self { _dir: dir, config }
        }

        fn run(&self, args: &[&str]) -> anyhow::Result<String> {
            let argv = std::iter::once("anki-scroll").chain(args.iter().copied());
            let cli = Cli::try_parse_from(argv)?;
            let mut out = Vec::new();
            execute(&cli, &self.config, &mut out)?;
            Ok(String::from_utf8(out)?)
        }
    }

    #[test]
    fn create_add_show() {
        let harness = Harness::new();

        harness.run(&["create", "Rust"]).unwrap();
        harness
            .run(&["add", "Rust", "-q", "What is Rust?", "-a", "A language."])
            .unwrap();
        let shown = harness.run(&["show", "Rust"]).unwrap();

        assert_eq!(shown, "Rust (1 cards)\nQ: What is Rust?\nA: A language.\n");
    }

    #[test]
    fn duplicate_create_reports_existing_deck() {
        let harness = Harness::new();

        harness.run(&["create", "Rust"]).unwrap();
        let output = harness.run(&["create", " Rust "]).unwrap();

        assert_eq!(output, "deck \"Rust\" already exists\n");
    }

    #[test]
    fn decks_accept_id_or_name() {
        let harness = Harness::new();
        harness.run(&["create", "Rust"]).unwrap();
        let id = DeckId::from_name("Rust").to_string();

        let by_id = harness.run(&["show", &id]).unwrap();
        let by_name = harness.run(&["show", "Rust"]).unwrap();

        assert_eq!(by_id, by_name);
    }

    #[test]
    fn unknown_deck_is_an_error() {
        let harness = Harness::new();
        let err = harness.run(&["show", "Missing"]).unwrap_err();
        assert_eq!(err.to_string(), "deck not found: Missing");
    }

    #[test]
    fn delete_removes_deck() {
        let harness = Harness::new();
        harness.run(&["create", "Rust"]).unwrap();

        harness.run(&["delete", "Rust"]).unwrap();

        assert_eq!(harness.run(&["decks"]).unwrap(), "");
    }

    #[test]
    fn json_listing() {
        let harness = Harness::new();
        harness.run(&["create", "Rust"]).unwrap();

        let output = harness.run(&["--json", "decks"]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed[0]["name"], "Rust");
        assert_eq!(parsed[0]["id"], DeckId::from_name("Rust").to_string());
    }
}

//! Card source grounded on searched documents.
//!
//! Searches for a couple of articles about the theme, fetches their full
//! text, then asks a writer (an LM in practice) to turn them into cards.

use scroll_core::generation::CardSource;
use scroll_core::search::{ArticleFetch, DocumentSearch};
use scroll_core::{Card, GenerationError};
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, GenerationError>;

/// Number of documents fetched per batch.
pub const DOCUMENT_LIMIT: usize = 2;

/// Source material handed to the card writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub url: String,
    pub text: String,
}

/// Writes `n` cards about `topic` backed by `documents`.
pub trait CardWriter {
    fn write_cards(
        &self,
        topic: &str,
        instructions: &str,
        documents: &[Document],
        n: usize,
    ) -> Result<Vec<Card>>;
}

pub struct SearchGroundedSource<S, A, W> {
    search: S,
    articles: A,
    writer: W,
}

impl<S, A, W> SearchGroundedSource<S, A, W>
where
    S: DocumentSearch,
    A: ArticleFetch,
    W: CardWriter,
{
    pub fn new(search: S, articles: A, writer: W) -> Self {
        Self {
            search,
            articles,
            writer,
        }
    }

    fn documents(&self, theme: &str) -> Result<Vec<Document>> {
        let query = format!("documents about {theme}");
        let results = self.search.search(&query, DOCUMENT_LIMIT)?;

        let mut documents = Vec::with_capacity(results.len());
        for result in results {
            let text = self.articles.fetch_article(&result.url)?;
            documents.push(Document {
                title: result.title,
                url: result.url,
                text,
            });
        }
        Ok(documents)
    }
}

impl<S, A, W> CardSource for SearchGroundedSource<S, A, W>
where
    S: DocumentSearch,
    A: ArticleFetch,
    W: CardWriter,
{
    fn generate(&self, theme: &str, instructions: &str, n: usize) -> Result<Vec<Card>> {
        let documents = self.documents(theme)?;
        tracing::debug!(theme, documents = documents.len(), n, "writing cards");
        let mut cards = self.writer.write_cards(theme, instructions, &documents, n)?;
        cards.truncate(n);
        Ok(cards)
    }
}

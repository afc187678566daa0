//! Wikipedia search client.
//!
//! Submits the query to the wiki's search page and hands the final response
//! (after any redirect) to the core router. Also fetches the full text of the
//! articles a search turned up.

use crate::config::SearchConfig;
use reqwest::blocking::Client;
use scroll_core::search::{article_text, route, ArticleFetch, DocumentSearch, ARTICLE_NOT_FOUND};
use scroll_core::{SearchError, SearchResult};

type Result<T> = std::result::Result<T, SearchError>;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; rv:91.0) Gecko/20100101 Firefox/91.0";

/// `DocumentSearch` over a Wikipedia language edition.
#[derive(Debug, Clone)]
pub struct WikipediaSearch {
    client: Client,
    language: String,
}

impl WikipediaSearch {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            language: config.language.clone(),
        })
    }

    /// Search endpoint for the configured language.
    pub fn index_url(&self) -> String {
        format!("https://{}.wikipedia.org/w/index.php", self.language)
    }
}

impl DocumentSearch for WikipediaSearch {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(self.index_url())
            .query(&[("search", query), ("title", "Special:Search")])
            .send()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let mut results = route(&url, &body)?;
        tracing::debug!(query, url = %url, found = results.len(), "search response routed");
        results.truncate(limit);
        Ok(results)
    }
}

impl ArticleFetch for WikipediaSearch {
    /// A page that does not load successfully yields a "not found" text in
    /// place of its content.
    fn fetch_article(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "article fetch failed");
            return Ok(format!("{ARTICLE_NOT_FOUND}: {url}"));
        }

        let body = response
            .text()
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        Ok(article_text(&body))
    }
}

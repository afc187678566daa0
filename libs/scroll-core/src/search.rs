//! Routing of raw search responses into structured results.
//!
//! The search endpoint answers a query either with a page of results or, when
//! one article matches exactly, by redirecting straight to that article. The
//! router looks at the final URL to tell the two apart and always returns a
//! list of results.

use crate::error::SearchError;
use crate::types::SearchResult;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

type Result<T> = std::result::Result<T, SearchError>;

/// Shortest paragraph accepted as an article excerpt, in characters.
pub const MIN_EXCERPT_CHARS: usize = 50;

pub const NO_TITLE: &str = "no title found";
pub const NO_TEXT: &str = "no text found";
/// Prefix of the text returned in place of an article that could not be fetched.
pub const ARTICLE_NOT_FOUND: &str = "article not found";

/// Searches an external document index.
pub trait DocumentSearch {
    /// Return at most `limit` results for `query`.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

impl<S: DocumentSearch + ?Sized> DocumentSearch for &S {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        (**self).search(query, limit)
    }
}

/// Fetches the readable text of an article found by a search.
pub trait ArticleFetch {
    fn fetch_article(&self, url: &str) -> Result<String>;
}

impl<F: ArticleFetch + ?Sized> ArticleFetch for &F {
    fn fetch_article(&self, url: &str) -> Result<String> {
        (**self).fetch_article(url)
    }
}

/// What kind of page a search response resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A page listing several results.
    ResultList,
    /// A single article the search redirected to.
    Article,
}

/// Classify a response by the shape of its final URL path.
pub fn classify(url: &Url) -> Result<ResponseShape> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();

    // Article titles may themselves contain '/', e.g. /wiki/AC/DC.
    match segments.as_slice() {
        [.., last] if *last == "index.php" => Ok(ResponseShape::ResultList),
        ["wiki", title @ ..] if title.iter().any(|s| !s.is_empty()) => Ok(ResponseShape::Article),
        _ => Err(SearchError::UnrecognizedShape {
            url: url.to_string(),
        }),
    }
}

/// Turn a raw response (final URL and HTML body) into search results.
pub fn route(url: &str, body: &str) -> Result<Vec<SearchResult>> {
    let url = Url::parse(url).map_err(|e| SearchError::InvalidUrl(format!("{url}: {e}")))?;
    let html = Html::parse_document(body);

    match classify(&url)? {
        ResponseShape::ResultList => Ok(parse_result_list(&html, &url)),
        ResponseShape::Article => Ok(vec![parse_article(&html, &url)]),
    }
}

/// Visible text of an HTML page, whitespace collapsed.
///
/// Scripts and styles are left out.
pub fn article_text(body: &str) -> String {
    let html = Html::parse_document(body);
    let root = html
        .select(&selector("body"))
        .next()
        .unwrap_or_else(|| html.root_element());

    let mut words = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

// Selectors are constants; parsing them cannot fail.
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_result_list(html: &Html, base: &Url) -> Vec<SearchResult> {
    let block_sel = selector("div.searchResultImage-text");
    let heading_sel = selector("div.mw-search-result-heading");
    let link_sel = selector("a[href]");
    let excerpt_sel = selector("div.searchresult");

    let mut results = Vec::new();
    for block in html.select(&block_sel) {
        let parsed = (|| {
            let heading = block.select(&heading_sel).next()?;
            let href = heading.select(&link_sel).next()?.value().attr("href")?;
            let url = base.join(href).ok()?;
            let excerpt = block.select(&excerpt_sel).next()?;
            Some(SearchResult {
                excerpt: text_of(excerpt),
                title: text_of(heading),
                url: url.to_string(),
            })
        })();

        match parsed {
            Some(result) => results.push(result),
            None => tracing::trace!("skipping malformed search result block"),
        }
    }
    results
}

fn parse_article(html: &Html, url: &Url) -> SearchResult {
    let title = html
        .select(&selector("h1"))
        .next()
        .map(text_of)
        .unwrap_or_else(|| NO_TITLE.to_string());

    let excerpt = html
        .select(&selector("p"))
        .map(text_of)
        .find(|text| text.chars().count() >= MIN_EXCERPT_CHARS)
        .unwrap_or_else(|| NO_TEXT.to_string());

    SearchResult {
        excerpt,
        title,
        url: url.to_string(),
    }
}

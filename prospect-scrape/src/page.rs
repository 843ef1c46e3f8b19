//! Page fetching and the parsed-document model.
//!
//! [`PageDocument`] wraps one retrieved page and answers the two questions
//! the pipeline asks of it: which hyperlinks does it carry, and what
//! paragraph text does it contain. Parsing happens on demand inside each
//! accessor so the document itself stays cheap to pass between pipeline
//! stages.

use async_trait::async_trait;
use prospect_http::{HttpClient, HttpError, RequestOpts};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Fixed request timeout for page retrieval.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// One hyperlink with its visible text and raw target.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub text: String,
    pub href: String,
}

/// One successfully retrieved page.
///
/// Holds the URL the fetch was issued against; relative hrefs resolve
/// against it.
#[derive(Debug, Clone)]
pub struct PageDocument {
    url: Url,
    html: String,
}

impl PageDocument {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All hyperlinks carrying an href, in document order.
    pub fn links(&self) -> Vec<PageLink> {
        let doc = Html::parse_document(&self.html);
        let anchors = Selector::parse("a[href]").expect("static selector");
        doc.select(&anchors)
            .filter_map(|a| {
                let href = a.value().attr("href")?.to_string();
                let text = a.text().collect::<String>();
                Some(PageLink { text, href })
            })
            .collect()
    }

    /// The text content of every paragraph element, in document order.
    /// No trimming or filtering here; that is the extractor's job.
    pub fn paragraphs(&self) -> Vec<String> {
        let doc = Html::parse_document(&self.html);
        let paragraphs = Selector::parse("p").expect("static selector");
        doc.select(&paragraphs)
            .map(|p| p.text().collect::<String>())
            .collect()
    }

    /// Resolve an href against this page's URL.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.url.join(href).ok()
    }
}

/// Where pages come from. The pipeline only ever talks to this trait, so
/// tests can substitute a scripted source.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<PageDocument, FetchError>;
}

/// Concrete source backed by the shared HTTP client.
///
/// No retries happen at this layer by default; the orchestrator decides the
/// retry budget and hands it down.
pub struct HttpPageSource {
    http: HttpClient,
    timeout: Duration,
    retries: usize,
}

impl HttpPageSource {
    pub fn new() -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::unanchored()?,
            timeout: DEFAULT_FETCH_TIMEOUT,
            retries: 0,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.retries = n;
        self
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> Result<PageDocument, FetchError> {
        tracing::debug!(url = %url, "fetching page");
        let html = self
            .http
            .get_text(
                url.as_str(),
                RequestOpts {
                    timeout: Some(self.timeout),
                    retries: Some(self.retries),
                    ..Default::default()
                },
            )
            .await?;
        Ok(PageDocument::new(url.clone(), html))
    }
}

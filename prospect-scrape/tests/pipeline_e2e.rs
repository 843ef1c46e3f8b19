use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use prospect_http::HttpError;
use prospect_scrape::page::{FetchError, PageDocument, PageSource};
use prospect_scrape::pipeline::{Pipeline, ProcessingResult};
use url::Url;

/// Scripted page source: canned HTML per URL, scripted failures, and a log
/// of every fetch issued.
#[derive(Default)]
struct ScriptedSource {
    pages: HashMap<String, String>,
    timeouts: HashMap<String, String>,
    log: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn with_timeout(mut self, url: &str, message: &str) -> Self {
        self.timeouts.insert(url.to_string(), message.to_string());
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch(&self, url: &Url) -> Result<PageDocument, FetchError> {
        self.log.lock().unwrap().push(url.to_string());
        if let Some(message) = self.timeouts.get(url.as_str()) {
            return Err(FetchError::Http(HttpError::Timeout(message.clone())));
        }
        match self.pages.get(url.as_str()) {
            Some(html) => Ok(PageDocument::new(url.clone(), html.clone())),
            None => Err(FetchError::Http(HttpError::Network(format!(
                "connection refused: {url}"
            )))),
        }
    }
}

const A_HOME: &str = r#"<html><body>
    <a href="/">Home</a>
    <a href="/about">About Us</a>
    <a href="/about-legal">About (legal)</a>
</body></html>"#;

#[tokio::test]
async fn batch_preserves_order_and_isolates_failures() {
    let source = Arc::new(
        ScriptedSource::default()
            .with_page("http://a.test/", A_HOME)
            .with_page("http://a.test/about", "<p>Hello</p>")
            .with_page("http://b.test/", "<html><body><p>World</p></body></html>"),
    );
    let pipeline = Pipeline::new(source);

    let mut cells = Vec::new();
    for raw in ["not a url", "http://a.test", "b.test"] {
        cells.push(pipeline.process_url(raw).await.cell_text());
    }
    assert_eq!(cells, vec!["Invalid URL format", "Hello", "World"]);
}

#[tokio::test]
async fn first_matching_about_link_is_fetched() {
    let source = Arc::new(
        ScriptedSource::default()
            .with_page("http://a.test/", A_HOME)
            .with_page("http://a.test/about", "<p>Hello</p>"),
    );
    let pipeline = Pipeline::new(source.clone());

    let result = pipeline.process_url("http://a.test").await;
    assert_eq!(result, ProcessingResult::Content("Hello".to_string()));
    assert_eq!(
        source.fetched(),
        vec!["http://a.test/".to_string(), "http://a.test/about".to_string()]
    );
}

#[tokio::test]
async fn homepage_fallback_makes_no_second_fetch() {
    let source = Arc::new(ScriptedSource::default().with_page(
        "http://b.test/",
        "<html><body><a href='/contact'>Contact</a><p>World</p></body></html>",
    ));
    let pipeline = Pipeline::new(source.clone());

    let result = pipeline.process_url("b.test").await;
    assert_eq!(result, ProcessingResult::Content("World".to_string()));
    assert_eq!(source.fetched(), vec!["http://b.test/".to_string()]);
}

#[tokio::test]
async fn invalid_input_never_reaches_the_network() {
    let source = Arc::new(ScriptedSource::default());
    let pipeline = Pipeline::new(source.clone());

    for raw in ["", "   ", "not a url", "\t"] {
        assert_eq!(
            pipeline.process_url(raw).await,
            ProcessingResult::InvalidFormat
        );
    }
    assert!(source.fetched().is_empty());
}

#[tokio::test]
async fn homepage_timeout_becomes_error_result() {
    let source = Arc::new(ScriptedSource::default().with_timeout(
        "http://valid.com/",
        "GET http://valid.com/ after 10000ms",
    ));
    let pipeline = Pipeline::new(source);

    let result = pipeline.process_url("valid.com").await;
    assert_eq!(
        result.cell_text(),
        "Error: request timed out: GET http://valid.com/ after 10000ms"
    );
}

#[tokio::test]
async fn about_fetch_failure_does_not_fall_back_to_homepage() {
    // The homepage has perfectly extractable text, but once an about link
    // is found, its fetch failure fails the row.
    let source = Arc::new(
        ScriptedSource::default()
            .with_page(
                "http://a.test/",
                "<a href='/about'>About</a><p>Homepage text</p>",
            )
            .with_timeout("http://a.test/about", "GET http://a.test/about after 10000ms"),
    );
    let pipeline = Pipeline::new(source.clone());

    let result = pipeline.process_url("http://a.test").await;
    assert!(matches!(result, ProcessingResult::Failed(_)));
    assert_eq!(source.fetched().len(), 2);
}

#[tokio::test]
async fn unreachable_host_becomes_error_result() {
    let source = Arc::new(ScriptedSource::default());
    let pipeline = Pipeline::new(source);

    let result = pipeline.process_url("c.test").await;
    assert_eq!(
        result.cell_text(),
        "Error: network error: connection refused: http://c.test/"
    );
}

#[tokio::test]
async fn empty_paragraphs_yield_no_content() {
    let source = Arc::new(
        ScriptedSource::default().with_page("http://d.test/", "<p>  </p><p>\n</p><div>x</div>"),
    );
    let pipeline = Pipeline::new(source);

    let result = pipeline.process_url("d.test").await;
    assert_eq!(result, ProcessingResult::NoContent);
    assert_eq!(result.cell_text(), "No content found");
}

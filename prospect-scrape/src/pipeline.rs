//! The per-URL orchestrator.
//!
//! `process_url` is the unit a batch driver invokes per spreadsheet row. It
//! is a total function: every failure a collaborator can raise is folded
//! into a [`ProcessingResult`], so one bad row never takes down the batch.

use crate::about::find_about_link;
use crate::extract::extract_text;
use crate::page::{FetchError, PageSource};
use crate::urls::{is_valid_url, normalize_url};
use std::sync::Arc;
use url::Url;

/// Terminal outcome for one input row, rendered into one spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResult {
    /// Extracted about-page (or fallback homepage) text.
    Content(String),
    /// Validation rejected the raw cell; no network call was made.
    InvalidFormat,
    /// Normalization produced nothing usable.
    InvalidUrl,
    /// The page fetched cleanly but yielded zero non-empty paragraphs.
    NoContent,
    /// A fetch failed; carries the triggering error's message.
    Failed(String),
}

impl ProcessingResult {
    /// The single-cell text written back to the row store.
    pub fn cell_text(&self) -> String {
        match self {
            ProcessingResult::Content(text) => text.clone(),
            ProcessingResult::InvalidFormat => "Invalid URL format".to_string(),
            ProcessingResult::InvalidUrl => "Invalid URL".to_string(),
            ProcessingResult::NoContent => "No content found".to_string(),
            ProcessingResult::Failed(message) => format!("Error: {message}"),
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            ProcessingResult::Content(text) => Some(text),
            _ => None,
        }
    }
}

/// Composes validation, fetching, about-link discovery, and extraction into
/// one "process one URL" operation with a fixed fallback policy.
pub struct Pipeline {
    source: Arc<dyn PageSource>,
}

impl Pipeline {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    /// Process one raw spreadsheet cell. Always returns a result; never
    /// propagates an error to the caller.
    pub async fn process_url(&self, raw: &str) -> ProcessingResult {
        if !is_valid_url(raw) {
            tracing::warn!(raw, "invalid URL format");
            return ProcessingResult::InvalidFormat;
        }

        let Some(normalized) = normalize_url(raw) else {
            return ProcessingResult::InvalidUrl;
        };
        if normalized != raw {
            tracing::info!(raw, normalized = %normalized, "processing");
        } else {
            tracing::info!(raw, "processing");
        }

        let homepage_url = match Url::parse(&normalized) {
            Ok(url) => url,
            Err(e) => {
                let err = FetchError::from(e);
                tracing::warn!(normalized = %normalized, error = %err, "normalized URL unparsable");
                return ProcessingResult::Failed(err.to_string());
            }
        };

        let homepage = match self.source.fetch(&homepage_url).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::error!(url = %homepage_url, error = %e, "homepage fetch failed");
                return ProcessingResult::Failed(e.to_string());
            }
        };

        // When an about-link exists, its fetch failure fails the whole row:
        // there is no second fallback to homepage content.
        let document = match find_about_link(&homepage) {
            Some(about_url) => {
                tracing::info!(url = %about_url, "found about page");
                match self.source.fetch(&about_url).await {
                    Ok(doc) => doc,
                    Err(e) => {
                        tracing::error!(url = %about_url, error = %e, "about page fetch failed");
                        return ProcessingResult::Failed(e.to_string());
                    }
                }
            }
            None => {
                tracing::info!(url = %homepage_url, "no about link; falling back to homepage content");
                homepage
            }
        };

        let text = extract_text(&document);
        if text.is_empty() {
            tracing::warn!(url = %document.url(), "no content extracted");
            return ProcessingResult::NoContent;
        }
        ProcessingResult::Content(text)
    }
}

//! Validation and normalization for raw spreadsheet URL cells.
//!
//! Spreadsheet input is free text: cells arrive empty, scheme-less, shouting
//! ("WWW.EXAMPLE.COM"), or not URLs at all. Validation rejects garbage before
//! any network call; normalization is idempotent so it is safe on every pass.

use regex::Regex;
use std::sync::OnceLock;

static DOMAIN_SHAPE: OnceLock<Regex> = OnceLock::new();

// Alphanumeric start, letters/digits/hyphen/dot body, at least one dot,
// alphabetic TLD of length >= 2.
fn domain_shape() -> &'static Regex {
    DOMAIN_SHAPE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9.]*\.[a-zA-Z]{2,}").expect("static domain pattern")
    })
}

/// Decide whether a raw cell is worth a network call.
///
/// Scheme-qualified strings pass immediately; anything else must at least
/// look like a domain.
pub fn is_valid_url(raw: &str) -> bool {
    let url = raw.trim();
    if url.is_empty() {
        return false;
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return true;
    }
    domain_shape().is_match(url)
}

/// Canonicalize a raw cell into a scheme-qualified URL string.
///
/// Returns `None` when nothing usable remains after trimming. A leading
/// `www.` is stripped only when no scheme was present.
pub fn normalize_url(raw: &str) -> Option<String> {
    let url = raw.trim().to_lowercase();
    if url.is_empty() {
        return None;
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(url);
    }
    let url = url.strip_prefix("www.").unwrap_or(&url);
    Some(format!("http://{url}"))
}

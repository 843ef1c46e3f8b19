//! Minimal HTTP client shared by the page fetcher and the LLM integration.
//!
//! - Request options: bearer auth, timeout, retry budget
//! - Retries 429/5xx and transient network failures with exponential backoff
//!   and `Retry-After` support
//! - Never logs secret values; response bodies are truncated before logging
//!
//! [`HttpClient::get_text`] retrieves raw HTML pages and
//! [`HttpClient::post_json`] speaks JSON to API collaborators. The retry
//! budget defaults to zero so that callers own the retry policy.
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), prospect_http::HttpError> {
//! let client = prospect_http::HttpClient::unanchored()?;
//! let html = client
//!     .get_text("http://example.com", prospect_http::RequestOpts::default())
//!     .await?;
//! # let _ = html;
//! # Ok(()) }
//! ```

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

const BACKOFF_BASE_MS: u64 = 200;
// When a 429 arrives without Retry-After, wait at least this long.
const RATE_LIMIT_FLOOR_MS: u64 = 1100;

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the client.
#[derive(Clone, Debug, Default)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    #[default]
    None,
}

/// Per-request tuning knobs.
///
/// ```
/// use prospect_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(10)),
///     retries: Some(0),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 10);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Option<Url>,
    inner: Client,
    pub default_timeout: Duration,
    pub default_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL. Relative paths passed to
    /// the request methods are resolved against it.
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        Ok(Self {
            base: Some(base),
            inner: build_inner()?,
            default_timeout: Duration::from_secs(10),
            default_retries: 0,
        })
    }

    /// Construct a client without a base URL. Every request must carry an
    /// absolute URL; this is the shape the page fetcher uses.
    pub fn unanchored() -> Result<Self, HttpError> {
        Ok(Self {
            base: None,
            inner: build_inner()?,
            default_timeout: Duration::from_secs(10),
            default_retries: 0,
        })
    }

    /// Override the default timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget.
    pub fn with_retries(mut self, n: usize) -> Self {
        self.default_retries = n;
        self
    }

    /// GET a page and return its raw body as text. Non-2xx statuses are
    /// errors; the error message carries the status reason, not the body.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let url = self.resolve_url(path)?;
        let (_, _, bytes) = self.request_raw(Method::GET, url, None, &opts).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// GET JSON and deserialize the response body.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve_url(path)?;
        let (_, _, bytes) = self.request_raw(Method::GET, url, None, &opts).await?;
        decode_json(&bytes)
    }

    /// POST JSON using optional Bearer auth.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let opts = RequestOpts {
            auth: bearer.map(Auth::Bearer),
            ..Default::default()
        };
        self.post_json_opts(path, body, opts).await
    }

    /// POST JSON with per-request options.
    pub async fn post_json_opts<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.resolve_url(path)?;
        let bytes = serde_json::to_vec(body).map_err(|e| HttpError::Build(e.to_string()))?;
        let (_, _, resp) = self
            .request_raw(Method::POST, url, Some(bytes), &opts)
            .await?;
        decode_json(&resp)
    }

    fn resolve_url(&self, path: &str) -> Result<Url, HttpError> {
        match &self.base {
            Some(base) => base.join(path).map_err(|e| HttpError::Url(e.to_string())),
            None => Url::parse(path).map_err(|e| HttpError::Url(e.to_string())),
        }
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_raw(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        opts: &RequestOpts<'_>,
    ) -> Result<(StatusCode, HeaderMap, Vec<u8>), HttpError> {
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let max_retries = opts.retries.unwrap_or(self.default_retries);
        let req_id = next_request_id();
        let mut attempt = 0usize;

        loop {
            attempt += 1;

            let mut rb = self.inner.request(method.clone(), url.clone()).timeout(timeout);
            if let Some(bytes) = &body {
                rb = rb
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }
            match &opts.auth {
                Some(Auth::Bearer(tok)) => {
                    let tok = sanitize_api_key(tok)?;
                    rb = rb.bearer_auth(tok);
                }
                Some(Auth::None) | None => {}
            }

            tracing::debug!(
                req_id = %req_id,
                attempt,
                max_retries,
                method = %method,
                host_path = %host_path(&url),
                timeout_ms = timeout.as_millis() as u64,
                auth_kind = %auth_kind(opts),
                has_body = body.is_some(),
                "http.request.start"
            );

            let t0 = std::time::Instant::now();
            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let error = classify_send_error(&method, &url, timeout, &err);
                    if attempt <= max_retries {
                        let delay = backoff_delay(attempt, None, None);
                        tracing::warn!(
                            req_id = %req_id,
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %error,
                            "http.retrying.send"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id = %req_id, attempt, message = %error, "http.error.send");
                    return Err(error);
                }
            };

            let status = resp.status();
            let headers = resp.headers().clone();
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(err) => {
                    let error = classify_send_error(&method, &url, timeout, &err);
                    if attempt <= max_retries {
                        let delay = backoff_delay(attempt, None, None);
                        tracing::warn!(
                            req_id = %req_id,
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %error,
                            "http.retrying.body"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id = %req_id, attempt, message = %error, "http.error.body");
                    return Err(error);
                }
            };

            tracing::debug!(
                req_id = %req_id,
                %status,
                duration_ms = t0.elapsed().as_millis() as u64,
                body_len = bytes.len(),
                "http.response"
            );

            if status.is_success() {
                return Ok((status, headers, bytes));
            }

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt <= max_retries {
                let delay = backoff_delay(attempt, Some(status), Some(&headers));
                tracing::warn!(
                    req_id = %req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    "http.retrying.status"
                );
                sleep(delay).await;
                continue;
            }

            let message = extract_error_message(&bytes, status);
            tracing::warn!(
                req_id = %req_id,
                %status,
                message = %message,
                body_snippet = %snip_body(&bytes),
                "http.error.status"
            );
            return Err(HttpError::Api { status, message });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn build_inner() -> Result<Client, HttpError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| HttpError::Build(e.to_string()))
}

fn classify_send_error(
    method: &Method,
    url: &Url,
    timeout: Duration,
    err: &reqwest::Error,
) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(format!(
            "{method} {url} after {}ms",
            timeout.as_millis()
        ))
    } else {
        HttpError::Network(err.to_string())
    }
}

fn backoff_delay(attempt: usize, status: Option<StatusCode>, headers: Option<&HeaderMap>) -> Duration {
    if let Some(secs) = headers.and_then(retry_after_delay_secs) {
        return Duration::from_secs(secs);
    }
    let exp = Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(1 << (attempt - 1)));
    if status == Some(StatusCode::TOO_MANY_REQUESTS) {
        exp.max(Duration::from_millis(RATE_LIMIT_FLOOR_MS))
    } else {
        exp
    }
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HttpError> {
    serde_json::from_slice::<T>(bytes).map_err(|e| HttpError::Decode(e.to_string(), snip_body(bytes)))
}

/// Pull a human-readable message out of an error response. JSON API bodies
/// usually carry one; HTML error pages do not, so fall back to the status
/// reason before resorting to a body snippet.
fn extract_error_message(body: &[u8], status: StatusCode) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorEnvelope {
        error: ErrorDetail,
    }
    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: String,
    }
    #[derive(serde::Deserialize)]
    struct FlatMessage {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<ErrorEnvelope>(body) {
        return env.error.message;
    }
    if let Ok(m) = serde_json::from_slice::<FlatMessage>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.detail.is_empty() {
            return m.detail;
        }
        if !m.error.is_empty() {
            return m.error;
        }
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| snip_body(body))
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

fn host_path(url: &Url) -> String {
    format!("{}{}", url.domain().unwrap_or("-"), url.path())
}

fn auth_kind(opts: &RequestOpts<'_>) -> &'static str {
    match &opts.auth {
        Some(Auth::Bearer(_)) => "bearer",
        Some(Auth::None) | None => "none",
    }
}

fn next_request_id() -> String {
    format!(
        "r{:x}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    )
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }

    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}

// src/ingest/providers/mod.rs
pub mod demo;
pub mod movies;
pub mod news;
pub mod social;

use metrics::counter;
use std::time::Duration;

pub use movies::TmdbProvider;
pub use news::NewsApiProvider;
pub use social::SocialProvider;

const USER_AGENT: &str = "content-aggregator/0.1";

/// Why an upstream call did not produce records.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// 401 / 426: the provider rejected the credential or requires an upgrade.
    #[error("credential rejected by upstream (HTTP {0})")]
    Unauthorized(u16),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    /// Never carries the request URL: TMDB puts the key in the query string.
    #[error("upstream transport error: {0}")]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        UpstreamError::Transport(e.without_url())
    }
}

impl UpstreamError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 | 426 => UpstreamError::Unauthorized(status.as_u16()),
            s => UpstreamError::Status(s),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, UpstreamError::Unauthorized(_))
    }
}

pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(target: "provider", error = ?e, "http client builder failed, using defaults");
            reqwest::Client::new()
        })
}

pub(crate) fn record_fallback(source: &'static str, reason: &'static str) {
    counter!("feed_fallback_total", "source" => source, "reason" => reason).increment(1);
}

/// Case-insensitive substring test used by every fallback search.
pub(crate) fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

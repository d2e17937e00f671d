// src/ingest/providers/news.rs
//! NewsAPI adapter with fallback to bundled articles.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::demo::DEMO_NEWS;
use super::{contains_ci, http_client, record_fallback, UpstreamError};
use crate::config::sources::MAX_NEWS_RETRIES;
use crate::config::{CredentialCheck, NewsConfig};
use crate::ingest::types::{
    normalize_date, ContentItem, ContentSource, NewsArticle, SourceData, SourceKind,
};
use crate::ingest::{stable_hash, text_or, title_case};

pub const NEWS_PLACEHOLDER_IMAGE: &str =
    "https://images.pexels.com/photos/546819/pexels-photo-546819.jpeg?auto=compress&cs=tinysrgb&w=800";

/// Tag vocabulary matched against title + description.
const TAG_VOCABULARY: [&str; 8] = [
    "Technology",
    "AI",
    "Business",
    "Innovation",
    "Science",
    "Security",
    "Remote Work",
    "Sustainability",
];
const MAX_TAGS: usize = 3;
const WORDS_PER_MINUTE: usize = 200;
const BACKOFF_BASE_MS: u64 = 500;
/// Caps a single wait at 500ms << 6 = 32s.
const MAX_BACKOFF_SHIFT: u32 = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    #[allow(dead_code)]
    status: String,
    #[serde(default)]
    #[allow(dead_code)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

pub struct NewsApiProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    country: String,
    page_size: u32,
    max_retries: u8,
    credential_ok: CredentialCheck,
}

impl NewsApiProvider {
    pub fn from_config(cfg: &NewsConfig) -> Self {
        Self {
            http: http_client(cfg.timeout_secs),
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            country: cfg.country.clone(),
            page_size: cfg.page_size,
            max_retries: cfg.max_retries.min(MAX_NEWS_RETRIES),
            credential_ok: cfg.credential.predicate(),
        }
    }

    /// Replace the credential predicate built from config.
    pub fn with_credential_check(mut self, check: CredentialCheck) -> Self {
        self.credential_ok = check;
        self
    }

    fn valid_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|k| (self.credential_ok)(k))
    }

    /// Top headlines for `category`. Never fails: no usable key or any
    /// upstream error yields the bundled articles.
    pub async fn fetch_top_headlines(&self, category: &str) -> Vec<NewsArticle> {
        let Some(key) = self.valid_key() else {
            tracing::info!(target: "provider", provider = "news", "no valid NEWS_API_KEY, serving demo articles");
            record_fallback("news", "no_credential");
            return fallback_articles().to_vec();
        };

        let mut params = vec![
            ("country", self.country.clone()),
            ("pageSize", self.page_size.to_string()),
        ];
        let category = category.trim();
        if !category.is_empty() && !category.eq_ignore_ascii_case("general") {
            params.push(("category", category.to_ascii_lowercase()));
        }

        match self.get_articles("top-headlines", key, &params).await {
            Ok(articles) => articles,
            Err(e) => {
                let reason = if e.is_auth() { "unauthorized" } else { "error" };
                tracing::warn!(target: "provider", provider = "news", error = %e, "top headlines failed, serving demo articles");
                record_fallback("news", reason);
                fallback_articles().to_vec()
            }
        }
    }

    /// Full-corpus search. On no usable key or any upstream error, filters the
    /// bundled articles instead.
    pub async fn search_news(&self, query: &str) -> Vec<NewsArticle> {
        let Some(key) = self.valid_key() else {
            record_fallback("news", "no_credential");
            return filter_articles(fallback_articles(), query);
        };

        let params = vec![
            ("q", query.to_string()),
            ("sortBy", "publishedAt".to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        match self.get_articles("everything", key, &params).await {
            Ok(articles) => articles,
            Err(e) => {
                let reason = if e.is_auth() { "unauthorized" } else { "error" };
                tracing::warn!(target: "provider", provider = "news", error = %e, "search failed, filtering demo articles");
                record_fallback("news", reason);
                filter_articles(fallback_articles(), query)
            }
        }
    }

    /// GET with retries. Credential rejections are final; anything else is
    /// retried with exponential backoff.
    async fn get_articles(
        &self,
        path: &str,
        key: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<NewsArticle>, UpstreamError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            match self.get_once(&url, key, params).await {
                Ok(articles) => return Ok(articles),
                Err(e) if e.is_auth() => return Err(e),
                Err(e) => {
                    if attempt > self.max_retries {
                        return Err(e);
                    }
                    tracing::debug!(target: "provider", provider = "news", attempt, error = %e, "retrying");
                    tokio::time::sleep(backoff_delay(attempt)).await;
                }
            }
        }
    }

    async fn get_once(
        &self,
        url: &str,
        key: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<NewsArticle>, UpstreamError> {
        let resp = self
            .http
            .get(url)
            .header("X-Api-Key", key)
            .query(params)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::from_status(status));
        }
        let body: NewsResponse = resp.json().await?;
        Ok(body.articles)
    }
}

/// Wait before retry number `attempt` (1-based): 500ms, 1s, 2s, ... capped.
fn backoff_delay(attempt: u8) -> Duration {
    let shift = u32::from(attempt.saturating_sub(1)).min(MAX_BACKOFF_SHIFT);
    Duration::from_millis(BACKOFF_BASE_MS << shift)
}

pub fn fallback_articles() -> &'static [NewsArticle] {
    DEMO_NEWS.as_slice()
}

/// Case-insensitive match over title, description and content.
pub fn filter_articles(articles: &[NewsArticle], query: &str) -> Vec<NewsArticle> {
    let q = query.to_lowercase();
    articles
        .iter()
        .filter(|a| {
            [a.title.as_deref(), a.description.as_deref(), a.content.as_deref()]
                .into_iter()
                .flatten()
                .any(|field| contains_ci(field, &q))
        })
        .cloned()
        .collect()
}

/// Convert articles to feed items. Pure; ids derive from the article itself.
pub fn normalize_articles(articles: &[NewsArticle], category: &str) -> Vec<ContentItem> {
    let category = match title_case(category) {
        c if c.is_empty() => "Technology".to_string(),
        c => c,
    };
    articles
        .iter()
        .map(|a| {
            let title = text_or(a.title.as_deref(), "Untitled");
            let description = text_or(a.description.as_deref(), "No description available");
            let author = a
                .author
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .or_else(|| Some(a.source.name.trim()).filter(|s| !s.is_empty()))
                .unwrap_or("Unknown")
                .to_string();
            let image_url = a
                .url_to_image
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(NEWS_PLACEHOLDER_IMAGE)
                .to_string();
            let body = a.content.as_deref().unwrap_or_default();

            ContentItem {
                id: format!(
                    "news-{}",
                    stable_hash(&[&a.url, &a.published_at, a.title.as_deref().unwrap_or_default()])
                ),
                tags: extract_tags(&format!("{title} {description}")),
                read_time: estimate_read_time(&format!("{title} {description} {body}")),
                title,
                description,
                category: category.clone(),
                author,
                date: normalize_date(&a.published_at),
                image_url,
                is_favorite: false,
                is_read: false,
                source: SourceKind::News,
                source_data: Some(SourceData::News(a.clone())),
                url: Some(a.url.clone()).filter(|u| !u.is_empty()),
                rating: None,
            }
        })
        .collect()
}

/// Minutes at 200 wpm, clamped to 3..=12.
pub fn estimate_read_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    (words.div_ceil(WORDS_PER_MINUTE) as u32).clamp(3, 12)
}

/// Up to three vocabulary tags whose name contains a word of the text, or is
/// contained in one. Short words (< 4 chars) only match by containment.
pub fn extract_tags(text: &str) -> Vec<String> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    TAG_VOCABULARY
        .iter()
        .filter(|tag| {
            let t = tag.to_lowercase();
            words
                .iter()
                .any(|w| w.contains(&t) || (w.chars().count() >= 4 && t.contains(w.as_str())))
        })
        .take(MAX_TAGS)
        .map(|t| t.to_string())
        .collect()
}

#[async_trait]
impl ContentSource for NewsApiProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::News
    }

    fn name(&self) -> &'static str {
        "news"
    }

    async fn fetch_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<ContentItem>> {
        let articles = self.fetch_top_headlines(topic).await;
        let take = articles.len().min(limit);
        Ok(normalize_articles(&articles[..take], topic))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContentItem>> {
        let articles = self.search_news(query).await;
        let take = articles.len().min(limit);
        Ok(normalize_articles(&articles[..take], "Technology"))
    }
}

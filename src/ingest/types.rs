// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which upstream an item came from. The derived order is the fixed
/// enumeration order used by the merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    News,
    Movies,
    Social,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::News, SourceKind::Movies, SourceKind::Social];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::News => "news",
            SourceKind::Movies => "movies",
            SourceKind::Social => "social",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------------------------------------------------------
// Native upstream records
// ------------------------------------------------------------

/// Upstreams send `null` where a field is unknown; treat it like a missing key.
fn null_as_default<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ArticleSource {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// NewsAPI article shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    pub url_to_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,
    pub content: Option<String>,
}

/// TMDB movie shape (snake_case on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TmdbMovie {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    Linkedin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    pub content: String,
    pub timestamp: String,
    pub likes: u32,
    pub shares: u32,
    pub comments: u32,
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub platform: Platform,
}

/// The original upstream record behind a `ContentItem`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum SourceData {
    News(NewsArticle),
    Movie(TmdbMovie),
    Social(SocialPost),
}

impl SourceData {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceData::News(_) => SourceKind::News,
            SourceData::Movie(_) => SourceKind::Movies,
            SourceData::Social(_) => SourceKind::Social,
        }
    }
}

// ------------------------------------------------------------
// Unified schema
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub date: String, // RFC 3339
    pub read_time: u32,
    pub tags: Vec<String>,
    pub image_url: String,
    pub is_favorite: bool,
    pub is_read: bool,
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_data: Option<SourceData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl ContentItem {
    /// Parsed `date`, if it is a valid timestamp.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }
}

pub const EPOCH_RFC3339: &str = "1970-01-01T00:00:00Z";

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Normalize an upstream timestamp to RFC 3339; unknown values become the epoch.
pub fn normalize_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_else(|| EPOCH_RFC3339.to_string())
}

// ------------------------------------------------------------
// Preferences
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub news_categories: Vec<String>,
    pub movie_genres: Vec<String>,
    pub social_hashtags: Vec<String>,
    pub content_types: BTreeSet<SourceKind>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            news_categories: vec!["technology".into(), "business".into()],
            movie_genres: vec!["action".into(), "drama".into(), "comedy".into()],
            social_hashtags: vec!["technology".into(), "webdev".into(), "startup".into()],
            content_types: SourceKind::ALL.into_iter().collect(),
        }
    }
}

impl UserPreferences {
    /// Topic hints for one source kind.
    pub fn topics_for(&self, kind: SourceKind) -> &[String] {
        match kind {
            SourceKind::News => &self.news_categories,
            SourceKind::Movies => &self.movie_genres,
            SourceKind::Social => &self.social_hashtags,
        }
    }

    pub fn wants(&self, kind: SourceKind) -> bool {
        self.content_types.contains(&kind)
    }
}

// ------------------------------------------------------------
// Adapter seam
// ------------------------------------------------------------

/// One upstream content provider, already normalized to `ContentItem`.
///
/// The bundled adapters recover from upstream failures themselves and always
/// return `Ok`; the `Result` lets the aggregator contain adapters that don't.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    fn kind(&self) -> SourceKind;
    fn name(&self) -> &'static str;

    /// Trending/top items for one topic hint, capped to `limit`.
    async fn fetch_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<ContentItem>>;

    /// Free-text search over the provider corpus, capped to `limit`.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContentItem>>;
}

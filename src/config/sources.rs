// src/config/sources.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};

pub const DEFAULT_SOURCES_CONFIG_PATH: &str = "config/sources.json";
pub const ENV_SOURCES_CONFIG_PATH: &str = "SOURCES_CONFIG_PATH";
pub const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const ENV_TMDB_API_KEY: &str = "TMDB_API_KEY";
/// Upper bound for `news.max_retries`; larger values are rejected at load.
pub const MAX_NEWS_RETRIES: u8 = 5;

/// Decides whether a configured credential is worth sending upstream.
pub type CredentialCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Credential validity rule: non-empty, not a known placeholder, long enough.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CredentialPolicy {
    /// Values that are known not to work (placeholders, shared demo keys).
    pub sentinels: Vec<String>,
    pub min_len: usize,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            sentinels: vec!["demo_key".into()],
            min_len: 1,
        }
    }
}

impl CredentialPolicy {
    pub fn accepts(&self, key: &str) -> bool {
        let key = key.trim();
        !key.is_empty()
            && key.chars().count() >= self.min_len
            && !self.sentinels.iter().any(|s| s == key)
    }

    pub fn predicate(&self) -> CredentialCheck {
        let policy = self.clone();
        Arc::new(move |key: &str| policy.accepts(key))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Literal key, or "ENV" to read `NEWS_API_KEY`.
    pub api_key: Option<String>,
    pub base_url: String,
    pub country: String,
    pub page_size: u32,
    pub max_retries: u8,
    pub timeout_secs: u64,
    pub credential: CredentialPolicy,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://newsapi.org/v2".into(),
            country: "us".into(),
            page_size: 20,
            max_retries: 2,
            timeout_secs: 10,
            credential: CredentialPolicy {
                sentinels: vec!["demo_key".into(), "your_news_api_key_here".into()],
                min_len: 11,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieConfig {
    /// Literal key, or "ENV" to read `TMDB_API_KEY`.
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    /// Release year tagged "New Release". Defaults to the current year.
    pub new_release_year: Option<i32>,
    pub timeout_secs: u64,
    pub credential: CredentialPolicy,
}

impl Default for MovieConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.themoviedb.org/3".into(),
            image_base_url: "https://image.tmdb.org/t/p/w500".into(),
            new_release_year: None,
            timeout_secs: 10,
            credential: CredentialPolicy {
                sentinels: vec!["demo_key".into(), "your_tmdb_api_key_here".into()],
                min_len: 1,
            },
        }
    }
}

/// Simulated latency of the bundled social provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub fetch_delay_ms: u64,
    pub search_delay_ms: u64,
    pub user_delay_ms: u64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 500,
            search_delay_ms: 400,
            user_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub news_limit: usize,
    pub movie_limit: usize,
    pub social_limit: usize,
    pub search_limit: usize,
    /// Per-source deadline; a source exceeding it contributes nothing.
    pub source_timeout_ms: Option<u64>,
    pub default_news_topic: String,
    pub default_movie_topic: String,
    pub default_social_topic: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            news_limit: 8,
            movie_limit: 6,
            social_limit: 8,
            search_limit: 5,
            source_timeout_ms: None,
            default_news_topic: "technology".into(),
            default_movie_topic: "popular".into(),
            default_social_topic: "technology".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub news: NewsConfig,
    pub movies: MovieConfig,
    pub social: SocialConfig,
    pub aggregator: AggregatorConfig,
}

impl SourcesConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading sources config from {}", path.display()))?;
        let mut cfg: SourcesConfig = serde_json::from_str(&data)
            .with_context(|| format!("parsing sources config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("invalid sources config {}", path.display()))?;
        cfg.resolve_env_keys();
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.news.max_retries > MAX_NEWS_RETRIES {
            anyhow::bail!(
                "news.max_retries = {} exceeds the maximum of {MAX_NEWS_RETRIES}",
                self.news.max_retries
            );
        }
        Ok(())
    }

    /// 1) $SOURCES_CONFIG_PATH  2) config/sources.json  3) built-in defaults.
    /// Missing api keys are then filled from `NEWS_API_KEY` / `TMDB_API_KEY`.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_SOURCES_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                anyhow::bail!("{ENV_SOURCES_CONFIG_PATH} points to non-existent path");
            }
            return Self::load_from_file(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_SOURCES_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from_file(&default_p);
        }
        let mut cfg = Self::default();
        cfg.resolve_env_keys();
        Ok(cfg)
    }

    fn resolve_env_keys(&mut self) {
        self.news.api_key = resolve_key(self.news.api_key.take(), ENV_NEWS_API_KEY);
        self.movies.api_key = resolve_key(self.movies.api_key.take(), ENV_TMDB_API_KEY);
    }
}

/// `None` or "ENV" → environment variable; anything else is kept verbatim.
fn resolve_key(configured: Option<String>, env_name: &str) -> Option<String> {
    match configured {
        Some(k) if !k.trim().eq_ignore_ascii_case("env") => Some(k),
        _ => env::var(env_name).ok().filter(|v| !v.trim().is_empty()),
    }
}

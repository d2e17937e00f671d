// src/ingest/preferences.rs
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::UserPreferences;

pub const ENV_PREFERENCES_PATH: &str = "FEED_PREFERENCES_PATH";

/// Load preferences from an explicit path. Supports TOML or JSON formats.
pub fn load_preferences_from(path: &Path) -> Result<UserPreferences> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading preferences from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_preferences(&content, ext.as_str())
}

/// Load preferences using env var + fallbacks:
/// 1) $FEED_PREFERENCES_PATH
/// 2) config/preferences.toml
/// 3) config/preferences.json
/// 4) built-in defaults
pub fn load_preferences_default() -> Result<UserPreferences> {
    if let Ok(p) = std::env::var(ENV_PREFERENCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_preferences_from(&pb);
        }
        return Err(anyhow!("{ENV_PREFERENCES_PATH} points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/preferences.toml");
    if toml_p.exists() {
        return load_preferences_from(&toml_p);
    }
    let json_p = PathBuf::from("config/preferences.json");
    if json_p.exists() {
        return load_preferences_from(&json_p);
    }
    Ok(UserPreferences::default())
}

fn parse_preferences(s: &str, hint_ext: &str) -> Result<UserPreferences> {
    let try_toml = hint_ext == "toml" || !s.trim_start().starts_with('{');
    if try_toml {
        if let Ok(p) = toml::from_str::<UserPreferences>(s) {
            return Ok(clean(p));
        }
    }
    if let Ok(p) = serde_json::from_str::<UserPreferences>(s) {
        return Ok(clean(p));
    }
    if !try_toml {
        if let Ok(p) = toml::from_str::<UserPreferences>(s) {
            return Ok(clean(p));
        }
    }
    Err(anyhow!("unsupported preferences format"))
}

/// Trim topics, drop blanks and duplicates; first occurrence keeps its place
/// since the first topic is the one sent upstream.
fn clean(mut p: UserPreferences) -> UserPreferences {
    p.news_categories = clean_topics(p.news_categories);
    p.movie_genres = clean_topics(p.movie_genres);
    p.social_hashtags = clean_topics(p.social_hashtags)
        .into_iter()
        .map(|h| h.trim_start_matches('#').to_string())
        .filter(|h| !h.is_empty())
        .collect();
    p
}

fn clean_topics(items: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .map(|it| it.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

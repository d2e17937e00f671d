// src/ingest/providers/social.rs
//! Social posts provider. There is no live upstream: it serves the bundled
//! posts behind a simulated network delay.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use super::contains_ci;
use super::demo::DEMO_SOCIAL_POSTS;
use crate::config::SocialConfig;
use crate::ingest::types::{
    normalize_date, parse_timestamp, ContentItem, ContentSource, SocialPost, SourceData,
    SourceKind,
};
use crate::ingest::normalize_text;

pub const SOCIAL_PLACEHOLDER_IMAGE: &str =
    "https://images.pexels.com/photos/3184287/pexels-photo-3184287.jpeg?auto=compress&cs=tinysrgb&w=800";

const TITLE_MAX_CHARS: usize = 50;
const MAX_TAGS: usize = 3;

pub struct SocialProvider {
    posts: Vec<SocialPost>,
    fetch_delay: Duration,
    search_delay: Duration,
    user_delay: Duration,
}

impl SocialProvider {
    pub fn from_config(cfg: &SocialConfig) -> Self {
        Self::with_posts(DEMO_SOCIAL_POSTS.clone(), cfg)
    }

    /// Serve a custom post set (tests, alternative demo data).
    pub fn with_posts(posts: Vec<SocialPost>, cfg: &SocialConfig) -> Self {
        Self {
            posts,
            fetch_delay: Duration::from_millis(cfg.fetch_delay_ms),
            search_delay: Duration::from_millis(cfg.search_delay_ms),
            user_delay: Duration::from_millis(cfg.user_delay_ms),
        }
    }

    pub fn posts(&self) -> &[SocialPost] {
        &self.posts
    }

    /// Posts tagged with, or mentioning, `hashtag`. Blank hashtag returns all.
    pub async fn fetch_posts(&self, hashtag: &str) -> Vec<SocialPost> {
        simulate_latency(self.fetch_delay).await;
        let tag = hashtag.trim().trim_start_matches('#').to_lowercase();
        if tag.is_empty() {
            return self.posts.clone();
        }
        self.posts
            .iter()
            .filter(|p| {
                p.hashtags.iter().any(|h| contains_ci(h, &tag)) || contains_ci(&p.content, &tag)
            })
            .cloned()
            .collect()
    }

    /// Posts by a user whose handle or display name contains `username`.
    pub async fn fetch_user_posts(&self, username: &str) -> Vec<SocialPost> {
        simulate_latency(self.user_delay).await;
        let q = username.trim().trim_start_matches('@').to_lowercase();
        self.posts
            .iter()
            .filter(|p| contains_ci(&p.username, &q) || contains_ci(&p.display_name, &q))
            .cloned()
            .collect()
    }

    pub async fn search_posts(&self, query: &str) -> Vec<SocialPost> {
        simulate_latency(self.search_delay).await;
        filter_posts(&self.posts, query)
    }
}

async fn simulate_latency(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}

/// Case-insensitive match over content, hashtags and display name.
pub fn filter_posts(posts: &[SocialPost], query: &str) -> Vec<SocialPost> {
    let q = query.to_lowercase();
    posts
        .iter()
        .filter(|p| {
            contains_ci(&p.content, &q)
                || p.hashtags.iter().any(|h| contains_ci(h, &q))
                || contains_ci(&p.display_name, &q)
        })
        .cloned()
        .collect()
}

/// First sentence of the post, cut at 50 chars with an ellipsis.
pub fn generate_title(content: &str) -> String {
    let first = content.split('.').next().unwrap_or_default().trim();
    if first.chars().count() > TITLE_MAX_CHARS {
        let cut: String = first.chars().take(TITLE_MAX_CHARS).collect();
        format!("{cut}...")
    } else if first.is_empty() {
        "Social Media Post".to_string()
    } else {
        first.to_string()
    }
}

pub fn format_time_ago(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(ts) = parse_timestamp(timestamp) else {
        return "Just now".to_string();
    };
    let minutes = (now - ts).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

pub fn normalize_posts(posts: &[SocialPost]) -> Vec<ContentItem> {
    posts
        .iter()
        .map(|p| {
            let description = match normalize_text(&p.content) {
                c if c.is_empty() => "No description available".to_string(),
                c => c,
            };
            let author = match p.display_name.trim() {
                "" => match p.username.trim() {
                    "" => "Unknown".to_string(),
                    u => u.to_string(),
                },
                d => d.to_string(),
            };
            let image_url = p
                .images
                .first()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .or_else(|| Some(p.avatar.trim()).filter(|s| !s.is_empty()))
                .unwrap_or(SOCIAL_PLACEHOLDER_IMAGE)
                .to_string();

            ContentItem {
                id: p.id.clone(),
                title: generate_title(&p.content),
                read_time: (p.content.chars().count().div_ceil(200) as u32).max(1),
                description,
                category: "Social".into(),
                author,
                date: normalize_date(&p.timestamp),
                tags: p.hashtags.iter().take(MAX_TAGS).cloned().collect(),
                image_url,
                is_favorite: false,
                is_read: false,
                source: SourceKind::Social,
                source_data: Some(SourceData::Social(p.clone())),
                url: None,
                rating: None,
            }
        })
        .collect()
}

#[async_trait]
impl ContentSource for SocialProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::Social
    }

    fn name(&self) -> &'static str {
        "social"
    }

    async fn fetch_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<ContentItem>> {
        let posts = self.fetch_posts(topic).await;
        let take = posts.len().min(limit);
        Ok(normalize_posts(&posts[..take]))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContentItem>> {
        let posts = self.search_posts(query).await;
        let take = posts.len().min(limit);
        Ok(normalize_posts(&posts[..take]))
    }
}

// tests/providers_social.rs
mod common;

use common::assert_well_formed;
use content_aggregator::config::SocialConfig;
use content_aggregator::ingest::providers::demo::DEMO_SOCIAL_POSTS;
use content_aggregator::ingest::providers::social::{filter_posts, normalize_posts};
use content_aggregator::ingest::providers::SocialProvider;
use content_aggregator::ingest::types::{Platform, SocialPost};
use content_aggregator::ContentSource;

fn instant() -> SocialConfig {
    SocialConfig {
        fetch_delay_ms: 0,
        search_delay_ms: 0,
        user_delay_ms: 0,
    }
}

fn post(id: &str, display_name: &str, content: &str, hashtags: &[&str]) -> SocialPost {
    SocialPost {
        id: id.into(),
        username: display_name.to_lowercase().replace(' ', "_"),
        display_name: display_name.into(),
        avatar: format!("https://avatars.test/{id}.png"),
        content: content.into(),
        timestamp: "2024-06-01T08:00:00Z".into(),
        likes: 1,
        shares: 0,
        comments: 0,
        hashtags: hashtags.iter().map(|h| h.to_string()).collect(),
        images: vec![],
        platform: Platform::Twitter,
    }
}

#[tokio::test]
async fn search_react_matches_only_react_posts() {
    let p = SocialProvider::from_config(&instant());
    let found = p.search_posts("React").await;
    assert!(!found.is_empty());
    assert!(found.iter().all(|p| {
        p.content.to_lowercase().contains("react")
            || p.hashtags.iter().any(|h| h.to_lowercase().contains("react"))
            || p.display_name.to_lowercase().contains("react")
    }));
    assert!(found.iter().any(|p| p.id == "social-1"));
}

#[tokio::test]
async fn search_matches_display_name() {
    let posts = vec![
        post("p1", "Jane Doe", "Shipping a release today.", &["release"]),
        post("p2", "John Roe", "Nothing to see.", &[]),
    ];
    let p = SocialProvider::with_posts(posts, &instant());
    let found = p.search_posts("jane").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "p1");
}

#[tokio::test]
async fn hashtag_fetch_filters_and_blank_returns_all() {
    let p = SocialProvider::from_config(&instant());
    let webdev = p.fetch_posts("#webdev").await;
    assert!(!webdev.is_empty());
    assert!(webdev.iter().all(|p| {
        p.hashtags.iter().any(|h| h.to_lowercase().contains("webdev"))
            || p.content.to_lowercase().contains("webdev")
    }));
    assert_eq!(p.fetch_posts("  ").await.len(), DEMO_SOCIAL_POSTS.len());
}

#[tokio::test]
async fn user_posts_by_handle() {
    let p = SocialProvider::from_config(&instant());
    let mine = p.fetch_user_posts("@techguru_sarah").await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, "social-1");
}

#[tokio::test]
async fn fetch_respects_limit() {
    let p = SocialProvider::from_config(&instant());
    let items = p.fetch_by_topic("", 2).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn normalized_posts_are_well_formed() {
    let items = normalize_posts(&DEMO_SOCIAL_POSTS);
    assert_eq!(items.len(), DEMO_SOCIAL_POSTS.len());
    for it in &items {
        assert_well_formed(it);
        assert_eq!(it.category, "Social");
        assert!(it.read_time >= 1);
        assert!(it.tags.len() <= 3);
    }
    assert_eq!(items, normalize_posts(&DEMO_SOCIAL_POSTS));
}

#[test]
fn blank_post_gets_placeholders() {
    let mut p = post("p9", "", "", &[]);
    p.username.clear();
    p.avatar.clear();
    p.timestamp = "yesterday".into();
    let it = &normalize_posts(&[p])[0];
    assert_well_formed(it);
    assert_eq!(it.title, "Social Media Post");
    assert_eq!(it.author, "Unknown");
    assert_eq!(it.date, "1970-01-01T00:00:00Z");
}

#[test]
fn filter_is_case_insensitive() {
    assert_eq!(
        filter_posts(&DEMO_SOCIAL_POSTS, "css grid").len(),
        filter_posts(&DEMO_SOCIAL_POSTS, "CSS GRID").len()
    );
}

// tests/metrics_feed.rs
#![cfg(feature = "strict-metrics")]
use anyhow::anyhow;
use async_trait::async_trait;
use content_aggregator::config::{AggregatorConfig, NewsConfig};
use content_aggregator::ingest::providers::NewsApiProvider;
use content_aggregator::metrics::Metrics;
use content_aggregator::{Aggregator, ContentItem, ContentSource, SourceKind, UserPreferences};
use std::sync::Arc;

struct Broken;

#[async_trait]
impl ContentSource for Broken {
    fn kind(&self) -> SourceKind {
        SourceKind::Movies
    }
    fn name(&self) -> &'static str {
        "broken"
    }
    async fn fetch_by_topic(&self, _: &str, _: usize) -> anyhow::Result<Vec<ContentItem>> {
        Err(anyhow!("down"))
    }
    async fn search(&self, _: &str, _: usize) -> anyhow::Result<Vec<ContentItem>> {
        Err(anyhow!("down"))
    }
}

#[tokio::test]
async fn feed_series_exposed_after_aggregation() {
    let metrics = Metrics::global().expect("recorder");

    let agg = Aggregator::new(AggregatorConfig::default())
        .with_source(Arc::new(NewsApiProvider::from_config(&NewsConfig::default())))
        .with_source(Arc::new(Broken));
    let prefs = UserPreferences {
        content_types: [SourceKind::News, SourceKind::Movies].into_iter().collect(),
        ..Default::default()
    };
    let out = agg.fetch_personalized(&prefs).await;
    assert!(!out.is_empty());

    let text = metrics.render();
    for needle in [
        "feed_items_total",
        "feed_source_errors_total",
        "feed_fallback_total",
        "feed_fetch_ms",
        "feed_last_run_ts",
    ] {
        assert!(text.contains(needle), "missing {needle} in:\n{text}");
    }
    assert!(text.contains(r#"source="movies""#));
}

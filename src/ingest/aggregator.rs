// src/ingest/aggregator.rs
//! Fan-out over the enabled sources, tolerate each failure on its own, merge.

use anyhow::{anyhow, Result};
use futures::future::join_all;
use futures::FutureExt;
use metrics::{counter, gauge, histogram};
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{AggregatorConfig, SourcesConfig};
use crate::ingest::merge::interleave_and_sort;
use crate::ingest::providers::{NewsApiProvider, SocialProvider, TmdbProvider};
use crate::ingest::types::{ContentItem, ContentSource, SourceKind, UserPreferences};
use crate::ingest::ensure_metrics_described;

pub struct Aggregator {
    sources: BTreeMap<SourceKind, Arc<dyn ContentSource>>,
    cfg: AggregatorConfig,
}

impl Aggregator {
    /// Aggregator with no sources; add them with [`Aggregator::with_source`].
    pub fn new(cfg: AggregatorConfig) -> Self {
        Self {
            sources: BTreeMap::new(),
            cfg,
        }
    }

    /// The three bundled adapters wired from config.
    pub fn from_config(cfg: &SourcesConfig) -> Self {
        Self::new(cfg.aggregator.clone())
            .with_source(Arc::new(NewsApiProvider::from_config(&cfg.news)))
            .with_source(Arc::new(TmdbProvider::from_config(&cfg.movies)))
            .with_source(Arc::new(SocialProvider::from_config(&cfg.social)))
    }

    /// Register a source; replaces any source of the same kind.
    pub fn with_source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.sources.insert(source.kind(), source);
        self
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.cfg
    }

    fn limit_for(&self, kind: SourceKind) -> usize {
        match kind {
            SourceKind::News => self.cfg.news_limit,
            SourceKind::Movies => self.cfg.movie_limit,
            SourceKind::Social => self.cfg.social_limit,
        }
    }

    fn default_topic(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::News => &self.cfg.default_news_topic,
            SourceKind::Movies => &self.cfg.default_movie_topic,
            SourceKind::Social => &self.cfg.default_social_topic,
        }
    }

    /// Personalized feed: one call per enabled content type, using the first
    /// topic from the matching preference list. Never fails; sources that
    /// error or time out contribute nothing.
    pub async fn fetch_personalized(&self, prefs: &UserPreferences) -> Vec<ContentItem> {
        let mut calls = Vec::new();
        for kind in SourceKind::ALL {
            if !prefs.wants(kind) {
                continue;
            }
            let Some(source) = self.sources.get(&kind) else {
                tracing::warn!(target: "ingest", source = %kind, "content type enabled but no source registered");
                continue;
            };
            let topic = prefs
                .topics_for(kind)
                .first()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| self.default_topic(kind))
                .to_string();
            let limit = self.limit_for(kind);
            let source = Arc::clone(source);
            calls.push((kind, async move {
                source.fetch_by_topic(&topic, limit).await
            }));
        }
        self.settle("personalized", calls).await
    }

    /// Search every registered source, capped per source.
    pub async fn search_all(&self, query: &str) -> Vec<ContentItem> {
        let limit = self.cfg.search_limit;
        let calls: Vec<_> = self
            .sources
            .iter()
            .map(|(kind, source)| {
                let source = Arc::clone(source);
                let query = query.to_string();
                (*kind, async move { source.search(&query, limit).await })
            })
            .collect();
        self.settle("search", calls).await
    }

    /// Await every call (never fail-fast), keep the successes, merge.
    async fn settle<F>(&self, op: &'static str, calls: Vec<(SourceKind, F)>) -> Vec<ContentItem>
    where
        F: Future<Output = Result<Vec<ContentItem>>>,
    {
        ensure_metrics_described();
        if calls.is_empty() {
            tracing::info!(target: "ingest", op, "no sources requested");
            return Vec::new();
        }

        let deadline = self.cfg.source_timeout_ms.map(Duration::from_millis);
        let requested = calls.len();
        let outcomes = join_all(calls.into_iter().map(|(kind, fut)| async move {
            let t0 = Instant::now();
            // A panicking source counts as a failed source.
            let fut = AssertUnwindSafe(fut).catch_unwind().map(|r| match r {
                Ok(res) => res,
                Err(panic) => Err(anyhow!("source panicked: {}", panic_message(&*panic))),
            });
            let res = match deadline {
                Some(d) => match tokio::time::timeout(d, fut).await {
                    Ok(r) => r,
                    Err(_) => Err(anyhow!("timed out after {}ms", d.as_millis())),
                },
                None => fut.await,
            };
            (kind, res, t0.elapsed())
        }))
        .await;

        let mut collected = Vec::new();
        let mut failed = 0usize;
        for (kind, res, elapsed) in outcomes {
            histogram!("feed_fetch_ms", "source" => kind.as_str())
                .record(elapsed.as_secs_f64() * 1_000.0);
            match res {
                Ok(mut items) => {
                    counter!("feed_items_total", "source" => kind.as_str())
                        .increment(items.len() as u64);
                    tracing::debug!(target: "ingest", op, source = %kind, items = items.len(), "source settled");
                    collected.append(&mut items);
                }
                Err(e) => {
                    failed += 1;
                    counter!("feed_source_errors_total", "source" => kind.as_str()).increment(1);
                    tracing::warn!(target: "ingest", op, source = %kind, error = ?e, "source failed, skipping");
                }
            }
        }

        if failed == requested {
            tracing::error!(target: "ingest", op, requested, "every source failed, returning empty feed");
        }

        let merged = interleave_and_sort(collected);
        gauge!("feed_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
        tracing::info!(target: "ingest", op, requested, failed, items = merged.len(), "aggregation done");
        merged
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}

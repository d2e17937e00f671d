// src/ingest/merge.rs
//! Round-robin interleave across sources, then a global recency sort.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::ingest::types::{ContentItem, SourceKind};

/// Group by source (keeping each source's own order), take one item per source
/// per round in `SourceKind` order, then sort by `date` descending.
///
/// The sort is stable, so items with equal timestamps keep their round-robin
/// order. Unparseable dates sink to the end.
pub fn interleave_and_sort(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut merged = interleave(items);
    merged.sort_by(|a, b| match (a.published_at(), b.published_at()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    merged
}

/// The round-robin step alone.
pub fn interleave(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let total = items.len();
    let mut by_source: BTreeMap<SourceKind, std::vec::IntoIter<ContentItem>> = BTreeMap::new();
    {
        let mut grouped: BTreeMap<SourceKind, Vec<ContentItem>> = BTreeMap::new();
        for it in items {
            grouped.entry(it.source).or_default().push(it);
        }
        for (k, v) in grouped {
            by_source.insert(k, v.into_iter());
        }
    }

    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        for queue in by_source.values_mut() {
            if let Some(it) = queue.next() {
                out.push(it);
            }
        }
    }
    out
}

// src/feed.rs
//! Consumer-side views over an aggregated feed: favorite/read overlay,
//! category views, filters, sorting, manual ordering and local search.
//!
//! Everything here is pure; persistence of the favorite/read/order sets
//! belongs to the caller.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::ingest::types::{ContentItem, SourceKind};

pub const MAX_SUGGESTIONS: usize = 5;
const MIN_SUGGESTION_QUERY: usize = 2;

/// Favorite and read ids owned by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub favorites: HashSet<String>,
    #[serde(default)]
    pub read: HashSet<String>,
}

/// Flip favorite status; returns the new state for `id`.
pub fn toggle_favorite(state: &mut UserState, id: &str) -> bool {
    if state.favorites.remove(id) {
        false
    } else {
        state.favorites.insert(id.to_string());
        true
    }
}

pub fn mark_read(state: &mut UserState, id: &str) {
    state.read.insert(id.to_string());
}

/// Copy of `items` with `isFavorite` / `isRead` set from `state`.
pub fn apply_user_state(items: &[ContentItem], state: &UserState) -> Vec<ContentItem> {
    items
        .iter()
        .map(|it| {
            let mut it = it.clone();
            it.is_favorite = state.favorites.contains(&it.id);
            it.is_read = state.read.contains(&it.id);
            it
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryView {
    #[default]
    All,
    Favorites,
    /// Items not yet read ("read later").
    Unread,
    /// Every item, ranked by rating + read time.
    Trending,
    News,
    Movies,
    Social,
    /// Exact match on `category`.
    Category(String),
}

impl CategoryView {
    pub fn apply(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        let by_source = |kind: SourceKind| -> Vec<ContentItem> {
            items.iter().filter(|i| i.source == kind).cloned().collect()
        };
        match self {
            CategoryView::All => items.to_vec(),
            CategoryView::Favorites => items.iter().filter(|i| i.is_favorite).cloned().collect(),
            CategoryView::Unread => items.iter().filter(|i| !i.is_read).cloned().collect(),
            CategoryView::Trending => {
                let mut out = items.to_vec();
                out.sort_by(|a, b| trending_score(b).total_cmp(&trending_score(a)));
                out
            }
            CategoryView::News => by_source(SourceKind::News),
            CategoryView::Movies => by_source(SourceKind::Movies),
            CategoryView::Social => by_source(SourceKind::Social),
            CategoryView::Category(name) => items
                .iter()
                .filter(|i| &i.category == name)
                .cloned()
                .collect(),
        }
    }
}

fn trending_score(item: &ContentItem) -> f64 {
    item.rating.unwrap_or(0.0) + f64::from(item.read_time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    Any,
    /// Since midnight UTC of `now`.
    Today,
    Week,
    Month,
}

impl DateRange {
    /// Earliest accepted timestamp, or `None` for no bound.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DateRange::Any => None,
            DateRange::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc()),
            DateRange::Week => Some(now - Duration::days(7)),
            DateRange::Month => now
                .checked_sub_months(Months::new(1))
                .or(Some(now - Duration::days(30))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadStatus {
    #[default]
    Any,
    Read,
    Unread,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedFilter {
    pub date_range: DateRange,
    /// Case-insensitive substring of `author`.
    pub author: Option<String>,
    /// Keep items carrying at least one of these tags (exact match).
    pub tags: Vec<String>,
    pub read_status: ReadStatus,
}

impl FeedFilter {
    pub fn apply(&self, items: &[ContentItem], now: DateTime<Utc>) -> Vec<ContentItem> {
        let cutoff = self.date_range.cutoff(now);
        let author = self
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_lowercase);

        items
            .iter()
            .filter(|it| match cutoff {
                Some(c) => it.published_at().is_some_and(|d| d >= c),
                None => true,
            })
            .filter(|it| match &author {
                Some(a) => it.author.to_lowercase().contains(a.as_str()),
                None => true,
            })
            .filter(|it| self.tags.is_empty() || self.tags.iter().any(|t| it.tags.contains(t)))
            .filter(|it| match self.read_status {
                ReadStatus::Any => true,
                ReadStatus::Read => it.is_read,
                ReadStatus::Unread => !it.is_read,
            })
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Highest rating first; unrated counts as 0.
    Rating,
    /// Shortest first.
    ReadTime,
    /// Alphabetical, case-insensitive.
    Title,
}

/// Stable sort in place.
pub fn sort_items(items: &mut [ContentItem], order: SortOrder) {
    match order {
        SortOrder::Newest => items.sort_by(|a, b| cmp_dates(b, a)),
        SortOrder::Oldest => items.sort_by(cmp_dates),
        SortOrder::Rating => items.sort_by(|a, b| {
            b.rating
                .unwrap_or(0.0)
                .total_cmp(&a.rating.unwrap_or(0.0))
        }),
        SortOrder::ReadTime => items.sort_by_key(|i| i.read_time),
        SortOrder::Title => items.sort_by_cached_key(|i| i.title.to_lowercase()),
    }
}

// Unparseable dates compare as the oldest possible value.
fn cmp_dates(a: &ContentItem, b: &ContentItem) -> Ordering {
    a.published_at().cmp(&b.published_at())
}

/// Items whose id appears in `order` come first in that order; the rest keep
/// their relative order after them. Unknown ids are ignored.
pub fn apply_manual_order(items: Vec<ContentItem>, order: &[String]) -> Vec<ContentItem> {
    if order.is_empty() {
        return items;
    }
    let mut slots: Vec<Option<ContentItem>> = items.into_iter().map(Some).collect();
    let index: HashMap<String, usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, it)| it.as_ref().map(|it| (it.id.clone(), i)))
        .collect();

    let mut out = Vec::with_capacity(slots.len());
    for id in order {
        if let Some(&i) = index.get(id) {
            if let Some(it) = slots[i].take() {
                out.push(it);
            }
        }
    }
    out.extend(slots.into_iter().flatten());
    out
}

fn matches_query(item: &ContentItem, q: &str) -> bool {
    item.title.to_lowercase().contains(q)
        || item.description.to_lowercase().contains(q)
        || item.author.to_lowercase().contains(q)
        || item.category.to_lowercase().contains(q)
        || item.tags.iter().any(|t| t.to_lowercase().contains(q))
}

/// Case-insensitive substring search; a blank query returns everything.
pub fn search_content(items: &[ContentItem], query: &str) -> Vec<ContentItem> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return items.to_vec();
    }
    items.iter().filter(|i| matches_query(i, &q)).cloned().collect()
}

/// Type-ahead strings: matching titles, authors and tags, deduplicated in
/// first-seen order. Nothing for very short queries.
pub fn search_suggestions(items: &[ContentItem], query: &str) -> Vec<String> {
    let q = query.trim().to_lowercase();
    if q.chars().count() < MIN_SUGGESTION_QUERY {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let fields = [&item.title, &item.author].into_iter().chain(&item.tags);
        for field in fields {
            if field.to_lowercase().contains(&q) && seen.insert(field.as_str()) {
                out.push(field.clone());
                if out.len() == MAX_SUGGESTIONS {
                    return out;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, date: &str) -> ContentItem {
        ContentItem {
            id: id.into(),
            title: id.to_uppercase(),
            description: "d".into(),
            category: "Technology".into(),
            author: "Sarah Chen".into(),
            date: date.into(),
            read_time: 5,
            tags: vec![],
            image_url: "i".into(),
            is_favorite: false,
            is_read: false,
            source: SourceKind::News,
            source_data: None,
            url: None,
            rating: None,
        }
    }

    #[test]
    fn toggle_flips_both_ways() {
        let mut s = UserState::default();
        assert!(toggle_favorite(&mut s, "a"));
        assert!(!toggle_favorite(&mut s, "a"));
        assert!(s.favorites.is_empty());
    }

    #[test]
    fn manual_order_puts_listed_first() {
        let items = vec![
            item("a", "2024-01-01"),
            item("b", "2024-01-02"),
            item("c", "2024-01-03"),
        ];
        let out = apply_manual_order(items, &["c".into(), "zzz".into(), "a".into()]);
        let ids: Vec<_> = out.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn today_cutoff_is_midnight() {
        let now = DateTime::parse_from_rfc3339("2024-05-10T15:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let c = DateRange::Today.cutoff(now).unwrap();
        assert_eq!(c.to_rfc3339(), "2024-05-10T00:00:00+00:00");
        assert!(DateRange::Any.cutoff(now).is_none());
    }

    #[test]
    fn short_query_has_no_suggestions() {
        let items = vec![item("a", "2024-01-01")];
        assert!(search_suggestions(&items, "s").is_empty());
        assert_eq!(search_suggestions(&items, "sa"), vec!["Sarah Chen"]);
    }
}

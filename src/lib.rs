// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod feed;
pub mod ingest;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::config::SourcesConfig;
pub use crate::feed::UserState;
pub use crate::ingest::types::{ContentItem, ContentSource, SourceData, SourceKind, UserPreferences};
pub use crate::ingest::{interleave_and_sort, Aggregator};

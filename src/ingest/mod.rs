// src/ingest/mod.rs
pub mod aggregator;
pub mod merge;
pub mod preferences;
pub mod providers;
pub mod types;

pub use aggregator::Aggregator;
pub use merge::interleave_and_sort;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on the exporter).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(describe_metrics);
}

/// Register descriptions with the currently installed recorder.
pub(crate) fn describe_metrics() {
    describe_counter!(
        "feed_items_total",
        "Normalized items contributed per source."
    );
    describe_counter!(
        "feed_source_errors_total",
        "Source calls that failed or timed out and contributed nothing."
    );
    describe_counter!(
        "feed_fallback_total",
        "Adapter calls answered from bundled fallback data."
    );
    describe_histogram!("feed_fetch_ms", "Per-source fetch time in milliseconds.");
    describe_gauge!(
        "feed_last_run_ts",
        "Unix ts when an aggregation last completed."
    );
}

/// Clean upstream text: decode entities, strip tags, fold quotes and whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| {
        regex::Regex::new(r"(?is)</?[a-z!][^>]*>").expect("static tag regex")
    });
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("static ws regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Cleaned text, or `placeholder` when nothing is left.
pub(crate) fn text_or(raw: Option<&str>, placeholder: &str) -> String {
    let cleaned = raw.map(normalize_text).unwrap_or_default();
    if cleaned.is_empty() {
        placeholder.to_string()
    } else {
        cleaned
    }
}

/// "remote work" -> "Remote Work"
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut cs = w.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().chain(cs.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short stable hex digest used for ids that must survive refetches.
pub(crate) fn stable_hash(parts: &[&str]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(p.as_bytes());
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_strips_markup_and_ws() {
        let s = "  <p>Hello,&nbsp;&nbsp; <b>world</b>!</p>  ";
        assert_eq!(normalize_text(s), "Hello, world!");
    }

    #[test]
    fn normalize_text_keeps_comparisons() {
        assert_eq!(normalize_text("a < b and c > d"), "a < b and c > d");
    }

    #[test]
    fn text_or_uses_placeholder_for_blank() {
        assert_eq!(text_or(None, "x"), "x");
        assert_eq!(text_or(Some("  <br/> "), "x"), "x");
        assert_eq!(text_or(Some("ok"), "x"), "ok");
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("remote WORK"), "Remote Work");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn stable_hash_is_deterministic() {
        assert_eq!(stable_hash(&["a", "b"]), stable_hash(&["a", "b"]));
        assert_ne!(stable_hash(&["a", "b"]), stable_hash(&["ab"]));
        assert_eq!(stable_hash(&["x"]).len(), 12);
    }
}

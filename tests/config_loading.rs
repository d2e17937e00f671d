// tests/config_loading.rs
use content_aggregator::config::sources::{ENV_NEWS_API_KEY, ENV_SOURCES_CONFIG_PATH};
use content_aggregator::config::SourcesConfig;
use content_aggregator::ingest::preferences::{load_preferences_from, ENV_PREFERENCES_PATH};
use content_aggregator::SourceKind;
use serial_test::serial;
use std::{env, fs};

struct CwdGuard(std::path::PathBuf);

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.0);
    }
}

fn enter(dir: &std::path::Path) -> CwdGuard {
    let old = env::current_dir().unwrap();
    env::set_current_dir(dir).unwrap();
    CwdGuard(old)
}

#[test]
#[serial]
fn defaults_when_nothing_configured() {
    let tmp = tempfile::tempdir().unwrap();
    let _cwd = enter(tmp.path());
    env::remove_var(ENV_SOURCES_CONFIG_PATH);
    env::remove_var(ENV_NEWS_API_KEY);

    let cfg = SourcesConfig::load_default().unwrap();
    assert!(cfg.news.api_key.is_none());
    assert_eq!(cfg.aggregator.news_limit, 8);
    assert_eq!(cfg.aggregator.search_limit, 5);
}

#[test]
#[serial]
fn env_key_fills_missing_and_env_marker() {
    let tmp = tempfile::tempdir().unwrap();
    let _cwd = enter(tmp.path());
    env::remove_var(ENV_SOURCES_CONFIG_PATH);
    env::set_var(ENV_NEWS_API_KEY, "key-from-environment");

    let cfg = SourcesConfig::load_default().unwrap();
    assert_eq!(cfg.news.api_key.as_deref(), Some("key-from-environment"));

    fs::create_dir_all("config").unwrap();
    fs::write(
        "config/sources.json",
        r#"{"news":{"api_key":"ENV"},"aggregator":{"movie_limit":2}}"#,
    )
    .unwrap();
    let cfg = SourcesConfig::load_default().unwrap();
    assert_eq!(cfg.news.api_key.as_deref(), Some("key-from-environment"));
    assert_eq!(cfg.aggregator.movie_limit, 2);

    env::remove_var(ENV_NEWS_API_KEY);
}

#[test]
#[serial]
fn env_path_wins_and_must_exist() {
    let tmp = tempfile::tempdir().unwrap();
    let _cwd = enter(tmp.path());
    let p = tmp.path().join("custom.json");
    fs::write(&p, r#"{"news":{"api_key":"literal-key-123"}}"#).unwrap();

    env::set_var(ENV_SOURCES_CONFIG_PATH, &p);
    let cfg = SourcesConfig::load_default().unwrap();
    assert_eq!(cfg.news.api_key.as_deref(), Some("literal-key-123"));

    env::set_var(ENV_SOURCES_CONFIG_PATH, tmp.path().join("nope.json"));
    assert!(SourcesConfig::load_default().is_err());
    env::remove_var(ENV_SOURCES_CONFIG_PATH);
}

#[test]
#[serial]
fn malformed_sources_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("broken.json");
    fs::write(&p, "{ nope").unwrap();
    let err = SourcesConfig::load_from_file(&p).unwrap_err();
    assert!(format!("{err:#}").contains("parsing sources config"));
}

#[test]
#[serial]
fn oversized_news_retry_count_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("retries.json");
    fs::write(&p, r#"{"news":{"max_retries":20}}"#).unwrap();
    let err = SourcesConfig::load_from_file(&p).unwrap_err();
    assert!(format!("{err:#}").contains("max_retries"), "{err:#}");

    fs::write(&p, r#"{"news":{"max_retries":5}}"#).unwrap();
    assert_eq!(SourcesConfig::load_from_file(&p).unwrap().news.max_retries, 5);
}

#[test]
#[serial]
fn toml_preferences_beat_json() {
    let tmp = tempfile::tempdir().unwrap();
    let _cwd = enter(tmp.path());
    env::remove_var(ENV_PREFERENCES_PATH);
    fs::create_dir_all("config").unwrap();
    fs::write(
        "config/preferences.json",
        r#"{"newsCategories":["from-json"]}"#,
    )
    .unwrap();
    fs::write(
        "config/preferences.toml",
        "newsCategories = [\"from-toml\"]\ncontentTypes = [\"news\"]\n",
    )
    .unwrap();

    let p = content_aggregator::ingest::preferences::load_preferences_default().unwrap();
    assert_eq!(p.news_categories, vec!["from-toml".to_string()]);
    assert!(p.wants(SourceKind::News));
    assert!(!p.wants(SourceKind::Movies));

    fs::remove_file("config/preferences.toml").unwrap();
    let p = content_aggregator::ingest::preferences::load_preferences_default().unwrap();
    assert_eq!(p.news_categories, vec!["from-json".to_string()]);
}

#[test]
fn shipped_preferences_parse() {
    let p = load_preferences_from(std::path::Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/config/preferences.toml"
    )))
    .unwrap();
    assert_eq!(p.news_categories.first().map(String::as_str), Some("technology"));
    assert_eq!(p.content_types.len(), 3);
}

#[test]
#[serial]
fn shipped_sources_config_rejects_shared_demo_key() {
    env::remove_var(ENV_NEWS_API_KEY);
    let cfg = SourcesConfig::load_from_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/config/sources.json"
    ))
    .unwrap();
    assert!(!cfg.news.credential.accepts("77407bc80c6b4eb0a4d9bd14962fe690"));
    assert!(cfg.news.api_key.is_none());
}

//! content-aggregator: prints the personalized feed (or search results) as JSON.
//!
//!   content-aggregator                  personalized feed from preferences
//!   content-aggregator search <query>   search across all sources

use anyhow::{bail, Result};
use content_aggregator::ingest::preferences::load_preferences_default;
use content_aggregator::metrics::Metrics;
use content_aggregator::{Aggregator, SourcesConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so stdout stays valid JSON.
/// FEED_LOG_JSON=1 switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("content_aggregator=info,warn"));
    let json = std::env::var("FEED_LOG_JSON").is_ok_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

enum Command {
    Feed,
    Search(String),
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args.split_first() {
        None => Ok(Command::Feed),
        Some((cmd, rest)) if cmd == "search" => {
            let q = rest.join(" ");
            if q.trim().is_empty() {
                bail!("usage: content-aggregator search <query...>");
            }
            Ok(Command::Search(q))
        }
        Some((other, _)) => bail!("unknown command `{other}` (expected: search <query...>)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; missing file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let metrics = match Metrics::global() {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(error = ?e, "metrics recorder not installed");
            None
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let cfg = SourcesConfig::load_default()?;
    let aggregator = Aggregator::from_config(&cfg);

    let items = match command {
        Command::Feed => {
            let prefs = load_preferences_default()?;
            aggregator.fetch_personalized(&prefs).await
        }
        Command::Search(q) => aggregator.search_all(&q).await,
    };

    println!("{}", serde_json::to_string_pretty(&items)?);

    if std::env::var("FEED_METRICS_DUMP").is_ok_and(|v| v == "1") {
        if let Some(m) = metrics {
            eprintln!("{}", m.render());
        }
    }
    Ok(())
}

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use douyin_quickcopy::common::logger;
use douyin_quickcopy::common::types::AnyResult;
use douyin_quickcopy::configs::Config;
use douyin_quickcopy::engine::EngineContext;

/// One observed call: the request address and the response body it produced.
#[derive(Debug, Deserialize)]
struct CaptureRecord {
    url: String,
    body: serde_json::Value,
}

/// Replays captured API traffic through the interception pipeline and
/// reports what resolved. Input is NDJSON, one `{"url", "body"}` record per
/// line.
#[tokio::main]
async fn main() -> AnyResult<()> {
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    logger::init(&config);
    if let Some(err) = load_error {
        warn!("failed to load configuration, using defaults: {}", err);
    }

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: quickcopy-replay <capture.ndjson>")?;

    let ctx = Arc::new(EngineContext::new(config.platform.clone()));

    let capture = std::fs::read_to_string(&path)?;
    let mut records = 0usize;
    let mut skipped = 0usize;
    for (line_no, line) in capture.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<CaptureRecord>(line) {
            Ok(record) => {
                ctx.ingest_response(&record.url, &record.body);
                records += 1;
            }
            Err(err) => {
                warn!("skipping malformed record on line {}: {}", line_no + 1, err);
                skipped += 1;
            }
        }
    }

    info!(
        "replayed {} records ({} skipped), resolved {} items",
        records,
        skipped,
        ctx.cache.len()
    );

    for (id, url) in ctx.cache.snapshot() {
        println!("{}\t{}", id, url);
    }

    Ok(())
}

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;
use tracing::debug;

use crate::common::errors::EngineError;
use crate::common::types::ContentId;
use crate::configs::PlatformConfig;
use crate::engine::cache::ResolutionCache;
use crate::intercept::classify::{EndpointKind, classify};
use crate::metadata::{self, DetailResponse, VideoMetadata};
use crate::ranker;

/// What the user is looking at right now, as last reconciled.
#[derive(Debug, Clone, Default)]
pub struct CurrentView {
    pub id: Option<ContentId>,
    pub url: Option<String>,
    pub href: String,
}

/// Shared state of the enhancement engine: the resolution cache plus the
/// current-view snapshot, owned by one composition root and handed to the
/// interception and synchronizer tasks as `Arc<EngineContext>`.
///
/// Interception callbacks are the only writers of the cache; the
/// synchronizer and the action surface only read it. Writes for the same ID
/// are last-write-wins across ticks, which is accepted.
pub struct EngineContext {
    pub platform: PlatformConfig,
    pub cache: ResolutionCache,
    pub current: Mutex<CurrentView>,
    resolved: Notify,
}

impl EngineContext {
    pub fn new(platform: PlatformConfig) -> Self {
        Self {
            platform,
            cache: ResolutionCache::new(),
            current: Mutex::new(CurrentView::default()),
            resolved: Notify::new(),
        }
    }

    pub fn current_view(&self) -> CurrentView {
        self.current.lock().clone()
    }

    /// Resolves as soon as an interception write lands, so the synchronizer
    /// does not have to wait out a full poll tick.
    pub async fn wait_resolved(&self) {
        self.resolved.notified().await;
    }

    /// Feeds one observed response through classification, extraction and
    /// ranking. Non-matching addresses and unparseable payloads are dropped
    /// without affecting anything else in flight.
    pub fn ingest_response(&self, raw_url: &str, payload: &Value) {
        if let Err(err) = self.try_ingest(raw_url, payload) {
            debug!("dropping response from {}: {}", raw_url, err);
        }
    }

    fn try_ingest(&self, raw_url: &str, payload: &Value) -> Result<(), EngineError> {
        let Some(classified) = classify(raw_url, &self.platform) else {
            return Ok(());
        };

        match classified.kind {
            EndpointKind::Detail => {
                let response: DetailResponse = serde_json::from_value(payload.clone())?;

                // The body names the item; the request query is the fallback.
                let query_id = classified
                    .url
                    .query_pairs()
                    .find(|(key, _)| key == "aweme_id")
                    .map(|(_, value)| value.into_owned());

                let detail = response.aweme_detail.unwrap_or_default();
                let id = detail.aweme_id.or(query_id);
                self.store(id, detail.video.as_ref());
            }
            EndpointKind::Feed => {
                for item in metadata::feed_items(payload) {
                    self.store(item.aweme_id, item.video.as_ref());
                }
            }
        }
        Ok(())
    }

    fn store(&self, id: Option<String>, video: Option<&VideoMetadata>) {
        let Some(id) = id else { return };
        let Some(video) = video else { return };
        let Some(url) = ranker::pick_best_url(video, &self.platform.play_marker) else {
            return;
        };

        let id = ContentId::from(id);
        debug!("[{}] resolved playable url", id);
        self.cache.set(id.clone(), url.clone());

        {
            let mut current = self.current.lock();
            if current.id.as_ref() == Some(&id) {
                current.url = Some(url);
            }
        }
        self.resolved.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DETAIL_URL: &str = "https://www.douyin.com/aweme/v1/web/aweme/detail/?aweme_id=123";
    const FEED_URL: &str = "https://www.douyin.com/aweme/v1/web/tab/feed/?count=10";

    fn ctx() -> EngineContext {
        EngineContext::new(PlatformConfig::default())
    }

    #[test]
    fn test_detail_caches_highest_compatible_bitrate() {
        let ctx = ctx();
        let payload = json!({
            "aweme_detail": {
                "aweme_id": "123",
                "video": {
                    "bit_rate": [
                        { "format": "mp4", "bit_rate": 500, "play_addr": { "url_list": ["https://x/a"] } },
                        { "format": "mp4", "bit_rate": 900, "play_addr": { "url_list": ["https://x/b"] } },
                    ]
                }
            }
        });

        ctx.ingest_response(DETAIL_URL, &payload);

        assert_eq!(
            ctx.cache.get(&ContentId::from("123")).as_deref(),
            Some("https://x/b")
        );
    }

    #[test]
    fn test_detail_skips_h265_variant() {
        let ctx = ctx();
        let payload = json!({
            "aweme_detail": {
                "aweme_id": "123",
                "video": {
                    "bit_rate": [
                        { "format": "mp4", "bit_rate": 500, "play_addr": { "url_list": ["https://x/a"] } },
                        { "format": "mp4", "bit_rate": 900, "is_h265": 1, "play_addr": { "url_list": ["https://x/b"] } },
                    ]
                }
            }
        });

        ctx.ingest_response(DETAIL_URL, &payload);

        assert_eq!(
            ctx.cache.get(&ContentId::from("123")).as_deref(),
            Some("https://x/a")
        );
    }

    #[test]
    fn test_detail_id_from_body_outranks_query() {
        let ctx = ctx();
        let payload = json!({
            "aweme_detail": {
                "aweme_id": "999",
                "video": { "play_addr": { "url_list": ["https://x/a"] } }
            }
        });

        ctx.ingest_response(DETAIL_URL, &payload);

        assert!(ctx.cache.get(&ContentId::from("999")).is_some());
        assert!(ctx.cache.get(&ContentId::from("123")).is_none());
    }

    #[test]
    fn test_detail_id_falls_back_to_request_query() {
        let ctx = ctx();
        let payload = json!({
            "aweme_detail": {
                "video": { "play_addr": { "url_list": ["https://x/a"] } }
            }
        });

        ctx.ingest_response(DETAIL_URL, &payload);

        assert!(ctx.cache.get(&ContentId::from("123")).is_some());
    }

    #[test]
    fn test_feed_items_cached_independently() {
        let ctx = ctx();
        let payload = json!({
            "aweme_list": [
                { "aweme_id": "1", "video": { "play_addr": { "url_list": ["https://x/1"] } } },
                { "aweme_id": "2", "video": { "play_addr": { "url_list": ["https://x/2"] } } },
                { "aweme_id": 3, "video": "broken" },
            ]
        });

        ctx.ingest_response(FEED_URL, &payload);

        assert_eq!(ctx.cache.len(), 2);
        assert_eq!(
            ctx.cache.get(&ContentId::from("1")).as_deref(),
            Some("https://x/1")
        );
        assert_eq!(
            ctx.cache.get(&ContentId::from("2")).as_deref(),
            Some("https://x/2")
        );
    }

    #[test]
    fn test_repeated_ingest_is_idempotent() {
        let ctx = ctx();
        let payload = json!({
            "aweme_detail": {
                "aweme_id": "123",
                "video": { "play_addr": { "url_list": ["https://x/a"] } }
            }
        });

        ctx.ingest_response(DETAIL_URL, &payload);
        ctx.ingest_response(DETAIL_URL, &payload);

        assert_eq!(ctx.cache.len(), 1);
        assert_eq!(
            ctx.cache.get(&ContentId::from("123")).as_deref(),
            Some("https://x/a")
        );
    }

    #[test]
    fn test_foreign_host_ignored() {
        let ctx = ctx();
        let payload = json!({
            "aweme_detail": {
                "aweme_id": "123",
                "video": { "play_addr": { "url_list": ["https://x/a"] } }
            }
        });

        ctx.ingest_response(
            "https://evil.example.com/aweme/v1/web/aweme/detail/?aweme_id=123",
            &payload,
        );

        assert!(ctx.cache.is_empty());
    }

    #[test]
    fn test_ingest_updates_current_view_on_matching_id() {
        let ctx = ctx();
        ctx.current.lock().id = Some(ContentId::from("123"));

        let payload = json!({
            "aweme_detail": {
                "aweme_id": "123",
                "video": { "play_addr": { "url_list": ["https://x/a"] } }
            }
        });
        ctx.ingest_response(DETAIL_URL, &payload);

        assert_eq!(ctx.current_view().url.as_deref(), Some("https://x/a"));
    }

    #[test]
    fn test_unparseable_detail_is_swallowed() {
        let ctx = ctx();
        ctx.ingest_response(DETAIL_URL, &json!({ "aweme_detail": "not an object" }));

        assert!(ctx.cache.is_empty());
    }

    #[test]
    fn test_unparseable_detail_is_a_parse_error() {
        let ctx = ctx();
        let err = ctx
            .try_ingest(DETAIL_URL, &json!({ "aweme_detail": "not an object" }))
            .unwrap_err();

        assert!(matches!(err, EngineError::Parse(_)));
    }
}

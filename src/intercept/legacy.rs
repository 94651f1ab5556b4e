use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;
use tracing::debug;

use crate::configs::EngineConfig;
use crate::engine::EngineContext;
use crate::intercept::classify::classify;

/// Observation shim for the older progress-event request object.
///
/// The host still performs its own transfer: it announces the target with
/// [`open`](Self::open), kicks observation off with [`send`](Self::send) and
/// hands over whatever body it received via [`complete`](Self::complete).
/// Completion signaling on this transport is inconsistent across host usage
/// patterns, so two listeners race: a short-interval completion poll and a
/// completion-event subscription. A single-shot latch lets whichever parses
/// a JSON-shaped body first win; the other is suppressed and capture happens
/// at most once per call.
pub struct LegacyRequest {
    ctx: Arc<EngineContext>,
    poll_interval: Duration,
    url: Mutex<String>,
    shared: Arc<LegacyShared>,
}

#[derive(Default)]
struct LegacyShared {
    handled: AtomicBool,
    ready: AtomicBool,
    body: Mutex<Option<String>>,
    completed: Notify,
}

impl LegacyRequest {
    pub fn new(ctx: Arc<EngineContext>, config: &EngineConfig) -> Self {
        Self {
            ctx,
            poll_interval: Duration::from_millis(config.legacy_poll_ms),
            url: Mutex::new(String::new()),
            shared: Arc::new(LegacyShared::default()),
        }
    }

    /// Captures the target address at call-setup time.
    pub fn open(&self, url: impl Into<String>) {
        *self.url.lock() = url.into();
    }

    /// Starts observing. Non-matching targets install nothing at all.
    pub fn send(&self) {
        let url = self.url.lock().clone();
        if classify(&url, &self.ctx.platform).is_none() {
            return;
        }

        let poll_shared = Arc::clone(&self.shared);
        let poll_ctx = Arc::clone(&self.ctx);
        let poll_url = url.clone();
        let poll_interval = self.poll_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            loop {
                interval.tick().await;
                if poll_shared.handled.load(Ordering::SeqCst) {
                    break;
                }
                if poll_shared.ready.load(Ordering::SeqCst) {
                    try_capture(&poll_ctx, &poll_url, &poll_shared);
                    break;
                }
            }
        });

        let event_shared = Arc::clone(&self.shared);
        let event_ctx = Arc::clone(&self.ctx);
        tokio::spawn(async move {
            event_shared.completed.notified().await;
            try_capture(&event_ctx, &url, &event_shared);
        });
    }

    /// Called by the host when its transfer finishes.
    pub fn complete(&self, body: impl Into<String>) {
        *self.shared.body.lock() = Some(body.into());
        self.shared.ready.store(true, Ordering::SeqCst);
        self.shared.completed.notify_one();
    }
}

fn try_capture(ctx: &EngineContext, url: &str, shared: &LegacyShared) {
    if shared.handled.load(Ordering::SeqCst) {
        return;
    }

    let Some(body) = shared.body.lock().clone() else {
        return;
    };
    let payload: Value = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(err) => {
            debug!("legacy capture from {} did not parse: {}", url, err);
            return;
        }
    };
    if !(payload.is_object() || payload.is_array()) {
        return;
    }

    // The racing listeners both land here; only the first one proceeds.
    if shared.handled.swap(true, Ordering::SeqCst) {
        return;
    }
    ctx.ingest_response(url, &payload);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::ContentId;
    use crate::configs::PlatformConfig;

    const DETAIL_URL: &str = "https://www.douyin.com/aweme/v1/web/aweme/detail/?aweme_id=123";

    fn detail_body(url: &str) -> String {
        serde_json::json!({
            "aweme_detail": {
                "aweme_id": "123",
                "video": { "play_addr": { "url_list": [url] } }
            }
        })
        .to_string()
    }

    fn request() -> (LegacyRequest, Arc<EngineContext>) {
        let ctx = Arc::new(EngineContext::new(PlatformConfig::default()));
        let request = LegacyRequest::new(Arc::clone(&ctx), &EngineConfig::default());
        (request, ctx)
    }

    async fn drain() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_completion_is_captured_once() {
        let (request, ctx) = request();
        request.open(DETAIL_URL);
        request.send();

        request.complete(detail_body("https://x/a"));
        drain().await;

        assert_eq!(
            ctx.cache.get(&ContentId::from("123")).as_deref(),
            Some("https://x/a")
        );

        // A duplicate completion signal is suppressed by the latch.
        request.complete(detail_body("https://x/b"));
        drain().await;
        assert_eq!(
            ctx.cache.get(&ContentId::from("123")).as_deref(),
            Some("https://x/a")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_listener_captures_without_event_delivery() {
        let (request, ctx) = request();
        request.open(DETAIL_URL);
        request.send();

        // Mark the body ready without waking the event listener, as hosts
        // that never fire completion events behave.
        *request.shared.body.lock() = Some(detail_body("https://x/a"));
        request.shared.ready.store(true, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(
            ctx.cache.get(&ContentId::from("123")).as_deref(),
            Some("https://x/a")
        );
    }

    #[tokio::test]
    async fn test_completion_before_send_still_captures() {
        let (request, ctx) = request();
        request.open(DETAIL_URL);
        request.complete(detail_body("https://x/a"));

        request.send();
        drain().await;

        assert!(ctx.cache.get(&ContentId::from("123")).is_some());
    }

    #[tokio::test]
    async fn test_unclassified_target_installs_nothing() {
        let (request, ctx) = request();
        request.open("https://example.com/unrelated");
        request.send();
        request.complete(detail_body("https://x/a"));
        drain().await;

        assert!(ctx.cache.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_swallowed() {
        let (request, ctx) = request();
        request.open(DETAIL_URL);
        request.send();
        request.complete("<!doctype html>");
        drain().await;

        assert!(ctx.cache.is_empty());
        assert!(!request.shared.handled.load(Ordering::SeqCst));
    }
}

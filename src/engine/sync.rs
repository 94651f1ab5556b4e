use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::configs::EngineConfig;
use crate::engine::EngineContext;
use crate::identity::{IdentityResolver, PageView};
use crate::surface::CopyController;

/// Reconciles "what the user is looking at" against the resolution cache.
///
/// The host page emits no reliable event for in-page navigation, so this
/// runs a fixed-interval poll; interception writes additionally wake it so a
/// resolution shows up without waiting out a tick.
pub struct Synchronizer {
    ctx: Arc<EngineContext>,
    view: Arc<dyn PageView>,
    resolver: IdentityResolver,
    controller: Arc<CopyController>,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
}

impl Synchronizer {
    pub fn new(
        ctx: Arc<EngineContext>,
        view: Arc<dyn PageView>,
        controller: Arc<CopyController>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            ctx,
            view,
            resolver: IdentityResolver::new(),
            controller,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = self.ctx.wait_resolved() => {}
            }

            if self.stop.load(Ordering::SeqCst) {
                break;
            }
            self.reconcile();
        }
    }

    /// One pass of the three-way check. Returns whether the surface was
    /// refreshed.
    ///
    /// (a) current ID changed: reload the URL from cache;
    /// (b) ID unchanged but the full address changed: recheck anyway;
    /// (c) ID known but URL still absent: opportunistic cache re-check in
    ///     case interception resolved it since the last pass.
    pub fn reconcile(&self) -> bool {
        let href = self.view.current_href();
        let next_id = self.resolver.resolve(self.view.as_ref());

        let mut refreshed = false;
        {
            let mut current = self.ctx.current.lock();

            if next_id != current.id {
                debug!(
                    "current item changed: {:?} -> {:?}",
                    current.id, next_id
                );
                let url = next_id.as_ref().and_then(|id| self.ctx.cache.get(id));
                current.id = next_id;
                current.url = url;
                refreshed = true;
            } else if href != current.href {
                let url = current.id.as_ref().and_then(|id| self.ctx.cache.get(id));
                current.url = url;
                refreshed = true;
            } else if current.id.is_some() && current.url.is_none() {
                let cached = current.id.as_ref().and_then(|id| self.ctx.cache.get(id));
                if let Some(url) = cached {
                    current.url = Some(url);
                    refreshed = true;
                }
            }

            current.href = href;
        }

        if refreshed {
            self.controller.sync_surface();
        }
        refreshed
    }
}

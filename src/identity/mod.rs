//! Derives the currently-viewed content ID from page state.

use parking_lot::Mutex;
use regex::Regex;

use crate::common::types::ContentId;

/// Read-only snapshot of the host page the resolver works against.
///
/// The real page is an external collaborator; the engine only ever needs the
/// address bar and the active-item marker attribute.
pub trait PageView: Send + Sync {
    /// Full current address, query string included.
    fn current_href(&self) -> String;

    /// Value of the active feed item's marker attribute, if one is rendered.
    fn active_item_marker(&self) -> Option<String>;
}

/// In-memory `PageView` used by the synchronizer tests and the replay
/// harness to script navigation.
#[derive(Default)]
pub struct StaticPageView {
    href: Mutex<String>,
    marker: Mutex<Option<String>>,
}

impl StaticPageView {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Mutex::new(href.into()),
            marker: Mutex::new(None),
        }
    }

    pub fn navigate(&self, href: impl Into<String>) {
        *self.href.lock() = href.into();
    }

    pub fn set_active_item_marker(&self, marker: Option<String>) {
        *self.marker.lock() = marker;
    }
}

impl PageView for StaticPageView {
    fn current_href(&self) -> String {
        self.href.lock().clone()
    }

    fn active_item_marker(&self) -> Option<String> {
        self.marker.lock().clone()
    }
}

/// Resolves the current content ID. Pure with respect to the view and cheap
/// enough to run on every poll tick.
pub struct IdentityResolver {
    digits: Regex,
    video_path: Regex,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self {
            digits: Regex::new(r"^\d+$").unwrap(),
            video_path: Regex::new(r"/video/(\d+)").unwrap(),
        }
    }

    /// Strict priority order, first match wins:
    /// 1. digits-only `modal_id` query parameter;
    /// 2. numeric `/video/{id}` path segment;
    /// 3. digits-only active-item marker from the page.
    ///
    /// Absence is a valid terminal outcome: no identifiable content.
    pub fn resolve(&self, view: &dyn PageView) -> Option<ContentId> {
        if let Ok(url) = url::Url::parse(&view.current_href()) {
            if let Some((_, modal_id)) = url.query_pairs().find(|(k, _)| k == "modal_id") {
                if self.digits.is_match(&modal_id) {
                    return Some(ContentId::from(modal_id.into_owned()));
                }
            }

            if let Some(caps) = self.video_path.captures(url.path()) {
                return Some(ContentId::from(&caps[1]));
            }
        }

        let marker = view.active_item_marker()?;
        self.digits
            .is_match(&marker)
            .then(|| ContentId::from(marker))
    }
}

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::configs::SurfaceConfig;
use crate::engine::EngineContext;
use crate::surface::clipboard::Clipboard;

pub const LABEL_IDLE: &str = "Copy link for VRChat";
pub const LABEL_COPY_SUCCESS: &str = "Copied";
pub const LABEL_COPY_FAILED: &str = "Copy failed";
pub const LABEL_NO_VIDEO_ID: &str = "No video identified";
pub const LABEL_PLAY_NOT_READY: &str = "Play link not ready yet";

pub const MENU_PLAY_READY: &str = "Copy direct media URL";
pub const MENU_PLAY_NO_VIDEO: &str = "Copy direct media URL (no video identified)";
pub const MENU_PLAY_WAITING: &str = "Copy direct media URL (waiting for capture)";
pub const MENU_DIRECT_READY: &str = "Copy resolver link (recommended)";
pub const MENU_DIRECT_NO_VIDEO: &str = "Copy resolver link (no video identified)";

/// Which derived link a menu entry copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// The resolved direct media URL captured from traffic.
    Play,
    /// The canonical resolver link built from the content ID.
    Direct,
}

/// Visual state of the floating control. Presentation maps these to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Idle,
    Success,
    Failure,
    Muted,
}

#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub label: String,
    pub mode: CopyMode,
    pub enabled: bool,
}

/// What the engine needs from the rendered widget. Rendering itself is the
/// host's problem; the engine only pushes state and receives clicks.
pub trait ActionSurface: Send + Sync {
    fn set_label(&self, text: &str);
    fn set_emphasis(&self, emphasis: Emphasis);
    fn show_menu(&self, entries: &[MenuEntry]);
    fn hide_menu(&self);
}

/// Drives the action surface from engine state and handles copy clicks.
pub struct CopyController {
    ctx: Arc<EngineContext>,
    surface: Arc<dyn ActionSurface>,
    clipboard: Arc<dyn Clipboard>,
    flash_duration: Duration,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl CopyController {
    pub fn new(
        ctx: Arc<EngineContext>,
        surface: Arc<dyn ActionSurface>,
        clipboard: Arc<dyn Clipboard>,
        config: &SurfaceConfig,
    ) -> Self {
        Self {
            ctx,
            surface,
            clipboard,
            flash_duration: Duration::from_millis(config.flash_duration_ms),
            reset_task: Mutex::new(None),
        }
    }

    /// Menu state derived from (id present?, url resolved?).
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        let view = self.ctx.current_view();

        let play_label = if view.id.is_none() {
            MENU_PLAY_NO_VIDEO
        } else if view.url.is_some() {
            MENU_PLAY_READY
        } else {
            MENU_PLAY_WAITING
        };

        vec![
            MenuEntry {
                label: play_label.to_string(),
                mode: CopyMode::Play,
                enabled: view.id.is_some() && view.url.is_some(),
            },
            MenuEntry {
                label: if view.id.is_some() {
                    MENU_DIRECT_READY.to_string()
                } else {
                    MENU_DIRECT_NO_VIDEO.to_string()
                },
                mode: CopyMode::Direct,
                enabled: view.id.is_some(),
            },
        ]
    }

    /// Re-renders the menu; restores the idle label unless a flash is still
    /// pending its reset.
    pub fn sync_surface(&self) {
        self.surface.show_menu(&self.menu_entries());
        if self.reset_task.lock().is_none() {
            self.surface.set_emphasis(Emphasis::Idle);
            self.surface.set_label(LABEL_IDLE);
        }
    }

    /// Handles one click on a menu entry. Never touches the clipboard when
    /// the preconditions for the mode are not met.
    pub fn copy(self: &Arc<Self>, mode: CopyMode) {
        self.surface.hide_menu();
        let view = self.ctx.current_view();

        let target = match mode {
            CopyMode::Play => {
                let Some(id) = view.id.as_ref() else {
                    self.flash(LABEL_NO_VIDEO_ID, Emphasis::Muted);
                    return;
                };
                match view.url {
                    Some(url) => url,
                    None => {
                        debug!("[{}] play url not resolved yet", id);
                        self.flash(LABEL_PLAY_NOT_READY, Emphasis::Muted);
                        return;
                    }
                }
            }
            CopyMode::Direct => {
                let Some(id) = view.id else {
                    self.flash(LABEL_NO_VIDEO_ID, Emphasis::Muted);
                    return;
                };
                format!("{}{}", self.ctx.platform.direct_link_prefix, id)
            }
        };

        if self.clipboard.copy(&target) {
            info!("copied {:?} link to clipboard", mode);
            self.flash(LABEL_COPY_SUCCESS, Emphasis::Success);
        } else {
            self.flash(LABEL_COPY_FAILED, Emphasis::Failure);
        }
    }

    /// Shows a transient status, auto-reverting to idle. Only one pending
    /// reset exists at a time; a retrigger cancels and replaces it.
    pub fn flash(self: &Arc<Self>, text: &str, emphasis: Emphasis) {
        let mut pending = self.reset_task.lock();
        if let Some(task) = pending.take() {
            task.abort();
        }

        self.surface.set_emphasis(emphasis);
        self.surface.set_label(text);

        let controller = Arc::clone(self);
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(controller.flash_duration).await;
            controller.surface.set_emphasis(Emphasis::Idle);
            controller.surface.set_label(LABEL_IDLE);
            *controller.reset_task.lock() = None;
        }));
    }
}

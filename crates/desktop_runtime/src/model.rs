//! Window, registry, settings, and session state types for the desktop runtime.

use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicU64, Ordering},
};

use desktop_app_contract::{ApplicationId, WindowRuntimeId, WindowSettingsOverride};
use platform_host::FileTree;
use serde::{Deserialize, Serialize};

/// Width used when neither the request nor the catalog supplies one.
pub const DEFAULT_WINDOW_WIDTH: i32 = 640;
/// Height used when neither the request nor the catalog supplies one.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 420;

static NEXT_WINDOW_KEY: AtomicU64 = AtomicU64::new(1);

/// Returns a window key that has never been handed out before in this process.
pub fn next_window_key() -> String {
    format!("window-{}", NEXT_WINDOW_KEY.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identity of a window for its whole lifetime. Never reused within a session.
pub struct WindowId(pub u64);

impl From<WindowId> for WindowRuntimeId {
    fn from(id: WindowId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Absolute window geometry in desktop pixels.
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    /// Caps the size at optional maxima; `None` means unbounded.
    pub fn clamped_max(self, max_w: Option<i32>, max_h: Option<i32>) -> Self {
        Self {
            w: max_w.map_or(self.w, |max| self.w.min(max)),
            h: max_h.map_or(self.h, |max| self.h.min(max)),
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Browser viewport and the strip reserved for the taskbar.
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub taskbar_height: i32,
}

impl Viewport {
    /// Height of the area windows tile into.
    pub fn desktop_height(self) -> i32 {
        (self.height - self.taskbar_height).max(0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            taskbar_height: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One managed window.
pub struct WindowRecord {
    pub id: WindowId,
    /// View correlation handle, unique across the process lifetime.
    pub key: String,
    pub app_id: ApplicationId,
    pub title: String,
    pub icon_id: String,
    pub rect: WindowRect,
    /// `None` means unbounded.
    pub max_width: Option<i32>,
    /// `None` means unbounded.
    pub max_height: Option<i32>,
    pub resizeable: bool,
    pub scrollable: bool,
    /// Normalized path of the file this window shows, kept in step with renames and moves.
    pub opened_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Everything needed to build a [`WindowRecord`].
pub struct OpenWindowRequest {
    pub app_id: ApplicationId,
    pub title: String,
    pub icon_id: String,
    /// Settings that win over the built-in defaults.
    pub settings: WindowSettingsOverride,
    pub opened_path: Option<String>,
}

impl OpenWindowRequest {
    pub fn new(app_id: ApplicationId, title: impl Into<String>) -> Self {
        Self {
            icon_id: app_id.as_str().to_string(),
            app_id,
            title: title.into(),
            settings: WindowSettingsOverride::default(),
            opened_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Window lifecycle, stacking, and focus state.
///
/// `windows` is creation order; `window_order` is z-order from back to front, so the last entry
/// is topmost.
pub struct WindowRegistry {
    pub windows: Vec<WindowRecord>,
    pub window_order: Vec<WindowId>,
    pub active_window: Option<WindowId>,
    pub minimized_windows: BTreeSet<WindowId>,
    pub is_dragging: bool,
    pub(crate) next_window_id: u64,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            window_order: Vec::new(),
            active_window: None,
            minimized_windows: BTreeSet::new(),
            is_dragging: false,
            next_window_id: 1,
        }
    }
}

impl WindowRegistry {
    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub(crate) fn window_mut(&mut self, window_id: WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == window_id)
    }

    pub fn index_of(&self, window_id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == window_id)
    }

    pub fn is_minimized(&self, window_id: WindowId) -> bool {
        self.minimized_windows.contains(&window_id)
    }

    /// Topmost window in z-order, minimized or not.
    pub fn top_window(&self) -> Option<WindowId> {
        self.window_order.last().copied()
    }

    /// Checks the stacking and focus invariants.
    ///
    /// `window_order` must be a duplicate-free permutation of the ids in `windows`, minimized ids
    /// must exist, and the active window must exist and not be minimized.
    pub fn is_consistent(&self) -> bool {
        let ids: BTreeSet<WindowId> = self.windows.iter().map(|w| w.id).collect();
        let ordered: BTreeSet<WindowId> = self.window_order.iter().copied().collect();
        ids.len() == self.windows.len()
            && ordered.len() == self.window_order.len()
            && ids == ordered
            && self.minimized_windows.is_subset(&ids)
            && self
                .active_window
                .map_or(true, |id| ids.contains(&id) && !self.is_minimized(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// User-facing UI settings, persisted as their own record.
pub struct DesktopSettings {
    pub theme: String,
    pub panel_background: String,
    pub bg: String,
    pub accent_color: String,
    pub radius: u8,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            panel_background: "rgba(17, 24, 39, 0.85)".to_string(),
            bg: "/wallpapers/aurora.jpg".to_string(),
            accent_color: "#3b82f6".to_string(),
            radius: 8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Partial settings update; present fields replace the current values.
pub struct DesktopSettingsPatch {
    pub theme: Option<String>,
    pub panel_background: Option<String>,
    pub bg: Option<String>,
    pub accent_color: Option<String>,
    pub radius: Option<u8>,
}

impl DesktopSettings {
    pub fn apply(&mut self, patch: DesktopSettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(panel_background) = patch.panel_background {
            self.panel_background = panel_background;
        }
        if let Some(bg) = patch.bg {
            self.bg = bg;
        }
        if let Some(accent_color) = patch.accent_color {
            self.accent_color = accent_color;
        }
        if let Some(radius) = patch.radius {
            self.radius = radius;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Whole desktop session: windows, filesystem, settings, and geometry.
pub struct DesktopState {
    pub registry: WindowRegistry,
    pub fs: FileTree,
    pub settings: DesktopSettings,
    pub viewport: Viewport,
    /// Set once persisted records have been loaded.
    pub hydrated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Direction for alt+tab style focus cycling over creation order.
pub enum FocusDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Transient pointer interaction state, kept apart from the session state.
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}

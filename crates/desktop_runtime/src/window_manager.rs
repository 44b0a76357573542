//! Window registry transitions: lifecycle, stacking, focus, and geometry.
//!
//! Every function leaves [`WindowRegistry::is_consistent`] true. Functions that target a window
//! by id return `false` (and change nothing) when the id is unknown.

use crate::model::{
    FocusDirection, OpenWindowRequest, ResizeEdge, Viewport, WindowId, WindowRecord, WindowRect,
    WindowRegistry, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;

/// Builds a window record with a fresh id and process-unique key.
///
/// Without an explicit `x`/`y` the window is centered on the viewport using its initial size, or
/// its maximum size when no initial size was requested.
pub fn create_window(
    registry: &mut WindowRegistry,
    viewport: Viewport,
    request: OpenWindowRequest,
) -> WindowRecord {
    let id = WindowId(registry.next_window_id);
    registry.next_window_id = registry.next_window_id.saturating_add(1);

    let settings = request.settings;
    let centering_w = settings
        .initial_width
        .or(settings.max_width)
        .unwrap_or(DEFAULT_WINDOW_WIDTH);
    let centering_h = settings
        .initial_height
        .or(settings.max_height)
        .unwrap_or(DEFAULT_WINDOW_HEIGHT);
    let rect = WindowRect {
        x: settings
            .x
            .unwrap_or_else(|| (viewport.width / 2 - centering_w / 2).max(0)),
        y: settings
            .y
            .unwrap_or_else(|| (viewport.height / 2 - centering_h / 2).max(0)),
        w: settings.initial_width.unwrap_or(centering_w),
        h: settings.initial_height.unwrap_or(centering_h),
    }
    .clamped_max(settings.max_width, settings.max_height);

    WindowRecord {
        id,
        key: crate::model::next_window_key(),
        app_id: request.app_id,
        title: settings.title.unwrap_or(request.title),
        icon_id: request.icon_id,
        rect,
        max_width: settings.max_width,
        max_height: settings.max_height,
        resizeable: settings.resizeable.unwrap_or(true),
        scrollable: settings.scrollable.unwrap_or(true),
        opened_path: request.opened_path,
    }
}

/// Adds `window`, or replaces the record sharing its id in place, and brings it to front.
pub fn add_window(registry: &mut WindowRegistry, window: WindowRecord) -> WindowId {
    let id = window.id;
    match registry.window_mut(id) {
        Some(existing) => *existing = window,
        None => {
            registry.next_window_id = registry.next_window_id.max(id.0.saturating_add(1));
            registry.windows.push(window);
        }
    }
    raise(registry, id);
    id
}

/// Removes a window from the registry.
///
/// Clears the active window when it was the removed one but does not pick a replacement; see
/// [`focus_next_available`].
pub fn remove_window(registry: &mut WindowRegistry, window_id: WindowId) -> bool {
    let Some(index) = registry.index_of(window_id) else {
        return false;
    };
    registry.windows.remove(index);
    registry.window_order.retain(|id| *id != window_id);
    registry.minimized_windows.remove(&window_id);
    if registry.active_window == Some(window_id) {
        registry.active_window = None;
    }
    true
}

/// Moves a window to the top of the stack, activates it, and un-minimizes it.
pub fn bring_to_front(registry: &mut WindowRegistry, window_id: WindowId) -> bool {
    if registry.index_of(window_id).is_none() {
        return false;
    }
    raise(registry, window_id);
    true
}

/// Restores a minimized window. Same transition as [`bring_to_front`].
pub fn restore_window(registry: &mut WindowRegistry, window_id: WindowId) -> bool {
    bring_to_front(registry, window_id)
}

/// Minimizes a window, clearing the active window when it was this one.
pub fn minimize_window(registry: &mut WindowRegistry, window_id: WindowId) -> bool {
    if registry.index_of(window_id).is_none() {
        return false;
    }
    registry.minimized_windows.insert(window_id);
    if registry.active_window == Some(window_id) {
        registry.active_window = None;
    }
    true
}

pub fn minimize_all(registry: &mut WindowRegistry) {
    registry.minimized_windows = registry.windows.iter().map(|w| w.id).collect();
    registry.active_window = None;
}

/// Taskbar button behavior: restore when minimized, minimize when active, otherwise raise.
pub fn toggle_taskbar(registry: &mut WindowRegistry, window_id: WindowId) -> bool {
    if registry.index_of(window_id).is_none() {
        return false;
    }
    if registry.is_minimized(window_id) {
        restore_window(registry, window_id)
    } else if registry.active_window == Some(window_id) {
        minimize_window(registry, window_id)
    } else {
        bring_to_front(registry, window_id)
    }
}

/// Activates the next non-minimized window in creation order, scanning from `start` and wrapping.
///
/// Returns the activated window, or `None` (with no active window) when every window is
/// minimized.
pub fn focus_next_available(registry: &mut WindowRegistry, start: usize) -> Option<WindowId> {
    let len = registry.windows.len();
    let next = (0..len)
        .map(|step| registry.windows[(start + step) % len].id)
        .find(|id| !registry.is_minimized(*id));
    match next {
        Some(id) => {
            raise(registry, id);
            Some(id)
        }
        None => {
            registry.active_window = None;
            None
        }
    }
}

/// Alt+tab: steps the active window one place through creation order, wrapping at the ends.
///
/// Does nothing without an active window.
pub fn cycle_focus(registry: &mut WindowRegistry, direction: FocusDirection) -> Option<WindowId> {
    let active = registry.active_window?;
    let index = registry.index_of(active)?;
    let len = registry.windows.len();
    let next = match direction {
        FocusDirection::Forward => (index + 1) % len,
        FocusDirection::Backward => (index + len - 1) % len,
    };
    let id = registry.windows[next].id;
    raise(registry, id);
    Some(id)
}

pub fn set_position(registry: &mut WindowRegistry, window_id: WindowId, x: i32, y: i32) -> bool {
    let Some(window) = registry.window_mut(window_id) else {
        return false;
    };
    window.rect.x = x;
    window.rect.y = y;
    true
}

/// Sets a window's size, clamped to the minimum size and the window's own maxima.
pub fn set_size(registry: &mut WindowRegistry, window_id: WindowId, w: i32, h: i32) -> bool {
    let Some(window) = registry.window_mut(window_id) else {
        return false;
    };
    window.rect = fit_size(window, WindowRect { w, h, ..window.rect });
    true
}

pub fn set_title(registry: &mut WindowRegistry, window_id: WindowId, title: String) -> bool {
    let Some(window) = registry.window_mut(window_id) else {
        return false;
    };
    window.title = title;
    true
}

/// Replaces position and size in one step.
pub fn set_geometry(registry: &mut WindowRegistry, window_id: WindowId, rect: WindowRect) -> bool {
    let Some(window) = registry.window_mut(window_id) else {
        return false;
    };
    window.rect = rect;
    true
}

pub fn find_by_key<'a>(registry: &'a WindowRegistry, key: &str) -> Option<&'a WindowRecord> {
    registry.windows.iter().find(|w| w.key == key)
}

/// Clamps `rect` to the minimum window size and `window`'s maxima.
pub fn fit_size(window: &WindowRecord, rect: WindowRect) -> WindowRect {
    rect.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)
        .clamped_max(window.max_width, window.max_height)
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    let (left, top, right, bottom) = match edge {
        ResizeEdge::North => (0, dy, 0, 0),
        ResizeEdge::South => (0, 0, 0, dy),
        ResizeEdge::East => (0, 0, dx, 0),
        ResizeEdge::West => (dx, 0, 0, 0),
        ResizeEdge::NorthEast => (0, dy, dx, 0),
        ResizeEdge::NorthWest => (dx, dy, 0, 0),
        ResizeEdge::SouthEast => (0, 0, dx, dy),
        ResizeEdge::SouthWest => (dx, 0, 0, dy),
    };
    WindowRect {
        x: start.x + left,
        y: start.y + top,
        w: start.w - left + right,
        h: start.h - top + bottom,
    }
}

fn raise(registry: &mut WindowRegistry, window_id: WindowId) {
    registry.window_order.retain(|id| *id != window_id);
    registry.window_order.push(window_id);
    registry.minimized_windows.remove(&window_id);
    registry.active_window = Some(window_id);
}

//! Drop-zone tiling: half and quarter layouts plus edge hit-testing for window drags.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    model::{PointerPosition, Viewport, WindowRect, WindowRegistry},
    window_manager,
};

/// Pointer distance (in px) from a desktop edge that activates a drop zone.
pub const SNAP_EDGE_THRESHOLD: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Named region of the desktop a window can be dropped onto.
pub enum DropZone {
    Left,
    Right,
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown drop zone `{0}`")]
pub struct UnknownDropZone(pub String);

impl DropZone {
    pub const ALL: [DropZone; 6] = [
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::BottomLeft,
        Self::TopRight,
        Self::BottomRight,
    ];

    /// Stable identifier used by the view layer.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "topleft",
            Self::BottomLeft => "bottomleft",
            Self::TopRight => "topright",
            Self::BottomRight => "bottomright",
        }
    }
}

impl fmt::Display for DropZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DropZone {
    type Err = UnknownDropZone;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.id() == raw)
            .ok_or_else(|| UnknownDropZone(raw.to_string()))
    }
}

/// Computes the tiled geometry for `zone`.
///
/// Halves span the full desktop height; quarters take half the width and half the height.
pub fn tile_rect(zone: DropZone, viewport_width: i32, desktop_height: i32) -> WindowRect {
    let half_w = viewport_width / 2;
    let half_h = desktop_height / 2;
    match zone {
        DropZone::Left => WindowRect {
            x: 0,
            y: 0,
            w: half_w,
            h: desktop_height,
        },
        DropZone::Right => WindowRect {
            x: half_w,
            y: 0,
            w: half_w,
            h: desktop_height,
        },
        DropZone::TopLeft => WindowRect {
            x: 0,
            y: 0,
            w: half_w,
            h: half_h,
        },
        DropZone::BottomLeft => WindowRect {
            x: 0,
            y: half_h,
            w: half_w,
            h: half_h,
        },
        DropZone::TopRight => WindowRect {
            x: half_w,
            y: 0,
            w: half_w,
            h: half_h,
        },
        DropZone::BottomRight => WindowRect {
            x: half_w,
            y: half_h,
            w: half_w,
            h: half_h,
        },
    }
}

/// Hit-tests the pointer against the desktop edges.
///
/// Corners map to quarters, the rest of the left and right edge bands map to halves, and
/// everything else is no zone.
pub fn drop_zone_at(pointer: PointerPosition, viewport: Viewport) -> Option<DropZone> {
    let near_top = pointer.y <= SNAP_EDGE_THRESHOLD;
    let near_bottom = pointer.y >= viewport.desktop_height() - SNAP_EDGE_THRESHOLD;

    if pointer.x <= SNAP_EDGE_THRESHOLD {
        Some(if near_top {
            DropZone::TopLeft
        } else if near_bottom {
            DropZone::BottomLeft
        } else {
            DropZone::Left
        })
    } else if pointer.x >= viewport.width - SNAP_EDGE_THRESHOLD {
        Some(if near_top {
            DropZone::TopRight
        } else if near_bottom {
            DropZone::BottomRight
        } else {
            DropZone::Right
        })
    } else {
        None
    }
}

/// Applies `zone`'s geometry to the window identified by its view `key`.
pub fn tile_window_by_key(
    registry: &mut WindowRegistry,
    key: &str,
    zone: DropZone,
    viewport: Viewport,
) -> bool {
    let Some(window_id) = window_manager::find_by_key(registry, key).map(|w| w.id) else {
        return false;
    };
    window_manager::set_geometry(
        registry,
        window_id,
        tile_rect(zone, viewport.width, viewport.desktop_height()),
    )
}

//! Window placement math
//!
//! The window is anchored at the pointer's last known coordinate plus a
//! fixed offset (right/below). Placements that would overflow the
//! viewport flip to the opposite side of the pointer; a final clamp
//! keeps the window from rendering above or left of the viewport
//! origin. Coordinates follow the DOM: pointer and rect values are
//! client (viewport-relative), placement is in document coordinates.

use serde::{Deserialize, Serialize};

/// Gap between the pointer and the window edge, px.
pub const POINTER_OFFSET: f64 = 10.0;
/// Clamp margin at the viewport origin, px.
pub const EDGE_MARGIN: f64 = 5.0;

// ==================== TYPE DEFINITIONS ====================

/// Last known pointer coordinate, client coords.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// Viewport dimensions and scroll offsets.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// Measured size of the mounted window.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

/// Final document-coordinate position for the window.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub top: f64,
    pub left: f64,
}

/// Bounding box of the mounted window, client coords.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Containment check for the pointer-move polling path. Edges count
    /// as inside, matching `getBoundingClientRect` comparisons.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

// ==================== MAIN IMPLEMENTATION ====================

/// Place the measured window relative to the pointer.
pub fn place_window(pointer: PointerPosition, size: WindowSize, viewport: &Viewport) -> Placement {
    let mut top = pointer.y + viewport.scroll_y + POINTER_OFFSET;
    let mut left = pointer.x + viewport.scroll_x + POINTER_OFFSET;

    // Past the bottom edge: flip above the pointer
    if top + size.height > viewport.height + viewport.scroll_y {
        top = pointer.y + viewport.scroll_y - size.height - POINTER_OFFSET;
    }

    // Past the right edge: flip left of the pointer
    if left + size.width > viewport.width + viewport.scroll_x {
        left = pointer.x + viewport.scroll_x - size.width - POINTER_OFFSET;
    }

    // Never above or left of the viewport origin
    if top < viewport.scroll_y {
        top = viewport.scroll_y + EDGE_MARGIN;
    }
    if left < viewport.scroll_x {
        left = viewport.scroll_x + EDGE_MARGIN;
    }

    Placement { top, left }
}

//! Discrete events driving the hover state machine
//!
//! The JS host owns the DOM listeners and translates raw pointer/timer
//! activity into these events. Link identity is a host-assigned opaque
//! id (element identity), so "same link re-entered" is a plain integer
//! comparison here.

use serde::{Deserialize, Serialize};

use crate::hover::position::Rect;
use crate::matcher::pattern::StorageSnapshot;

/// Host-assigned identity of an anchor element.
pub type LinkId = u32;

/// One event pushed into [`crate::hover::machine::HoverMachine`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HoverEvent {
    /// Pointer entered an anchor element. `x`/`y` are client coords.
    PointerEnterLink {
        link: LinkId,
        url: String,
        x: f64,
        y: f64,
    },
    /// Pointer left an anchor element.
    PointerLeaveLink { link: LinkId },
    /// Pointer entered the floating window directly.
    PointerEnterWindow,
    /// Pointer left the floating window.
    PointerLeaveWindow,
    /// High-frequency pointer tracking; must stay constant-time.
    PointerMoved { x: f64, y: f64 },
    /// Host mounted (or re-measured) the window.
    WindowMounted { rect: Rect },
    /// A previously scheduled hide timer fired.
    HideTimerFired { token: u32 },
    /// Copy control activated for one match value.
    CopyRequested { value: String },
    /// Async clipboard write completed.
    ClipboardResult { ok: bool },
    /// Pattern/enabled configuration changed in storage.
    PatternsUpdated { snapshot: StorageSnapshot },
}

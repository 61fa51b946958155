//! HoverEngine - JS-facing facade over the hover state machine
//!
//! # Usage (JavaScript)
//! ```javascript,ignore
//! import init, { HoverEngine, writeClipboard } from 'hovercore';
//!
//! await init();
//! const engine = new HoverEngine();
//! engine.hydrateFromStorage(await chrome.storage.sync.get(null));
//!
//! const commands = engine.pointerEnterLink(5, link.href, e.clientX, e.clientY);
//! for (const cmd of commands) { /* showWindow, scheduleHide, ... */ }
//! ```
//!
//! Every pointer/timer method returns the machine's command list as a
//! JS array. Methods never throw from event handling; bad input is
//! reported to the console and yields an empty list, because an
//! uncaught error in a page-wide listener would kill hovering for the
//! rest of the page session.

use wasm_bindgen::prelude::*;

use crate::hover::commands::Command;
use crate::hover::events::HoverEvent;
use crate::hover::machine::{HoverMachine, HoverState};
use crate::hover::position::{place_window, Viewport, WindowSize};
use crate::matcher::pattern::StorageSnapshot;

/// Content-script engine: one instance per page load.
#[wasm_bindgen]
pub struct HoverEngine {
    machine: HoverMachine,
}

#[wasm_bindgen]
impl HoverEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            machine: HoverMachine::new(),
        }
    }

    /// Load (or reload) configuration from a `chrome.storage.sync`
    /// snapshot. A snapshot that fails to parse falls back to the
    /// default configuration: no active patterns, feature enabled.
    #[wasm_bindgen(js_name = hydrateFromStorage)]
    pub fn hydrate_from_storage(&mut self, snapshot: JsValue) {
        let snapshot: StorageSnapshot = match serde_wasm_bindgen::from_value(snapshot) {
            Ok(s) => s,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("Failed to load patterns: {}", e).into(),
                );
                StorageSnapshot::default()
            }
        };
        self.machine.handle(HoverEvent::PatternsUpdated { snapshot });
    }

    /// Storage change notification; same semantics as
    /// [`Self::hydrate_from_storage`]. An open window and its pending
    /// timer are untouched.
    #[wasm_bindgen(js_name = patternsUpdated)]
    pub fn patterns_updated(&mut self, snapshot: JsValue) {
        self.hydrate_from_storage(snapshot);
    }

    #[wasm_bindgen(js_name = pointerEnterLink)]
    pub fn pointer_enter_link(&mut self, link: u32, url: &str, x: f64, y: f64) -> JsValue {
        let commands = self.machine.handle(HoverEvent::PointerEnterLink {
            link,
            url: url.to_string(),
            x,
            y,
        });
        commands_to_js(commands)
    }

    #[wasm_bindgen(js_name = pointerLeaveLink)]
    pub fn pointer_leave_link(&mut self, link: u32) -> JsValue {
        commands_to_js(self.machine.handle(HoverEvent::PointerLeaveLink { link }))
    }

    #[wasm_bindgen(js_name = pointerEnterWindow)]
    pub fn pointer_enter_window(&mut self) -> JsValue {
        commands_to_js(self.machine.handle(HoverEvent::PointerEnterWindow))
    }

    #[wasm_bindgen(js_name = pointerLeaveWindow)]
    pub fn pointer_leave_window(&mut self) -> JsValue {
        commands_to_js(self.machine.handle(HoverEvent::PointerLeaveWindow))
    }

    #[wasm_bindgen(js_name = pointerMoved)]
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> JsValue {
        commands_to_js(self.machine.handle(HoverEvent::PointerMoved { x, y }))
    }

    /// Report the mounted window's bounding box (client coords:
    /// left, top, right, bottom).
    #[wasm_bindgen(js_name = windowMounted)]
    pub fn window_mounted(&mut self, rect: JsValue) -> JsValue {
        let rect = match serde_wasm_bindgen::from_value(rect) {
            Ok(r) => r,
            Err(e) => {
                web_sys::console::error_1(&format!("Bad window rect: {}", e).into());
                return commands_to_js(Vec::new());
            }
        };
        commands_to_js(self.machine.handle(HoverEvent::WindowMounted { rect }))
    }

    #[wasm_bindgen(js_name = hideTimerFired)]
    pub fn hide_timer_fired(&mut self, token: u32) -> JsValue {
        commands_to_js(self.machine.handle(HoverEvent::HideTimerFired { token }))
    }

    #[wasm_bindgen(js_name = copyRequested)]
    pub fn copy_requested(&mut self, value: &str) -> JsValue {
        commands_to_js(self.machine.handle(HoverEvent::CopyRequested {
            value: value.to_string(),
        }))
    }

    #[wasm_bindgen(js_name = clipboardResult)]
    pub fn clipboard_result(&mut self, ok: bool) -> JsValue {
        if !ok {
            web_sys::console::error_1(&"Failed to copy to clipboard".into());
        }
        commands_to_js(self.machine.handle(HoverEvent::ClipboardResult { ok }))
    }

    /// Placement for the measured window at the last pointer position.
    /// `viewport` is `{ width, height, scrollX, scrollY }`; returns
    /// `{ top, left }` in document coordinates.
    #[wasm_bindgen(js_name = computePlacement)]
    pub fn compute_placement(
        &self,
        width: f64,
        height: f64,
        viewport: JsValue,
    ) -> Result<JsValue, JsValue> {
        let viewport: Viewport = serde_wasm_bindgen::from_value(viewport)
            .map_err(|e| JsValue::from_str(&format!("Bad viewport: {}", e)))?;
        let placement = place_window(
            self.machine.last_pointer(),
            WindowSize { width, height },
            &viewport,
        );
        serde_wasm_bindgen::to_value(&placement)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize placement: {}", e)))
    }

    /// Lifecycle state name for debugging: "idle" | "showing" | "pendingHide".
    #[wasm_bindgen(js_name = stateName)]
    pub fn state_name(&self) -> String {
        match self.machine.state() {
            HoverState::Idle => "idle",
            HoverState::Showing => "showing",
            HoverState::PendingHide => "pendingHide",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = isEnabled)]
    pub fn is_enabled(&self) -> bool {
        self.machine.pattern_set().is_enabled()
    }

    /// Number of patterns in the active working set.
    #[wasm_bindgen(js_name = activePatternCount)]
    pub fn active_pattern_count(&self) -> usize {
        self.machine.pattern_set().active_count()
    }
}

impl Default for HoverEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a command list for the host, echoing pattern compile
/// failures to the console on the way out.
fn commands_to_js(commands: Vec<Command>) -> JsValue {
    for command in &commands {
        if let Command::ReportPatternFailure { pattern_name, error } = command {
            web_sys::console::error_1(
                &format!("Invalid regex pattern \"{}\": {}", pattern_name, error).into(),
            );
        }
    }
    match serde_wasm_bindgen::to_value(&commands) {
        Ok(v) => v,
        Err(e) => {
            web_sys::console::error_1(
                &format!("[HoverEngine] Serialization failed: {:?}", e).into(),
            );
            JsValue::NULL
        }
    }
}

/// Async clipboard write, bridged to a JS `Promise` resolving to a
/// boolean the host feeds back as `clipboardResult`. Never rejects;
/// failures are logged and resolve `false`.
#[wasm_bindgen(js_name = writeClipboard)]
pub fn write_clipboard(text: String) -> js_sys::Promise {
    wasm_bindgen_futures::future_to_promise(async move {
        let Some(window) = web_sys::window() else {
            return Ok(JsValue::FALSE);
        };
        let clipboard = window.navigator().clipboard();
        match wasm_bindgen_futures::JsFuture::from(clipboard.write_text(&text)).await {
            Ok(_) => Ok(JsValue::TRUE),
            Err(e) => {
                web_sys::console::error_2(&"Failed to copy to clipboard:".into(), &e);
                Ok(JsValue::FALSE)
            }
        }
    })
}

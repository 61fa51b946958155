//! HoverCore: URL Pattern Extraction + Hover Window Engine
//!
//! A Rust/WASM implementation of the hover-copy extraction pipeline.
//! The JS content script owns the DOM; this crate owns the logic:
//! it evaluates user-defined regex patterns against a hovered link's
//! URL and drives the show/hide lifecycle of the floating result
//! window as an explicit state machine.
//!
//! # Architecture
//!
//! ## Matcher Components
//! - `extract.rs` - UrlExtractor: ordered, find-all regex extraction with
//!   capture-group precedence and zero-width-match guarding
//! - `pattern.rs` - RegexPattern / PatternSet: storage snapshot hydration,
//!   active-subset filtering, legacy active-id migration
//!
//! ## Hover Components
//! - `machine.rs` - HoverMachine: Idle/Showing/PendingHide state machine
//!   with token-based debounced hide (200ms)
//! - `events.rs` / `commands.rs` - the discrete event/command vocabulary
//!   exchanged with the JS host
//! - `position.rs` - pointer-anchored window placement with viewport
//!   flip and clamp
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { HoverEngine, writeClipboard } from 'hovercore';
//!
//! await init();
//!
//! const engine = new HoverEngine();
//! engine.hydrateFromStorage(await chrome.storage.sync.get(null));
//!
//! // Forward pointer events, interpret the returned commands.
//! document.addEventListener('mouseover', (e) => {
//!   const link = e.target.closest('a[href]');
//!   if (!link) return;
//!   const commands = engine.pointerEnterLink(idOf(link), link.href, e.clientX, e.clientY);
//!   run(commands);  // showWindow / scheduleHide / cancelHide / ...
//! });
//! ```

pub mod hover;
pub mod matcher;

// Public exports - Matcher
pub use matcher::*;

// Public exports - Hover lifecycle
pub use hover::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("hovercore v{}", env!("CARGO_PKG_VERSION"))
}

//! Commands emitted by the hover state machine
//!
//! The machine never touches the DOM; it answers every event with a
//! (usually empty) command list the host interprets in order.

use serde::{Deserialize, Serialize};

use crate::matcher::extract::ExtractedMatch;

/// Debounce window before a hide request takes effect, ms.
pub const HIDE_DELAY_MS: u32 = 200;
/// Lifetime of the transient "copied" notice, ms.
pub const COPY_NOTICE_MS: u32 = 2000;

/// One instruction for the JS host.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Mount the window with these matches at the last pointer position
    /// (final placement comes from `computePlacement` after measuring).
    ShowWindow { matches: Vec<ExtractedMatch> },
    /// Unmount the window.
    HideWindow,
    /// Start the debounce timer; report back with `hideTimerFired(token)`.
    ScheduleHide { token: u32, delay_ms: u32 },
    /// Clear the timer previously scheduled under this token.
    CancelHide { token: u32 },
    /// Perform the async clipboard write; report back with
    /// `clipboardResult(ok)`.
    CopyToClipboard { value: String },
    /// Show the transient copy confirmation.
    NotifyCopied { duration_ms: u32 },
    /// Error-reporting collaborator call for a failed compilation.
    ReportPatternFailure { pattern_name: String, error: String },
}

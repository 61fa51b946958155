//! HoverMachine - the hover lifecycle state machine
//!
//! One instance per page load. States:
//!
//! ```text
//! Idle ──enter link (matches)──> Showing ──leave link/window──> PendingHide
//!   ^                               ^                                │
//!   │                               └──re-enter window / pointer─────┤
//!   │                                  inside window rect            │
//!   └────────────────timer fires─────────────────────────────────────┘
//! ```
//!
//! All processing is serialized on the host event loop; the only
//! concurrency primitive is the single debounce timer, and at most one
//! is outstanding because scheduling always cancels the previous one.
//! Timer identity is a monotonically increasing token: a fired token
//! that is no longer current is stale and ignored, so a hide scheduled
//! twice yields exactly one hide.

use crate::hover::commands::{Command, COPY_NOTICE_MS, HIDE_DELAY_MS};
use crate::hover::events::{HoverEvent, LinkId};
use crate::hover::position::{PointerPosition, Rect};
use crate::matcher::extract::extract;
use crate::matcher::pattern::{PatternSet, StorageSnapshot};

// ==================== TYPE DEFINITIONS ====================

/// Observable lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    Showing,
    PendingHide,
}

/// Transient state held while a window is open. Created on show,
/// destroyed on hide; no external writer.
#[derive(Clone, Debug)]
struct HoverSession {
    /// The link currently associated with the open window.
    target: LinkId,
    /// Token of the outstanding scheduled hide, if any.
    pending_hide: Option<u32>,
    /// Last reported bounding box of the mounted window.
    window_rect: Option<Rect>,
}

// ==================== MAIN IMPLEMENTATION ====================

/// The hover lifecycle state machine.
///
/// Consumes [`HoverEvent`]s, produces [`Command`]s, and owns nothing
/// else: rendering, timers, and the clipboard stay with the host. No
/// event handler panics or errors; malformed input degrades to an
/// empty command list.
#[derive(Clone, Debug)]
pub struct HoverMachine {
    patterns: PatternSet,
    session: Option<HoverSession>,
    last_pointer: PointerPosition,
    next_token: u32,
}

impl Default for HoverMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl HoverMachine {
    /// Machine with no patterns configured (inert until hydrated).
    pub fn new() -> Self {
        Self {
            patterns: PatternSet::new(),
            session: None,
            last_pointer: PointerPosition::default(),
            next_token: 0,
        }
    }

    /// Machine with a pre-built working pattern set.
    pub fn with_patterns(patterns: PatternSet) -> Self {
        Self {
            patterns,
            ..Self::new()
        }
    }

    pub fn state(&self) -> HoverState {
        match &self.session {
            None => HoverState::Idle,
            Some(s) if s.pending_hide.is_some() => HoverState::PendingHide,
            Some(_) => HoverState::Showing,
        }
    }

    pub fn pattern_set(&self) -> &PatternSet {
        &self.patterns
    }

    /// Last pointer coordinate seen, used as the window anchor.
    pub fn last_pointer(&self) -> PointerPosition {
        self.last_pointer
    }

    /// Process one event, returning the commands for the host.
    pub fn handle(&mut self, event: HoverEvent) -> Vec<Command> {
        match event {
            HoverEvent::PointerEnterLink { link, url, x, y } => {
                self.on_pointer_enter_link(link, &url, x, y)
            }
            HoverEvent::PointerLeaveLink { link } => self.on_pointer_leave_link(link),
            HoverEvent::PointerEnterWindow => self.on_pointer_enter_window(),
            HoverEvent::PointerLeaveWindow => self.on_pointer_leave_window(),
            HoverEvent::PointerMoved { x, y } => self.on_pointer_moved(x, y),
            HoverEvent::WindowMounted { rect } => self.on_window_mounted(rect),
            HoverEvent::HideTimerFired { token } => self.on_hide_timer_fired(token),
            HoverEvent::CopyRequested { value } => self.on_copy_requested(value),
            HoverEvent::ClipboardResult { ok } => self.on_clipboard_result(ok),
            HoverEvent::PatternsUpdated { snapshot } => self.on_patterns_updated(snapshot),
        }
    }

    // ==================== EVENT HANDLERS ====================

    fn on_pointer_enter_link(&mut self, link: LinkId, url: &str, x: f64, y: f64) -> Vec<Command> {
        // Global gating: consulted on every enter. Pending hides already
        // scheduled still run to completion.
        if !self.patterns.is_enabled() {
            return Vec::new();
        }

        // Re-entering the current target is a complete no-op, even while
        // a hide is pending (avoids re-render thrash).
        if self.session.as_ref().map(|s| s.target) == Some(link) {
            return Vec::new();
        }

        self.last_pointer = PointerPosition { x, y };

        let mut commands = Vec::new();
        let extraction = extract(url, &self.patterns.active_patterns());
        for failure in extraction.failures {
            commands.push(Command::ReportPatternFailure {
                pattern_name: failure.pattern_name,
                error: failure.error,
            });
        }

        if extraction.matches.is_empty() {
            // Links with zero matches never produce a window. If one is
            // already open for the previous target, this counts as
            // leaving it: the window dies by its own delayed timer, so
            // rapid pointer transit never flashes an empty window.
            self.schedule_hide(&mut commands);
            return commands;
        }

        // Replace any open window outright; the debounce only protects
        // excursions, not target switches with fresh matches.
        if let Some(old) = self.session.take() {
            if let Some(token) = old.pending_hide {
                commands.push(Command::CancelHide { token });
            }
            commands.push(Command::HideWindow);
        }
        commands.push(Command::ShowWindow {
            matches: extraction.matches,
        });
        self.session = Some(HoverSession {
            target: link,
            pending_hide: None,
            window_rect: None,
        });
        commands
    }

    fn on_pointer_leave_link(&mut self, link: LinkId) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.session.as_ref().map(|s| s.target) == Some(link) {
            self.schedule_hide(&mut commands);
        }
        commands
    }

    fn on_pointer_enter_window(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        self.cancel_pending_hide(&mut commands);
        commands
    }

    fn on_pointer_leave_window(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        self.schedule_hide(&mut commands);
        commands
    }

    fn on_pointer_moved(&mut self, x: f64, y: f64) -> Vec<Command> {
        self.last_pointer = PointerPosition { x, y };

        // Hot path: a bounding-box check, never a timer.
        let over_window = self
            .session
            .as_ref()
            .and_then(|s| s.window_rect)
            .is_some_and(|rect| rect.contains(x, y));

        let mut commands = Vec::new();
        if over_window {
            self.cancel_pending_hide(&mut commands);
        }
        commands
    }

    fn on_window_mounted(&mut self, rect: Rect) -> Vec<Command> {
        if let Some(session) = &mut self.session {
            session.window_rect = Some(rect);
        }
        Vec::new()
    }

    fn on_hide_timer_fired(&mut self, token: u32) -> Vec<Command> {
        match &self.session {
            Some(session) if session.pending_hide == Some(token) => {
                self.session = None;
                vec![Command::HideWindow]
            }
            // Stale token: the timer was superseded or the window is
            // already gone.
            _ => Vec::new(),
        }
    }

    fn on_copy_requested(&mut self, value: String) -> Vec<Command> {
        vec![Command::CopyToClipboard { value }]
    }

    fn on_clipboard_result(&mut self, ok: bool) -> Vec<Command> {
        if !ok {
            // Reported at the boundary; the window stays open so the
            // user can retry by hand.
            return Vec::new();
        }
        // Copy implies intent to close: bypass the debounce. If the
        // window already closed before the write resolved, this
        // completion is a no-op.
        match self.session.take() {
            Some(session) => {
                let mut commands = vec![Command::NotifyCopied {
                    duration_ms: COPY_NOTICE_MS,
                }];
                if let Some(token) = session.pending_hide {
                    commands.push(Command::CancelHide { token });
                }
                commands.push(Command::HideWindow);
                commands
            }
            None => Vec::new(),
        }
    }

    fn on_patterns_updated(&mut self, snapshot: StorageSnapshot) -> Vec<Command> {
        // Swap the working set in place. An open window and its pending
        // timer are left untouched, including on disable.
        self.patterns.hydrate(snapshot);
        Vec::new()
    }

    // ==================== TIMER DISCIPLINE ====================

    /// Cancel-and-replace scheduling: at most one live timer.
    fn schedule_hide(&mut self, commands: &mut Vec<Command>) {
        let Some(session) = &mut self.session else {
            return;
        };
        if let Some(old) = session.pending_hide.take() {
            commands.push(Command::CancelHide { token: old });
        }
        self.next_token = self.next_token.wrapping_add(1);
        let token = self.next_token;
        session.pending_hide = Some(token);
        commands.push(Command::ScheduleHide {
            token,
            delay_ms: HIDE_DELAY_MS,
        });
    }

    fn cancel_pending_hide(&mut self, commands: &mut Vec<Command>) {
        if let Some(session) = &mut self.session {
            if let Some(token) = session.pending_hide.take() {
                commands.push(Command::CancelHide { token });
            }
        }
    }
}

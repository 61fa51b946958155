use crate::hover::commands::{Command, COPY_NOTICE_MS, HIDE_DELAY_MS};
use crate::hover::events::HoverEvent;
use crate::hover::machine::{HoverMachine, HoverState};
use crate::hover::position::Rect;
use crate::matcher::pattern::{PatternSet, RegexPattern, StorageSnapshot};

const USER_URL: &str = "https://e.com/user/123/profile";
const PRODUCT_URL: &str = "https://e.com/product/ABC456";
const PLAIN_URL: &str = "https://e.com/about";

fn pattern(id: &str, name: &str, regex: &str) -> RegexPattern {
    RegexPattern {
        id: id.to_string(),
        name: name.to_string(),
        regex: regex.to_string(),
        created_at: 0,
    }
}

fn snapshot(patterns: Vec<RegexPattern>, enabled: bool) -> StorageSnapshot {
    let ids = patterns.iter().map(|p| p.id.clone()).collect();
    StorageSnapshot {
        regex_patterns: Some(patterns),
        active_pattern_ids: Some(ids),
        active_pattern_id: None,
        is_app_enabled: Some(enabled),
    }
}

fn standard_patterns() -> Vec<RegexPattern> {
    vec![
        pattern("p1", "User ID", r"/user/(\d+)"),
        pattern("p2", "Product Code", r"/product/([A-Z]+\d+)"),
    ]
}

fn machine() -> HoverMachine {
    HoverMachine::with_patterns(PatternSet::from_snapshot(snapshot(standard_patterns(), true)))
}

fn enter(m: &mut HoverMachine, link: u32, url: &str) -> Vec<Command> {
    m.handle(HoverEvent::PointerEnterLink {
        link,
        url: url.to_string(),
        x: 40.0,
        y: 40.0,
    })
}

fn leave(m: &mut HoverMachine, link: u32) -> Vec<Command> {
    m.handle(HoverEvent::PointerLeaveLink { link })
}

/// Token of the single ScheduleHide in a command list.
fn scheduled_token(commands: &[Command]) -> u32 {
    let tokens: Vec<u32> = commands
        .iter()
        .filter_map(|c| match c {
            Command::ScheduleHide { token, delay_ms } => {
                assert_eq!(*delay_ms, HIDE_DELAY_MS);
                Some(*token)
            }
            _ => None,
        })
        .collect();
    assert_eq!(tokens.len(), 1, "expected exactly one ScheduleHide: {:?}", commands);
    tokens[0]
}

fn has_show(commands: &[Command]) -> bool {
    commands.iter().any(|c| matches!(c, Command::ShowWindow { .. }))
}

fn has_hide(commands: &[Command]) -> bool {
    commands.iter().any(|c| matches!(c, Command::HideWindow))
}

// ==================== SHOW PATH ====================

#[test]
fn test_enter_link_with_matches_shows_window() {
    let mut m = machine();
    let commands = enter(&mut m, 1, USER_URL);

    assert_eq!(commands.len(), 1);
    match &commands[0] {
        Command::ShowWindow { matches } => {
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].value, "123");
            assert_eq!(matches[0].pattern_name, "User ID");
        }
        other => panic!("expected ShowWindow, got {:?}", other),
    }
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_enter_link_without_matches_stays_idle() {
    let mut m = machine();
    let commands = enter(&mut m, 1, PLAIN_URL);
    assert!(commands.is_empty());
    assert_eq!(m.state(), HoverState::Idle);
}

#[test]
fn test_same_target_reenter_is_noop() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let commands = enter(&mut m, 1, USER_URL);
    assert!(commands.is_empty());
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_same_target_reenter_does_not_cancel_pending_hide() {
    // Mirrors the original early return: re-entering the link (not the
    // window) leaves a pending hide running.
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let token = scheduled_token(&leave(&mut m, 1));

    assert!(enter(&mut m, 1, USER_URL).is_empty());
    assert_eq!(m.state(), HoverState::PendingHide);

    let commands = m.handle(HoverEvent::HideTimerFired { token });
    assert_eq!(commands, vec![Command::HideWindow]);
    assert_eq!(m.state(), HoverState::Idle);
}

// ==================== DEBOUNCED HIDE ====================

#[test]
fn test_leave_link_schedules_hide() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let commands = leave(&mut m, 1);
    scheduled_token(&commands);
    assert!(!has_hide(&commands));
    assert_eq!(m.state(), HoverState::PendingHide);
}

#[test]
fn test_leave_of_non_target_link_is_ignored() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    assert!(leave(&mut m, 99).is_empty());
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_leave_while_idle_is_noop() {
    let mut m = machine();
    assert!(leave(&mut m, 1).is_empty());
}

#[test]
fn test_double_schedule_yields_exactly_one_hide() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let first = scheduled_token(&leave(&mut m, 1));

    // Second leave (window this time) cancels and replaces the timer
    let commands = m.handle(HoverEvent::PointerLeaveWindow);
    assert!(commands.contains(&Command::CancelHide { token: first }));
    let second = scheduled_token(&commands);
    assert_ne!(first, second);

    // The superseded timer firing anyway is stale and does nothing
    assert!(m.handle(HoverEvent::HideTimerFired { token: first }).is_empty());
    assert_eq!(m.state(), HoverState::PendingHide);

    // Only the current timer hides
    let commands = m.handle(HoverEvent::HideTimerFired { token: second });
    assert_eq!(commands, vec![Command::HideWindow]);
    assert_eq!(m.state(), HoverState::Idle);
}

#[test]
fn test_timer_fires_and_tears_down() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let token = scheduled_token(&leave(&mut m, 1));

    let commands = m.handle(HoverEvent::HideTimerFired { token });
    assert_eq!(commands, vec![Command::HideWindow]);
    assert_eq!(m.state(), HoverState::Idle);

    // Firing again after teardown is a no-op
    assert!(m.handle(HoverEvent::HideTimerFired { token }).is_empty());
}

// ==================== RE-ENTRY CANCELLATION ====================

#[test]
fn test_entering_window_cancels_pending_hide() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let token = scheduled_token(&leave(&mut m, 1));

    let commands = m.handle(HoverEvent::PointerEnterWindow);
    assert_eq!(commands, vec![Command::CancelHide { token }]);
    assert!(!has_hide(&commands));
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_pointer_inside_window_rect_cancels_pending_hide() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    m.handle(HoverEvent::WindowMounted {
        rect: Rect {
            left: 100.0,
            top: 100.0,
            right: 300.0,
            bottom: 200.0,
        },
    });
    let token = scheduled_token(&leave(&mut m, 1));

    // Outside the box: hide still pending
    assert!(m.handle(HoverEvent::PointerMoved { x: 50.0, y: 50.0 }).is_empty());
    assert_eq!(m.state(), HoverState::PendingHide);

    // Inside the box: cancelled
    let commands = m.handle(HoverEvent::PointerMoved { x: 150.0, y: 150.0 });
    assert_eq!(commands, vec![Command::CancelHide { token }]);
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_pointer_moves_are_cheap_noops_otherwise() {
    let mut m = machine();
    assert!(m.handle(HoverEvent::PointerMoved { x: 1.0, y: 1.0 }).is_empty());

    enter(&mut m, 1, USER_URL);
    // Showing, nothing pending: still no commands
    assert!(m.handle(HoverEvent::PointerMoved { x: 2.0, y: 2.0 }).is_empty());
}

// ==================== TARGET SWITCHING ====================

#[test]
fn test_switch_to_link_with_matches_replaces_window() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let commands = enter(&mut m, 2, PRODUCT_URL);

    assert_eq!(
        commands.iter().map(command_name).collect::<Vec<_>>(),
        vec!["HideWindow", "ShowWindow"]
    );
    match &commands[1] {
        Command::ShowWindow { matches } => assert_eq!(matches[0].value, "ABC456"),
        other => panic!("expected ShowWindow, got {:?}", other),
    }
    assert_eq!(m.state(), HoverState::Showing);

    // The machine now tracks the new target
    scheduled_token(&leave(&mut m, 2));
}

#[test]
fn test_switch_with_pending_hide_cancels_old_timer() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let token = scheduled_token(&leave(&mut m, 1));

    let commands = enter(&mut m, 2, PRODUCT_URL);
    assert_eq!(commands[0], Command::CancelHide { token });
    assert!(has_hide(&commands));
    assert!(has_show(&commands));
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_switch_to_empty_link_never_renders_empty_window() {
    // Hovering link A (matches) then link B (no matches): the old
    // window stays up and dies by its own delayed timer. No empty
    // window, no immediate hide.
    let mut m = machine();
    enter(&mut m, 1, USER_URL);

    let commands = enter(&mut m, 2, PLAIN_URL);
    assert!(!has_show(&commands));
    assert!(!has_hide(&commands));
    let token = scheduled_token(&commands);
    assert_eq!(m.state(), HoverState::PendingHide);

    let commands = m.handle(HoverEvent::HideTimerFired { token });
    assert_eq!(commands, vec![Command::HideWindow]);
    assert_eq!(m.state(), HoverState::Idle);
}

// ==================== COPY FLOW ====================

#[test]
fn test_copy_request_emits_clipboard_write() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let commands = m.handle(HoverEvent::CopyRequested {
        value: "123".to_string(),
    });
    assert_eq!(
        commands,
        vec![Command::CopyToClipboard {
            value: "123".to_string()
        }]
    );
    // The write is async; nothing closes until the result arrives
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_clipboard_success_closes_immediately() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let commands = m.handle(HoverEvent::ClipboardResult { ok: true });
    assert_eq!(
        commands,
        vec![
            Command::NotifyCopied {
                duration_ms: COPY_NOTICE_MS
            },
            Command::HideWindow
        ]
    );
    assert_eq!(m.state(), HoverState::Idle);
}

#[test]
fn test_clipboard_success_bypasses_pending_debounce() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let token = scheduled_token(&leave(&mut m, 1));

    let commands = m.handle(HoverEvent::ClipboardResult { ok: true });
    assert!(commands.contains(&Command::CancelHide { token }));
    assert!(has_hide(&commands));
    assert_eq!(m.state(), HoverState::Idle);
}

#[test]
fn test_clipboard_failure_leaves_window_open() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    assert!(m.handle(HoverEvent::ClipboardResult { ok: false }).is_empty());
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_clipboard_result_after_close_is_noop() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let token = scheduled_token(&leave(&mut m, 1));
    m.handle(HoverEvent::HideTimerFired { token });
    assert_eq!(m.state(), HoverState::Idle);

    // Late async completion finds the window already gone
    assert!(m.handle(HoverEvent::ClipboardResult { ok: true }).is_empty());
    assert!(m.handle(HoverEvent::ClipboardResult { ok: false }).is_empty());
    assert_eq!(m.state(), HoverState::Idle);
}

// ==================== CONFIGURATION ====================

#[test]
fn test_disabled_blocks_extraction_entirely() {
    let mut m =
        HoverMachine::with_patterns(PatternSet::from_snapshot(snapshot(standard_patterns(), false)));
    assert!(enter(&mut m, 1, USER_URL).is_empty());
    assert_eq!(m.state(), HoverState::Idle);
}

#[test]
fn test_disable_leaves_open_window_and_pending_timer() {
    let mut m = machine();
    enter(&mut m, 1, USER_URL);
    let token = scheduled_token(&leave(&mut m, 1));

    // Disable mid-session: no forced teardown
    let commands = m.handle(HoverEvent::PatternsUpdated {
        snapshot: snapshot(standard_patterns(), false),
    });
    assert!(commands.is_empty());
    assert_eq!(m.state(), HoverState::PendingHide);

    // New links are gated off while disabled
    assert!(enter(&mut m, 2, PRODUCT_URL).is_empty());

    // The already-scheduled hide still runs to completion
    let commands = m.handle(HoverEvent::HideTimerFired { token });
    assert_eq!(commands, vec![Command::HideWindow]);
    assert_eq!(m.state(), HoverState::Idle);
}

#[test]
fn test_patterns_updated_swaps_working_set() {
    let mut m = HoverMachine::new();
    // Nothing configured: inert
    assert!(enter(&mut m, 1, USER_URL).is_empty());

    m.handle(HoverEvent::PatternsUpdated {
        snapshot: snapshot(standard_patterns(), true),
    });
    assert!(has_show(&enter(&mut m, 1, USER_URL)));
}

#[test]
fn test_compile_failure_surfaces_as_report_command() {
    let patterns = vec![
        pattern("bad", "Broken", r"[unclosed"),
        pattern("p1", "User ID", r"/user/(\d+)"),
    ];
    let mut m = HoverMachine::with_patterns(PatternSet::from_snapshot(snapshot(patterns, true)));

    let commands = enter(&mut m, 1, USER_URL);
    assert!(matches!(
        &commands[0],
        Command::ReportPatternFailure { pattern_name, .. } if pattern_name == "Broken"
    ));
    assert!(has_show(&commands));
    assert_eq!(m.state(), HoverState::Showing);
}

#[test]
fn test_only_failing_patterns_yield_report_but_no_window() {
    let patterns = vec![pattern("bad", "Broken", r"[unclosed")];
    let mut m = HoverMachine::with_patterns(PatternSet::from_snapshot(snapshot(patterns, true)));

    let commands = enter(&mut m, 1, USER_URL);
    assert_eq!(commands.len(), 1);
    assert!(matches!(&commands[0], Command::ReportPatternFailure { .. }));
    assert_eq!(m.state(), HoverState::Idle);
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::ShowWindow { .. } => "ShowWindow",
        Command::HideWindow => "HideWindow",
        Command::ScheduleHide { .. } => "ScheduleHide",
        Command::CancelHide { .. } => "CancelHide",
        Command::CopyToClipboard { .. } => "CopyToClipboard",
        Command::NotifyCopied { .. } => "NotifyCopied",
        Command::ReportPatternFailure { .. } => "ReportPatternFailure",
    }
}

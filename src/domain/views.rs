use super::enums::{TimerMode, TimerState};
use super::settings::Settings;
use super::task::Task;
use super::timer::Timer;
use chrono::{DateTime, Duration, Local};

/// Format seconds as "MM:SS" (minutes keep counting past 59)
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Terminal window title derived from the timer
pub fn window_title(timer: &Timer) -> String {
    match timer.state() {
        TimerState::Idle => "pomodo".to_string(),
        TimerState::Running => format!(
            "▶ {} {} · pomodo",
            format_clock(timer.time_remaining()),
            timer.mode().name()
        ),
        TimerState::Paused => format!(
            "⏸ {} {} · pomodo",
            format_clock(timer.time_remaining()),
            timer.mode().name()
        ),
    }
}

/// Whether task text should be hidden right now
///
/// Only a focus session in progress can blur. Inside one, the quick-blur
/// override wins; without it, blur mode applies while the clock runs.
pub fn tasks_blurred(settings: &Settings, timer: &Timer) -> bool {
    let in_focus_session = timer.mode() == TimerMode::Focus && timer.state() != TimerState::Idle;
    if !in_focus_session {
        return false;
    }
    settings
        .quick_blur
        .unwrap_or(settings.blur_mode && timer.is_running())
}

/// Wall-clock time the current phase will end, if it is running
pub fn session_ends_at(timer: &Timer, now: DateTime<Local>) -> Option<DateTime<Local>> {
    if !timer.is_running() {
        return None;
    }
    Some(now + Duration::seconds(i64::from(timer.time_remaining())))
}

/// Get status badge text
pub fn status_badge(state: TimerState) -> &'static str {
    match state {
        TimerState::Running => "⏱ RUNNING",
        TimerState::Paused => "⏸ PAUSED",
        TimerState::Idle => "🌿 IDLE",
    }
}

/// Checkbox glyph for a task row
pub fn task_glyph(task: &Task) -> &'static str {
    if task.completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Text shown for a task row, masked when blurred
pub fn task_label(task: &Task, blurred: bool) -> String {
    if blurred {
        "░".repeat(task.text.chars().count().clamp(3, 24))
    } else {
        task.text.clone()
    }
}

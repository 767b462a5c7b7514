/// Desktop notifications for finished sessions
/// macOS goes through osascript, Linux through notify-send

#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;

use crate::domain::TimerMode;

/// Title and body for a session that just ran out
pub fn session_message(finished: TimerMode, next: TimerMode) -> (String, String) {
    let title = match finished {
        TimerMode::Focus => "pomodo - Focus complete".to_string(),
        TimerMode::Rest => "pomodo - Break over".to_string(),
    };
    let body = match next {
        TimerMode::Rest => format!("{} Time for a break", next.symbol()),
        TimerMode::Focus => format!("{} Back to focus", next.symbol()),
    };
    (title, body)
}

/// Send a notification when a session runs out
pub fn notify_session_complete(finished: TimerMode, next: TimerMode) {
    let (title, body) = session_message(finished, next);

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            body.replace('"', "\\\""),
            title.replace('"', "\\\"")
        );

        if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!(error = %e, "osascript notification failed");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Err(e) = Command::new("notify-send").arg(&title).arg(&body).output() {
            tracing::debug!(error = %e, "notify-send failed");
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        // No-op on other platforms
        let _ = (title, body);
    }
}

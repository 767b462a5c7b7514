use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Handle keyboard input events; returns true when the app should quit
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Locked => handle_locked_mode(app, key),
        UiMode::AddingTask | UiMode::EditingTask => handle_input_form_mode(app, key),
        UiMode::Settings => handle_settings_mode(app, key),
        UiMode::Security => handle_security_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let now = Instant::now();
    app.status_message = None;

    match key.code {
        // Navigation (with Shift modifier for reordering)
        KeyCode::Up | KeyCode::Char('k') => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_selected_up();
            } else {
                app.move_selection_up();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_selected_down();
            } else {
                app.move_selection_down();
            }
        }
        KeyCode::Char('K') => app.move_selected_up(),
        KeyCode::Char('J') => app.move_selected_down(),
        KeyCode::Tab | KeyCode::BackTab => app.switch_focus(),

        // Timer controls
        KeyCode::Char(' ') => app.toggle_timer(now),
        KeyCode::Char('s') | KeyCode::Char('S') => app.skip_timer(now),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset_timer(now),
        KeyCode::Char('b') | KeyCode::Char('B') => app.toggle_quick_blur(),

        // Task actions
        KeyCode::Enter | KeyCode::Char('x') | KeyCode::Char('X') => app.toggle_selected(),
        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_task(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_task(),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('u') | KeyCode::Char('U') => app.undo(),
        KeyCode::Char('m') | KeyCode::Char('M') => app.send_selected_to_other_list(),

        // Card order
        KeyCode::Char('[') => app.shift_focused_card(-1),
        KeyCode::Char(']') => app.shift_focused_card(1),

        // Modals
        KeyCode::Char(',') | KeyCode::Char('o') | KeyCode::Char('O') => app.open_settings(),
        KeyCode::Char('p') | KeyCode::Char('P') => app.open_security(),

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while the store waits for a PIN
fn handle_locked_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char(c) => app.pin_add_char(c),
        KeyCode::Backspace => app.pin_backspace(),
        KeyCode::Enter => app.submit_pin(),
        KeyCode::Esc => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in input form mode
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the settings modal
fn handle_settings_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_settings(),
        KeyCode::Esc => app.cancel_settings(),
        _ => {
            if let Some(form) = &mut app.settings_form {
                match key.code {
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Char(c) => form.add_char(c),
                    _ => {}
                }
            }
        }
    }
    Ok(false)
}

/// Handle keys in the security modal
fn handle_security_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if app.pin_prompt.is_some() {
        match key.code {
            KeyCode::Char(c) => app.pin_add_char(c),
            KeyCode::Backspace => app.pin_backspace(),
            KeyCode::Enter => app.submit_pin(),
            KeyCode::Esc => app.pin_prompt = None,
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('p') | KeyCode::Char('P') => app.start_set_pin(),
        KeyCode::Char('a') | KeyCode::Char('A') => {
            if app.store.security().requires_pin() {
                app.use_auto_key();
            }
        }
        KeyCode::Esc | KeyCode::Char('q') => app.close_security(),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListKind, TimerState};
    use crate::persistence::EncryptedStore;
    use tempfile::TempDir;

    fn create_test_app() -> (TempDir, AppState) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = EncryptedStore::open(temp_dir.path()).unwrap();
        let mut app = AppState::new(store);
        app.settings.notifications = false;
        (temp_dir, app)
    }

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_task_via_keys() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        // Letters typed into the form are not treated as commands
        type_text(&mut app, "quit smoking");
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.tasks.tasks()[0].text, "quit smoking");
    }

    #[test]
    fn test_timer_keys() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.timer.state(), TimerState::Running);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.timer.state(), TimerState::Paused);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_shift_arrow_reorders() {
        let (_dir, mut app) = create_test_app();
        app.add_task(ListKind::Tasks, "one");
        app.add_task(ListKind::Tasks, "two");

        handle_key(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT)).unwrap();
        let texts: Vec<&str> = app
            .tasks
            .sorted_for_display()
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["two", "one"]);
    }

    #[test]
    fn test_settings_modal_keys() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Char(','));
        assert_eq!(app.ui_mode, UiMode::Settings);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        // Empty duration is rejected and the modal stays open
        assert_eq!(app.ui_mode, UiMode::Settings);

        type_text(&mut app, "45");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.settings.focus_minutes, 45);
    }

    #[test]
    fn test_quit_keys() {
        let (_dir, mut app) = create_test_app();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        )
        .unwrap());
    }
}

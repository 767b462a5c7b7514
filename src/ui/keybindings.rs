use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{error_style, hint_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

fn hints_for(mode: UiMode) -> &'static [&'static str] {
    match mode {
        UiMode::Normal => &[
            " ␣ start/pause   ",
            "s skip   ",
            "r reset   ",
            "↑/↓ select   ",
            "Shift+↑/↓ reorder   ",
            "Tab list   ",
            "a add   ",
            "e edit   ",
            "x done   ",
            "d delete   ",
            "u undo   ",
            "m move   ",
            "b blur   ",
            "[/] card   ",
            ", settings   ",
            "p PIN   ",
            "q quit",
        ],
        UiMode::Locked => &[" enter your PIN   ", "Esc quit"],
        UiMode::AddingTask | UiMode::EditingTask => &[" Enter save   ", "Esc cancel"],
        UiMode::Settings => &[" Tab field   ", "Space toggle   ", "Enter save   ", "Esc cancel"],
        UiMode::Security => &[" p set PIN   ", "a device key   ", "Esc close"],
    }
}

/// Render the keybindings hint bar, or the latest status message
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(format!(" {}", message), error_style())),
        None => Line::from(
            hints_for(app.ui_mode)
                .iter()
                .map(|h| Span::raw(*h))
                .collect::<Vec<_>>(),
        ),
    };

    let paragraph = Paragraph::new(line).style(hint_style());
    f.render_widget(paragraph, area);
}

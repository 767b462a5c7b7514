use crate::app::{AppState, PinPrompt, PinPurpose};
use crate::domain::SettingsForm;
use crate::persistence::SecurityMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn render_modal_box(f: &mut Frame, area: Rect, height: u16, title: &str, lines: Vec<Line>) {
    let modal_area = create_modal_area(area, height);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title.to_string(), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// PIN digits are never echoed
fn pin_lines(prompt: &PinPrompt) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::raw("  PIN: "),
        Span::styled("•".repeat(prompt.input.len()), modal_title_style()),
        Span::styled("█", modal_title_style()),
    ])];
    if let Some(error) = &prompt.error {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), error_style())));
    }
    lines
}

/// Render the lock screen shown until the PIN is entered
pub fn render_lock_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(prompt) = &app.pin_prompt else {
        return;
    };

    let mut lines = vec![
        Line::raw(""),
        Line::raw("  Your tasks are protected with a PIN."),
        Line::raw(""),
    ];
    lines.extend(pin_lines(prompt));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  Enter unlock  ·  Esc quit  ·  forgot it? run `pomodo reset`",
        hint_style(),
    )));

    render_modal_box(f, area, 10, " 🔒 Locked ", lines);
}

/// Render the settings modal with inline validation
pub fn render_settings_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.settings_form else {
        return;
    };

    let mut lines = vec![Line::raw("")];
    lines.extend(settings_field_lines(form));
    lines.push(Line::raw(""));

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(format!("  {}", error), error_style())));
    } else {
        lines.push(Line::raw(""));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  Tab/↑↓ field  ·  Space toggle  ·  Enter save  ·  Esc cancel",
        hint_style(),
    )));

    render_modal_box(f, area, 13, " ⚙ Settings ", lines);
}

fn settings_field_lines(form: &SettingsForm) -> Vec<Line<'static>> {
    let on_off = |v: bool| if v { "on" } else { "off" }.to_string();
    let fields = [
        ("Focus minutes", form.focus.clone()),
        ("Rest minutes", form.rest.clone()),
        ("Blur while focusing", on_off(form.blur_mode)),
        ("After skip", form.skip_policy.name().to_string()),
        ("Notifications", on_off(form.notifications)),
    ];

    fields
        .into_iter()
        .enumerate()
        .map(|(idx, (label, value))| {
            let editing = idx == form.editing_field;
            let marker = if editing { "> " } else { "  " };
            let mut spans = vec![
                Span::raw(format!("{}{:<20}", marker, label)),
                Span::styled(value, modal_title_style()),
            ];
            if editing && idx < 2 {
                spans.push(Span::styled("█", modal_title_style())); // Cursor
            }
            Line::from(spans)
        })
        .collect()
}

/// Render the security modal (PIN on/off)
pub fn render_security_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let mode = app.store.security().mode;
    let mut lines = vec![Line::raw("")];

    match &app.pin_prompt {
        Some(prompt) if prompt.purpose == PinPurpose::SetPin => {
            lines.push(Line::raw("  Choose a PIN (4-8 digits)."));
            lines.push(Line::raw("  Stored data will be re-encrypted with it."));
            lines.push(Line::raw(""));
            lines.extend(pin_lines(prompt));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "  Enter confirm  ·  Esc back",
                hint_style(),
            )));
        }
        _ => {
            let current = match mode {
                SecurityMode::Auto => "device key (no PIN)",
                SecurityMode::Pin => "PIN",
            };
            lines.push(Line::from(vec![
                Span::raw("  Protection: "),
                Span::styled(current, modal_title_style()),
            ]));
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled("  [p]", modal_title_style()),
                Span::raw(" Set a new PIN"),
            ]));
            if mode == SecurityMode::Pin {
                lines.push(Line::from(vec![
                    Span::styled("  [a]", modal_title_style()),
                    Span::raw(" Remove PIN, use device key"),
                ]));
            }
            lines.push(Line::from(vec![
                Span::styled("  [Esc]", modal_title_style()),
                Span::raw(" Close"),
            ]));
        }
    }

    render_modal_box(f, area, 11, " 🔐 Security ", lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Settings;

    #[test]
    fn test_pin_is_masked() {
        let prompt = PinPrompt {
            purpose: PinPurpose::Unlock,
            input: "1234".to_string(),
            error: None,
        };
        let rendered = format!("{:?}", pin_lines(&prompt));
        assert!(!rendered.contains("1234"));
        assert!(rendered.contains("••••"));
    }

    #[test]
    fn test_settings_fields_show_values() {
        let form = SettingsForm::from_settings(&Settings::default());
        let lines = settings_field_lines(&form);
        assert_eq!(lines.len(), SettingsForm::FIELD_COUNT);

        let rendered = format!("{:?}", lines);
        assert!(rendered.contains("25"));
        assert!(rendered.contains("wait"));
    }
}

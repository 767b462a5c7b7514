use crate::app::{AppState, InputFormState};
use crate::ui::{
    layout::create_modal_area,
    styles::{disabled_style, hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the input form for adding or editing a task
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area, 8);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let title_text = match form.editing {
            Some(_) => " Edit Task ".to_string(),
            None => format!(" Add to {} ", form.list.title()),
        };

        let paragraph = Paragraph::new(form_lines(form))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title_text, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

fn form_lines(form: &InputFormState) -> Vec<Line<'static>> {
    let submit_label = if form.editing.is_some() { "[Enter] Save" } else { "[Enter] Add" };
    // Submit stays greyed out until there is something to add
    let submit = if form.can_submit() {
        Span::styled(submit_label, modal_title_style())
    } else {
        Span::styled(submit_label, disabled_style())
    };

    vec![
        Line::raw(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(form.text.clone(), modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  "),
            submit,
            Span::styled("  ·  [Esc] Cancel", hint_style()),
        ]),
    ]
}

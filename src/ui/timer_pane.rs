use crate::app::AppState;
use crate::domain::{format_clock, session_ends_at, status_badge, TimerMode, TimerState};
use crate::ui::styles::{
    border_style, gauge_style, hint_style, idle_style, paused_style, rest_gauge_style,
    running_style, title_style,
};
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the timer card
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let timer = &app.timer;
    let title = format!(" {} {} ", timer.mode().symbol(), timer.mode().name());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // spacer
            Constraint::Length(1), // clock
            Constraint::Length(1), // badge
            Constraint::Length(1), // spacer
            Constraint::Length(1), // gauge
            Constraint::Length(1), // spacer
            Constraint::Min(0),    // details
        ])
        .split(inner);

    let clock = Paragraph::new(Line::from(Span::styled(
        format_clock(timer.time_remaining()),
        title_style().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(clock, chunks[1]);

    let badge_style = match timer.state() {
        TimerState::Running => running_style(),
        TimerState::Paused => paused_style(),
        TimerState::Idle => idle_style(),
    };
    let badge = Paragraph::new(Span::styled(status_badge(timer.state()), badge_style))
        .alignment(Alignment::Center);
    f.render_widget(badge, chunks[2]);

    let gauge = Gauge::default()
        .gauge_style(match timer.mode() {
            TimerMode::Focus => gauge_style(),
            TimerMode::Rest => rest_gauge_style(),
        })
        .ratio(timer.progress_ratio())
        .label(format!("{:.0}%", timer.progress_ratio() * 100.0));
    f.render_widget(gauge, chunks[4]);

    f.render_widget(Paragraph::new(detail_lines(app)), chunks[6]);
}

fn detail_lines(app: &AppState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(ends) = session_ends_at(&app.timer, Local::now()) {
        lines.push(Line::raw(format!(" Ends at {}", ends.format("%H:%M"))));
    } else {
        lines.push(Line::raw(""));
    }

    lines.push(Line::raw(format!(
        " 🍅 {} today",
        app.completed_focus_sessions
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!(
            " {}m focus · {}m rest",
            app.settings.focus_minutes, app.settings.rest_minutes
        ),
        hint_style(),
    )));
    lines.push(Line::from(Span::styled(
        format!(" skip: {}", app.timer.skip_policy().name()),
        hint_style(),
    )));
    if app.tasks_blurred() {
        lines.push(Line::from(Span::styled(" blur on", hint_style())));
    }
    lines
}

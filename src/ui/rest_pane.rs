use crate::app::AppState;
use crate::domain::{format_clock, RestStage, TimerMode};
use crate::ui::layout::create_overlay_area;
use crate::ui::styles::{hint_style, rest_style};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const FRAMES_PER_CYCLE: u32 = 12; // 12 frames at 4 FPS = 3 second loop

/// How much of the screen the overlay covers in each stage
fn coverage(stage: RestStage) -> f64 {
    match stage {
        RestStage::Hidden | RestStage::Dimming => 0.0,
        RestStage::Entering => 0.5,
        RestStage::Resting => 1.0,
        RestStage::Exiting => 0.3,
    }
}

/// Render the rest overlay over `area` while the staging says it is visible
pub fn render_rest_overlay(f: &mut Frame, app: &AppState, area: Rect) {
    let stage = app.rest.stage();
    if !stage.is_visible() {
        return;
    }

    let overlay = create_overlay_area(area, coverage(stage));
    if overlay.height < 3 {
        return;
    }
    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} Rest ", TimerMode::Rest.symbol()))
        .style(rest_style());
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let frame_index = (app.animation_frame % FRAMES_PER_CYCLE) as usize;
    let mut lines = cloud_lines(frame_index);
    lines.push(Line::raw(""));

    if app.timer.mode() == TimerMode::Rest {
        lines.push(Line::from(Span::styled(
            format_clock(app.timer.time_remaining()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Space start/pause · s back to focus",
            hint_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Back to focus",
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(paragraph, inner);
}

/// Clouds drifting horizontally at different speeds
fn cloud_lines(frame: usize) -> Vec<Line<'static>> {
    let cloud_positions = [
        ("      ☁️       ", "  ☁️         ", "        ☁️   "),
        ("       ☁️      ", "   ☁️        ", "         ☁️  "),
        ("        ☁️     ", "    ☁️       ", "          ☁️ "),
        ("         ☁️    ", "     ☁️      ", "           ☁️"),
        ("          ☁️   ", "      ☁️     ", "  ☁️         "),
        ("           ☁️  ", "       ☁️    ", "   ☁️        "),
        ("  ☁️           ", "        ☁️   ", "    ☁️       "),
        ("   ☁️          ", "         ☁️  ", "     ☁️      "),
        ("    ☁️         ", "          ☁️ ", "      ☁️     "),
        ("     ☁️        ", "           ☁️", "       ☁️    "),
        ("      ☁️       ", "  ☁️         ", "        ☁️   "),
        ("       ☁️      ", "   ☁️        ", "         ☁️  "),
    ];

    let pos = &cloud_positions[frame % cloud_positions.len()];

    vec![
        Line::from(""),
        Line::from(pos.0),
        Line::from(""),
        Line::from(pos.1),
        Line::from(""),
        Line::from(pos.2),
        Line::from(""),
        Line::from(Span::styled(
            "Breathe",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_by_stage() {
        assert_eq!(coverage(RestStage::Hidden), 0.0);
        assert_eq!(coverage(RestStage::Dimming), 0.0);
        assert!(coverage(RestStage::Entering) < coverage(RestStage::Resting));
        assert!(coverage(RestStage::Exiting) < coverage(RestStage::Resting));
    }

    #[test]
    fn test_cloud_frames_cycle() {
        assert_eq!(cloud_lines(0), cloud_lines(12));
        assert_ne!(cloud_lines(0), cloud_lines(1));
    }
}

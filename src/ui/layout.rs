use crate::domain::Card;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    /// Cards left to right in the user's order
    pub cards: Vec<(Card, Rect)>,
}

impl MainLayout {
    pub fn card_area(&self, card: Card) -> Option<Rect> {
        self.cards.iter().find(|(c, _)| *c == card).map(|(_, r)| *r)
    }
}

fn card_weight(card: Card) -> u16 {
    match card {
        Card::Timer => 30,
        Card::Tasks | Card::Backlog => 35,
    }
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: the three cards side by side, in `card_order`
pub fn create_layout(area: Rect, card_order: &[Card]) -> MainLayout {
    // Split into top bar and main content
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    let keybindings_area = main_chunks[0];
    let content_area = main_chunks[1];

    let constraints: Vec<Constraint> = card_order
        .iter()
        .map(|card| Constraint::Percentage(card_weight(*card)))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(content_area);

    let cards = card_order
        .iter()
        .copied()
        .zip(chunks.iter().copied())
        .collect();

    MainLayout {
        keybindings_area,
        cards,
    }
}

/// Create centered modal area with a fixed height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

/// Portion of `area` covered by the rest overlay, growing from the top
///
/// `fraction` is clamped to 0.0..=1.0.
pub fn create_overlay_area(area: Rect, fraction: f64) -> Rect {
    let fraction = fraction.clamp(0.0, 1.0);
    let height = (f64::from(area.height) * fraction).round() as u16;
    Rect::new(area.x, area.y, area.width, height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area, &Card::default_order());

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.cards.len(), 3);
        for (_, rect) in &layout.cards {
            assert_eq!(rect.height, 49);
        }
    }

    #[test]
    fn test_layout_follows_card_order() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area, &[Card::Backlog, Card::Timer, Card::Tasks]);

        let backlog = layout.card_area(Card::Backlog).unwrap();
        let timer = layout.card_area(Card::Timer).unwrap();
        let tasks = layout.card_area(Card::Tasks).unwrap();
        assert!(backlog.x < timer.x);
        assert!(timer.x < tasks.x);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 12);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 12);
    }

    #[test]
    fn test_overlay_area_grows() {
        let area = Rect::new(0, 0, 40, 20);
        assert_eq!(create_overlay_area(area, 0.0).height, 0);
        assert_eq!(create_overlay_area(area, 0.5).height, 10);
        assert_eq!(create_overlay_area(area, 2.0), area);
    }
}

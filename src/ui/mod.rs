pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod rest_pane;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use crate::domain::{Card, UiMode};
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::{create_layout, MainLayout};
use list_pane::render_list_pane;
use modal::{render_lock_modal, render_security_modal, render_settings_modal};
use ratatui::layout::Rect;
use ratatui::Frame;
use rest_pane::render_rest_overlay;
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &mut AppState) {
    let size = f.size();

    // Render keybindings bar
    let layout = create_layout(size, &app.settings.card_order);
    render_keybindings(f, app, layout.keybindings_area);

    // Nothing but the PIN prompt while locked
    if app.ui_mode == UiMode::Locked {
        app.drop_zones.clear();
        render_lock_modal(f, app, size);
        return;
    }

    // Render cards, recording where the list rows landed this frame
    let mut zones = Vec::new();
    for (card, area) in &layout.cards {
        match card.list() {
            Some(kind) => zones.push(render_list_pane(f, app, kind, *area)),
            None => render_timer_pane(f, app, *area),
        }
    }
    app.drop_zones = zones;

    // Rest overlay covers the list cards
    if let Some(area) = list_cards_area(&layout) {
        render_rest_overlay(f, app, area);
    }

    // Render modals
    match app.ui_mode {
        UiMode::AddingTask | UiMode::EditingTask => render_input_form(f, app, size),
        UiMode::Settings => render_settings_modal(f, app, size),
        UiMode::Security => render_security_modal(f, app, size),
        UiMode::Normal | UiMode::Locked => {}
    }
}

/// Bounding box of the two list cards
fn list_cards_area(layout: &MainLayout) -> Option<Rect> {
    match (layout.card_area(Card::Tasks), layout.card_area(Card::Backlog)) {
        (Some(tasks), Some(backlog)) => Some(tasks.union(backlog)),
        (tasks, backlog) => tasks.or(backlog),
    }
}

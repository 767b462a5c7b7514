use crate::app::AppState;
use crate::domain::UiMode;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

/// Handle mouse input: clicks select, left-button drags move tasks
pub fn handle_mouse(app: &mut AppState, event: MouseEvent, now: Instant) {
    if app.ui_mode != UiMode::Normal {
        app.drag.cancel();
        return;
    }

    let (col, row) = (event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((list, id)) = app.drag.press(&app.drop_zones, col, row) {
                app.select(list, id);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.drag.motion(&app.drop_zones, col, row, now);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(commit) = app.drag.release(&app.drop_zones, col, row) {
                tracing::debug!(?commit, "drop");
                app.apply_drop(commit);
            }
        }
        MouseEventKind::ScrollUp => app.move_selection_up(),
        MouseEventKind::ScrollDown => app.move_selection_down(),
        _ => {}
    }
}

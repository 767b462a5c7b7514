use crate::app::AppState;
use crate::domain::{task_glyph, task_label, DropZone, ListKind, RestStage, RowHit, Task};
use crate::ui::styles::{
    blurred_style, default_style, dimmed_style, done_style, drop_target_style, dragged_style,
    focused_border_style, border_style, hint_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render one task list pane and return its hit areas for drag-and-drop
pub fn render_list_pane(f: &mut Frame, app: &AppState, kind: ListKind, area: Rect) -> DropZone {
    let list = app.list(kind);
    let rows = list.sorted_for_display();
    let blurred = app.tasks_blurred();
    let dimmed = matches!(app.rest.stage(), RestStage::Dimming | RestStage::Entering);
    let focused = app.focused == kind;
    let dragged = app.drag.dragged().map(|(_, id)| id);
    let hover = app.drag.hover().filter(|h| h.list == kind);

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let mut line = create_task_line(task, blurred);
            if let Some(h) = hover {
                if h.index == idx {
                    line.spans.insert(0, Span::styled("▸", drop_target_style()));
                }
            }
            let style = if dimmed {
                dimmed_style()
            } else if dragged == Some(task.id) {
                dragged_style()
            } else if focused && idx == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let open = rows.iter().filter(|t| !t.completed).count();
    let title = format!(" {} ({}/{}) ", kind.title(), open, rows.len());
    let border = if hover.is_some() {
        drop_target_style()
    } else if focused {
        focused_border_style()
    } else {
        border_style()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, title_style()));
    if rows.is_empty() {
        block = block.title_bottom(Span::styled(" a to add ", hint_style()));
    }
    let inner = block.inner(area);

    let mut state = ListState::default();
    if focused && !rows.is_empty() {
        state.select(Some(app.selected_index.min(rows.len() - 1)));
    }
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);

    DropZone {
        list: kind,
        area,
        rows: row_hits(&rows, inner, state.offset()),
        len: rows.len(),
    }
}

/// Screen rectangles of the rows visible after scrolling
fn row_hits(rows: &[&Task], inner: Rect, offset: usize) -> Vec<RowHit> {
    rows.iter()
        .skip(offset)
        .take(usize::from(inner.height))
        .enumerate()
        .map(|(i, task)| RowHit {
            id: task.id,
            index: offset + i,
            area: Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        })
        .collect()
}

/// Create a single line for a task
/// Format: [x] Write proposal
fn create_task_line(task: &Task, blurred: bool) -> Line<'static> {
    let text_style = if blurred {
        blurred_style()
    } else if task.completed {
        done_style()
    } else {
        default_style()
    };

    Line::from(vec![
        Span::raw(format!("{} ", task_glyph(task))),
        Span::styled(task_label(task, blurred), text_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_line() {
        let task = Task::new("Test task".to_string(), 0);
        let line = create_task_line(&task, false);

        let line_str = format!("{:?}", line);
        assert!(line_str.contains("Test task"));
        assert!(line_str.contains("[ ]"));
    }

    #[test]
    fn test_blurred_line_hides_text() {
        let task = Task::new("Private".to_string(), 0);
        let line = create_task_line(&task, true);

        let line_str = format!("{:?}", line);
        assert!(!line_str.contains("Private"));
    }

    #[test]
    fn test_row_hits_follow_scroll_offset() {
        let tasks: Vec<Task> = (0..5).map(|i| Task::new(format!("t{}", i), i)).collect();
        let refs: Vec<&Task> = tasks.iter().collect();
        let inner = Rect::new(1, 1, 10, 3);

        let hits = row_hits(&refs, inner, 2);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, tasks[2].id);
        assert_eq!(hits[0].index, 2);
        assert_eq!(hits[2].index, 4);
        assert_eq!(hits[0].area, Rect::new(1, 1, 10, 1));
        assert_eq!(hits[2].area.y, 3);
    }
}

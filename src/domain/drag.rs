//! Mouse drag-and-drop between and within the task lists.
//!
//! A press on a row records a pending drag. The drag only starts once the
//! pointer has moved past a small threshold, so a plain click still selects.
//! While dragging, the drop target is resolved from the pane rectangles the
//! renderer recorded for this frame: the pane under the cursor wins, and
//! otherwise the pane that overlaps the dragged row the most.

use super::enums::ListKind;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Movement in cells before a press becomes a drag
pub const DRAG_THRESHOLD_CELLS: u16 = 1;

/// Overlap checks run at most once per frame
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// A rendered task row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHit {
    pub id: Uuid,
    /// Position in the full display order, not in the visible slice
    pub index: usize,
    pub area: Rect,
}

/// A list pane that accepts drops
///
/// `rows` holds only the rows visible after scrolling, in display order.
/// `len` is the length of the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZone {
    pub list: ListKind,
    pub area: Rect,
    pub rows: Vec<RowHit>,
    pub len: usize,
}

/// Where the dragged task would land if released now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverTarget {
    pub list: ListKind,
    /// Display index in the target list
    pub index: usize,
    /// Task the dragged one would be inserted before (None = end)
    pub before: Option<Uuid>,
}

/// Mutation to apply when a drag is released over a valid target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCommit {
    Reorder {
        list: ListKind,
        id: Uuid,
        new_index: usize,
    },
    Transfer {
        from: ListKind,
        to: ListKind,
        id: Uuid,
        insert_before: Option<Uuid>,
    },
}

#[derive(Debug, Clone, Copy)]
struct DragOrigin {
    list: ListKind,
    id: Uuid,
    start: (u16, u16),
    /// Column offset between the press and the row's left edge
    grab_dx: u16,
    row_width: u16,
}

/// Drag state for one session
#[derive(Debug, Default)]
pub struct DragController {
    origin: Option<DragOrigin>,
    dragging: bool,
    pointer: (u16, u16),
    hover: Option<HoverTarget>,
    last_check: Option<Instant>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task being dragged, once the threshold has been crossed
    pub fn dragged(&self) -> Option<(ListKind, Uuid)> {
        match self.origin {
            Some(origin) if self.dragging => Some((origin.list, origin.id)),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn hover(&self) -> Option<HoverTarget> {
        self.hover
    }

    pub fn pointer(&self) -> (u16, u16) {
        self.pointer
    }

    /// Mouse button pressed; returns the row under the cursor, if any
    pub fn press(&mut self, zones: &[DropZone], col: u16, row: u16) -> Option<(ListKind, Uuid)> {
        self.cancel();
        let (zone, hit) = zones.iter().find_map(|zone| {
            zone.rows
                .iter()
                .find(|r| contains(r.area, col, row))
                .map(|hit| (zone, hit))
        })?;

        self.origin = Some(DragOrigin {
            list: zone.list,
            id: hit.id,
            start: (col, row),
            grab_dx: col.saturating_sub(hit.area.x),
            row_width: hit.area.width,
        });
        self.pointer = (col, row);
        Some((zone.list, hit.id))
    }

    /// Pointer moved with the button held
    pub fn motion(&mut self, zones: &[DropZone], col: u16, row: u16, now: Instant) {
        let Some(origin) = self.origin else {
            return;
        };
        self.pointer = (col, row);

        if !self.dragging {
            let dx = col.abs_diff(origin.start.0);
            let dy = row.abs_diff(origin.start.1);
            if dx < DRAG_THRESHOLD_CELLS && dy < DRAG_THRESHOLD_CELLS {
                return;
            }
            self.dragging = true;
            tracing::debug!(list = ?origin.list, id = %origin.id, "drag started");
        }

        if let Some(last) = self.last_check {
            if now.duration_since(last) < FRAME_INTERVAL {
                return;
            }
        }
        self.last_check = Some(now);
        self.hover = resolve_target(zones, self.dragged_rect(), self.pointer);
    }

    /// Button released; returns the mutation to apply, if the drop is valid
    pub fn release(&mut self, zones: &[DropZone], col: u16, row: u16) -> Option<DropCommit> {
        let origin = self.origin?;
        if !self.dragging {
            self.cancel();
            return None;
        }

        // Final check ignores the frame throttle so the drop uses the real position
        self.pointer = (col, row);
        let target = resolve_target(zones, self.dragged_rect(), self.pointer);
        self.cancel();

        let target = target?;
        if target.list == origin.list {
            Some(DropCommit::Reorder {
                list: origin.list,
                id: origin.id,
                new_index: target.index,
            })
        } else {
            Some(DropCommit::Transfer {
                from: origin.list,
                to: target.list,
                id: origin.id,
                insert_before: target.before,
            })
        }
    }

    /// Forget any pending or active drag
    pub fn cancel(&mut self) {
        self.origin = None;
        self.dragging = false;
        self.hover = None;
        self.last_check = None;
    }

    /// One-row rectangle following the pointer, as wide as the grabbed row
    fn dragged_rect(&self) -> Rect {
        match self.origin {
            Some(origin) => Rect::new(
                self.pointer.0.saturating_sub(origin.grab_dx),
                self.pointer.1,
                origin.row_width,
                1,
            ),
            None => Rect::new(self.pointer.0, self.pointer.1, 1, 1),
        }
    }
}

/// Pick the drop zone and position for a dragged rectangle
///
/// Cursor containment takes priority over rectangle overlap; among
/// overlapping zones the largest intersection wins.
pub fn resolve_target(zones: &[DropZone], dragged: Rect, cursor: (u16, u16)) -> Option<HoverTarget> {
    let zone = zones
        .iter()
        .find(|z| contains(z.area, cursor.0, cursor.1))
        .or_else(|| {
            zones
                .iter()
                .map(|z| (z, overlap_area(z.area, dragged)))
                .filter(|(_, area)| *area > 0)
                .max_by_key(|(_, area)| *area)
                .map(|(z, _)| z)
        })?;

    let y = cursor.1;
    let (index, before) = match zone.rows.iter().find(|r| r.area.y >= y) {
        Some(hit) => (hit.index, Some(hit.id)),
        None => (zone.len, None),
    };

    Some(HoverTarget {
        list: zone.list,
        index,
        before,
    })
}

/// Whether a cell lies inside a rectangle
pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && row >= area.y
        && u32::from(col) < u32::from(area.x) + u32::from(area.width)
        && u32::from(row) < u32::from(area.y) + u32::from(area.height)
}

fn overlap_area(a: Rect, b: Rect) -> u32 {
    if !a.intersects(b) {
        return 0;
    }
    let i = a.intersection(b);
    u32::from(i.width) * u32::from(i.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Two side-by-side panes with three and two rows
    fn zones() -> (Vec<DropZone>, Vec<Uuid>, Vec<Uuid>) {
        let left_ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let right_ids: Vec<Uuid> = (0..2).map(|_| Uuid::new_v4()).collect();
        let rows = |ids: &[Uuid], x: u16| {
            ids.iter()
                .enumerate()
                .map(|(i, id)| RowHit {
                    id: *id,
                    index: i,
                    area: Rect::new(x + 1, 1 + i as u16, 18, 1),
                })
                .collect::<Vec<_>>()
        };
        let zones = vec![
            DropZone {
                list: ListKind::Tasks,
                area: Rect::new(0, 0, 20, 10),
                rows: rows(&left_ids, 0),
                len: left_ids.len(),
            },
            DropZone {
                list: ListKind::Backlog,
                area: Rect::new(30, 0, 20, 10),
                rows: rows(&right_ids, 30),
                len: right_ids.len(),
            },
        ];
        (zones, left_ids, right_ids)
    }

    #[test]
    fn test_click_without_motion_is_not_a_drag() {
        let (zones, left, _) = zones();
        let mut dnd = DragController::new();
        assert_eq!(dnd.press(&zones, 5, 1), Some((ListKind::Tasks, left[0])));
        assert_eq!(dnd.release(&zones, 5, 1), None);
        assert!(!dnd.is_dragging());
    }

    #[test]
    fn test_press_outside_rows() {
        let (zones, _, _) = zones();
        let mut dnd = DragController::new();
        assert_eq!(dnd.press(&zones, 25, 1), None);
        dnd.motion(&zones, 35, 1, Instant::now());
        assert!(!dnd.is_dragging());
    }

    #[test]
    fn test_same_list_drop_reorders() {
        let (zones, left, _) = zones();
        let mut dnd = DragController::new();
        dnd.press(&zones, 5, 1);
        dnd.motion(&zones, 5, 3, Instant::now());
        assert_eq!(dnd.dragged(), Some((ListKind::Tasks, left[0])));

        let commit = dnd.release(&zones, 5, 3);
        assert_eq!(
            commit,
            Some(DropCommit::Reorder {
                list: ListKind::Tasks,
                id: left[0],
                new_index: 2
            })
        );
        assert!(dnd.dragged().is_none());
    }

    #[test]
    fn test_cross_list_drop_inserts_before_row() {
        let (zones, left, right) = zones();
        let mut dnd = DragController::new();
        dnd.press(&zones, 5, 2);
        dnd.motion(&zones, 35, 2, Instant::now());
        let commit = dnd.release(&zones, 35, 2);
        assert_eq!(
            commit,
            Some(DropCommit::Transfer {
                from: ListKind::Tasks,
                to: ListKind::Backlog,
                id: left[1],
                insert_before: Some(right[1])
            })
        );
    }

    #[test]
    fn test_cross_list_drop_below_rows_appends() {
        let (zones, left, _) = zones();
        let mut dnd = DragController::new();
        dnd.press(&zones, 5, 1);
        dnd.motion(&zones, 35, 8, Instant::now());
        match dnd.release(&zones, 35, 8) {
            Some(DropCommit::Transfer { id, insert_before, .. }) => {
                assert_eq!(id, left[0]);
                assert_eq!(insert_before, None);
            }
            other => panic!("unexpected commit: {:?}", other),
        }
    }

    #[test]
    fn test_drop_outside_any_zone_is_noop() {
        let (zones, _, _) = zones();
        let mut dnd = DragController::new();
        dnd.press(&zones, 1, 1);
        dnd.motion(&zones, 1, 20, Instant::now());
        // Grabbed at the row's left edge: dragged row spans 1..19, below both panes
        assert_eq!(dnd.release(&zones, 1, 20), None);
    }

    #[test]
    fn test_overlap_used_when_cursor_in_gap() {
        let (zones, _, _) = zones();
        // Cursor in the gap between panes, dragged row overlaps the right pane more
        let dragged = Rect::new(22, 1, 18, 1);
        let target = resolve_target(&zones, dragged, (22, 1)).unwrap();
        assert_eq!(target.list, ListKind::Backlog);
    }

    #[test]
    fn test_cursor_containment_beats_overlap() {
        let (zones, _, _) = zones();
        // Row mostly over the right pane, cursor still inside the left pane
        let dragged = Rect::new(15, 1, 18, 1);
        let target = resolve_target(&zones, dragged, (16, 1)).unwrap();
        assert_eq!(target.list, ListKind::Tasks);
    }

    #[test]
    fn test_motion_is_throttled_per_frame() {
        let (zones, _, _) = zones();
        let mut dnd = DragController::new();
        let t0 = Instant::now();
        dnd.press(&zones, 5, 1);
        dnd.motion(&zones, 5, 2, t0);
        assert_eq!(dnd.hover().map(|h| h.index), Some(1));

        // Within the same frame: pointer moves but hover is not recomputed
        dnd.motion(&zones, 5, 3, t0 + Duration::from_millis(5));
        assert_eq!(dnd.hover().map(|h| h.index), Some(1));

        dnd.motion(&zones, 5, 3, t0 + FRAME_INTERVAL);
        assert_eq!(dnd.hover().map(|h| h.index), Some(2));
    }

    /// Pane showing rows 5..9 of a ten-row list (scrolled down by five)
    fn scrolled_zone() -> (DropZone, Vec<Uuid>) {
        let ids: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();
        let rows = ids[5..9]
            .iter()
            .enumerate()
            .map(|(i, id)| RowHit {
                id: *id,
                index: 5 + i,
                area: Rect::new(1, 1 + i as u16, 18, 1),
            })
            .collect();
        let zone = DropZone {
            list: ListKind::Tasks,
            area: Rect::new(0, 0, 20, 6),
            rows,
            len: ids.len(),
        };
        (zone, ids)
    }

    #[test]
    fn test_scrolled_pane_reports_display_index() {
        let (zone, ids) = scrolled_zone();
        let zones = vec![zone];
        let mut dnd = DragController::new();
        assert_eq!(dnd.press(&zones, 5, 1), Some((ListKind::Tasks, ids[5])));
        dnd.motion(&zones, 5, 2, Instant::now());
        assert_eq!(dnd.hover().map(|h| h.index), Some(6));

        assert_eq!(
            dnd.release(&zones, 5, 2),
            Some(DropCommit::Reorder {
                list: ListKind::Tasks,
                id: ids[5],
                new_index: 6
            })
        );
    }

    #[test]
    fn test_scrolled_pane_below_last_row_targets_list_end() {
        let (zone, ids) = scrolled_zone();
        let zones = vec![zone];
        let target = resolve_target(&zones, Rect::new(1, 5, 18, 1), (5, 5)).unwrap();
        assert_eq!(target.index, ids.len());
        assert_eq!(target.before, None);
    }

    #[test]
    fn test_contains_edges() {
        let area = Rect::new(2, 2, 3, 2);
        assert!(contains(area, 2, 2));
        assert!(contains(area, 4, 3));
        assert!(!contains(area, 5, 3));
        assert!(!contains(area, 4, 4));
        assert!(!contains(area, 1, 2));
    }
}

//! Transient pointer-interaction state: zone drag/resize sessions and the active search term.
//!
//! Nothing here is persisted. A session snapshots the zone geometry at press time so a cancel
//! can restore it exactly.

use serde::{Deserialize, Serialize};

use crate::geometry::{PointerPosition, Rect};
use crate::model::{ZoneId, DEFAULT_GRID_SIZE};
use crate::reflow::MIN_ICON_SIZE;
use crate::search::SearchFilter;

/// Narrowest zone that still fits a default-width grid of minimum-size icons, with 4 units of
/// slack on each side of every icon. Zones configured with more columns can still overflow.
pub const MIN_ZONE_WIDTH: f32 = DEFAULT_GRID_SIZE as f32 * (MIN_ICON_SIZE + 8.0);
pub const MIN_ZONE_HEIGHT: f32 = 60.0;

/// One of the eight grab handles drawn on a zone's corners and edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    pub const ALL: [Self; 8] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }

    /// Anchor point of the handle on `rect`.
    pub fn anchor(self, rect: &Rect) -> PointerPosition {
        let cx = (rect.left + rect.right) / 2.0;
        let cy = (rect.top + rect.bottom) / 2.0;
        let x = if self.moves_left() {
            rect.left
        } else if self.moves_right() {
            rect.right
        } else {
            cx
        };
        let y = if self.moves_top() {
            rect.top
        } else if self.moves_bottom() {
            rect.bottom
        } else {
            cy
        };
        PointerPosition::new(x, y)
    }
}

/// Applies a pointer delta to `start` for the given handle.
///
/// The result is never smaller than [`MIN_ZONE_WIDTH`] x [`MIN_ZONE_HEIGHT`]; when clamping, the
/// edge opposite the dragged one stays put.
pub fn resize_rect(start: Rect, handle: ResizeHandle, dx: f32, dy: f32) -> Rect {
    let mut rect = Rect {
        left: if handle.moves_left() { start.left + dx } else { start.left },
        right: if handle.moves_right() { start.right + dx } else { start.right },
        top: if handle.moves_top() { start.top + dy } else { start.top },
        bottom: if handle.moves_bottom() { start.bottom + dy } else { start.bottom },
    };
    if rect.width() < MIN_ZONE_WIDTH {
        if handle.moves_left() {
            rect.left = rect.right - MIN_ZONE_WIDTH;
        } else {
            rect.right = rect.left + MIN_ZONE_WIDTH;
        }
    }
    if rect.height() < MIN_ZONE_HEIGHT {
        if handle.moves_top() {
            rect.top = rect.bottom - MIN_ZONE_HEIGHT;
        } else {
            rect.bottom = rect.top + MIN_ZONE_HEIGHT;
        }
    }
    rect
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub zone_id: ZoneId,
    pub pointer_start: PointerPosition,
    pub rect_start: Rect,
}

impl DragSession {
    pub fn rect_at(&self, pointer: PointerPosition) -> Rect {
        self.rect_start.offset(
            pointer.x - self.pointer_start.x,
            pointer.y - self.pointer_start.y,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub zone_id: ZoneId,
    pub handle: ResizeHandle,
    pub pointer_start: PointerPosition,
    pub rect_start: Rect,
}

impl ResizeSession {
    pub fn rect_at(&self, pointer: PointerPosition) -> Rect {
        resize_rect(
            self.rect_start,
            self.handle,
            pointer.x - self.pointer_start.x,
            pointer.y - self.pointer_start.y,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
    pub search: SearchFilter,
}

impl InteractionState {
    /// The search filter to apply, or `None` when the search box is empty.
    pub fn search_filter(&self) -> Option<&SearchFilter> {
        (!self.search.is_empty()).then_some(&self.search)
    }

    pub fn has_session(&self) -> bool {
        self.dragging.is_some() || self.resizing.is_some()
    }

    /// Zone currently under a drag or resize, if any.
    pub fn active_zone(&self) -> Option<&ZoneId> {
        self.dragging
            .as_ref()
            .map(|session| &session.zone_id)
            .or_else(|| self.resizing.as_ref().map(|session| &session.zone_id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const START: Rect = Rect::new(100.0, 100.0, 300.0, 250.0);

    #[test]
    fn corner_handles_move_two_edges() {
        assert_eq!(
            resize_rect(START, ResizeHandle::BottomRight, 20.0, 30.0),
            Rect::new(100.0, 100.0, 320.0, 280.0)
        );
        assert_eq!(
            resize_rect(START, ResizeHandle::TopLeft, -10.0, -5.0),
            Rect::new(90.0, 95.0, 300.0, 250.0)
        );
    }

    #[test]
    fn edge_handles_ignore_the_other_axis() {
        assert_eq!(
            resize_rect(START, ResizeHandle::Right, 50.0, 999.0),
            Rect::new(100.0, 100.0, 350.0, 250.0)
        );
        assert_eq!(
            resize_rect(START, ResizeHandle::Top, 999.0, 40.0),
            Rect::new(100.0, 140.0, 300.0, 250.0)
        );
    }

    #[test]
    fn shrinking_clamps_to_minimum_and_pins_the_opposite_edge() {
        let rect = resize_rect(START, ResizeHandle::TopLeft, 500.0, 500.0);
        assert_eq!(rect, Rect::new(140.0, 190.0, 300.0, 250.0));
        let rect = resize_rect(START, ResizeHandle::BottomRight, -500.0, -500.0);
        assert_eq!(rect, Rect::new(100.0, 100.0, 260.0, 160.0));
    }

    #[test]
    fn drag_session_offsets_from_snapshot() {
        let session = DragSession {
            zone_id: ZoneId("z".to_string()),
            pointer_start: PointerPosition::new(10.0, 10.0),
            rect_start: START,
        };
        assert_eq!(
            session.rect_at(PointerPosition::new(35.0, 50.0)),
            START.offset(25.0, 40.0)
        );
    }

    #[test]
    fn handle_anchors_sit_on_corners_and_midpoints() {
        assert_eq!(
            ResizeHandle::TopLeft.anchor(&START),
            PointerPosition::new(100.0, 100.0)
        );
        assert_eq!(
            ResizeHandle::Bottom.anchor(&START),
            PointerPosition::new(200.0, 250.0)
        );
        assert_eq!(
            ResizeHandle::Right.anchor(&START),
            PointerPosition::new(300.0, 175.0)
        );
    }
}

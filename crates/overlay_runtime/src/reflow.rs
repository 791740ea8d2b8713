//! Icon grid placement.
//!
//! There is exactly one layout formula. [`reflow_zone`] writes its output into each icon's
//! zone-relative position; [`layout_zone`] evaluates the same formula without mutation and tags
//! each slot with its visibility under the current search filter.

use crate::geometry::Rect;
use crate::model::{IconId, Zone, DEFAULT_GRID_SIZE};
use crate::search::{is_visible, SearchFilter};

pub const MIN_ICON_SIZE: f32 = 32.0;
pub const ICON_SIZE_RATIO: f64 = 0.6;
pub const CELL_PADDING_RATIO: f64 = 0.1;
pub const LABEL_HEIGHT: f32 = 20.0;
pub const LABEL_GAP: f32 = 2.0;
pub const TITLE_BAND_HEIGHT: f32 = 20.0;

/// Cell metrics derived from a zone's width and column count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflowMetrics {
    pub icons_per_row: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    pub icon_size: f32,
    pub cell_padding: f32,
}

impl ReflowMetrics {
    pub fn for_zone(zone: &Zone) -> Self {
        let icons_per_row = if zone.grid_cols > 0 {
            zone.grid_cols as usize
        } else {
            DEFAULT_GRID_SIZE as usize
        };
        // Ratios are applied in f64 so round cell widths produce exact f32 sizes.
        let cell_width = f64::from(zone.screen_rect.width()) / icons_per_row as f64;
        let icon_size = (cell_width * ICON_SIZE_RATIO).max(f64::from(MIN_ICON_SIZE));
        let cell_padding = cell_width * CELL_PADDING_RATIO;
        let cell_height = icon_size
            + f64::from(LABEL_HEIGHT)
            + f64::from(LABEL_GAP)
            + 2.0 * cell_padding;
        Self {
            icons_per_row,
            cell_width: cell_width as f32,
            cell_height: cell_height as f32,
            icon_size: icon_size as f32,
            cell_padding: cell_padding as f32,
        }
    }

    /// Zone-relative icon rectangle for the slot at `index`.
    pub fn slot(&self, index: usize) -> Rect {
        let col = (index % self.icons_per_row) as f32;
        let row = (index / self.icons_per_row) as f32;
        let left = col * self.cell_width + (self.cell_width - self.icon_size) / 2.0;
        let top = row * self.cell_height + self.cell_padding + TITLE_BAND_HEIGHT;
        Rect::new(left, top, left + self.icon_size, top + self.icon_size)
    }

    /// Zone-relative rectangle for the label drawn under the slot at `index`.
    pub fn label_slot(&self, index: usize) -> Rect {
        let icon = self.slot(index);
        let col = (index % self.icons_per_row) as f32;
        let left = col * self.cell_width;
        let top = icon.bottom + LABEL_GAP;
        Rect::new(left, top, left + self.cell_width, top + LABEL_HEIGHT)
    }
}

/// Writes grid positions for every icon in `zone`, in list order.
pub fn reflow_zone(zone: &mut Zone) {
    if zone.icons.is_empty() {
        return;
    }
    let metrics = ReflowMetrics::for_zone(zone);
    for (index, icon) in zone.icons.iter_mut().enumerate() {
        icon.position = metrics.slot(index);
    }
}

/// One laid-out icon for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct IconLayout {
    pub icon_id: IconId,
    /// Zone-relative icon rectangle.
    pub rect: Rect,
    /// Zone-relative label rectangle.
    pub label: Rect,
    pub visible: bool,
}

/// Computes the layout the renderer should draw, without mutating the zone.
///
/// Icons hidden by `filter` keep their slot so that clearing the search never shifts anything.
pub fn layout_zone(zone: &Zone, filter: Option<&SearchFilter>) -> Vec<IconLayout> {
    let metrics = ReflowMetrics::for_zone(zone);
    zone.icons
        .iter()
        .enumerate()
        .map(|(index, icon)| IconLayout {
            icon_id: icon.id.clone(),
            rect: metrics.slot(index),
            label: metrics.label_slot(index),
            visible: is_visible(icon, filter),
        })
        .collect()
}

use serde::{Deserialize, Serialize};

use crate::{
    board::{Band, SlotId},
    geometry::{Point, Size},
};

/// Rows per band.
pub const ROWS: usize = 18;
/// Slot columns in each band.
pub const BAND_COLUMNS: usize = 4;
/// Names past this index never reach the right column, regardless of `rows`.
pub const RIGHT_NAME_LIMIT: usize = 35;
/// Largest board shape that is still built and drawn.
pub const MAX_ROWS: usize = 64;
pub const MAX_COLUMNS: usize = 16;

/// Shape of the board: how many rows and how many slot columns per band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub rows: usize,
    pub left_columns: usize,
    pub right_columns: usize,
    pub right_name_limit: usize,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            rows: ROWS,
            left_columns: BAND_COLUMNS,
            right_columns: BAND_COLUMNS,
            right_name_limit: RIGHT_NAME_LIMIT,
        }
    }
}

impl BoardLayout {
    pub fn new(rows: usize, left_columns: usize, right_columns: usize) -> Self {
        Self {
            rows,
            left_columns,
            right_columns,
            ..Default::default()
        }
    }

    pub fn columns(&self, band: Band) -> usize {
        match band {
            Band::Left => self.left_columns,
            Band::Right => self.right_columns,
        }
    }

    pub fn slots_in(&self, band: Band) -> usize {
        self.rows.saturating_mul(self.columns(band))
    }

    pub fn slot_count(&self) -> usize {
        self.slots_in(Band::Left)
            .saturating_add(self.slots_in(Band::Right))
    }

    pub fn within_limits(&self) -> bool {
        self.rows <= MAX_ROWS
            && self.left_columns <= MAX_COLUMNS
            && self.right_columns <= MAX_COLUMNS
    }

    /// The same shape cut down to `MAX_ROWS` by `MAX_COLUMNS`.
    pub fn clamped(self) -> Self {
        Self {
            rows: self.rows.min(MAX_ROWS),
            left_columns: self.left_columns.min(MAX_COLUMNS),
            right_columns: self.right_columns.min(MAX_COLUMNS),
            ..self
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        id.row < self.rows && id.column < self.columns(id.band)
    }

    /// Position of `id` in creation order: row-major, left band first.
    pub fn slot_index(&self, id: SlotId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        let offset = match id.band {
            Band::Left => 0,
            Band::Right => self.slots_in(Band::Left),
        };
        Some(offset + id.row * self.columns(id.band) + id.column)
    }
}

/// Pixel geometry of the board. The renderer sizes every cell from these
/// numbers, so a slot's grid coordinate here is where it appears on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardMetrics {
    pub name_width: f32,
    pub cell_width: f32,
    pub row_height: f32,
    pub icon_size: f32,
    pub band_gap: f32,
}

impl Default for BoardMetrics {
    fn default() -> Self {
        Self {
            name_width: 170.0,
            cell_width: 22.0,
            row_height: 30.0,
            icon_size: 20.0,
            band_gap: 12.0,
        }
    }
}

impl BoardMetrics {
    /// Left edge of a band's name column.
    pub fn band_x(&self, layout: &BoardLayout, band: Band) -> f32 {
        match band {
            Band::Left => 0.0,
            Band::Right => {
                self.name_width + layout.left_columns as f32 * self.cell_width + self.band_gap
            }
        }
    }

    pub fn name_origin(&self, layout: &BoardLayout, band: Band, row: usize) -> Point {
        Point::new(self.band_x(layout, band), row as f32 * self.row_height)
    }

    /// Top-left corner of the slot's icon while it sits in its grid cell.
    pub fn slot_origin(&self, layout: &BoardLayout, id: SlotId) -> Point {
        let cell_x = self.band_x(layout, id.band) + self.name_width + id.column as f32 * self.cell_width;
        Point::new(
            cell_x + (self.cell_width - self.icon_size) / 2.0,
            id.row as f32 * self.row_height + (self.row_height - self.icon_size) / 2.0,
        )
    }

    pub fn board_size(&self, layout: &BoardLayout, display_rows: usize) -> Size {
        let right = self.band_x(layout, Band::Right)
            + self.name_width
            + layout.right_columns as f32 * self.cell_width;
        Size::new(right, display_rows as f32 * self.row_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_index_is_row_major_left_first() {
        let layout = BoardLayout::default();
        assert_eq!(layout.slot_index(SlotId::new(Band::Left, 0, 0)), Some(0));
        assert_eq!(layout.slot_index(SlotId::new(Band::Left, 1, 0)), Some(4));
        assert_eq!(layout.slot_index(SlotId::new(Band::Right, 0, 0)), Some(72));
        assert_eq!(layout.slot_index(SlotId::new(Band::Right, 17, 3)), Some(143));
        assert_eq!(layout.slot_index(SlotId::new(Band::Right, 18, 0)), None);
        assert_eq!(layout.slot_index(SlotId::new(Band::Left, 0, 4)), None);
    }

    #[test]
    fn oversized_shapes_saturate_and_clamp() {
        let huge = BoardLayout::new(usize::MAX / 2, 4, 4);
        assert_eq!(huge.slot_count(), usize::MAX);
        assert!(!huge.within_limits());

        let clamped = huge.clamped();
        assert!(clamped.within_limits());
        assert_eq!(clamped.rows, MAX_ROWS);
        assert_eq!(clamped.slot_count(), MAX_ROWS * 8);
        assert_eq!(BoardLayout::default().clamped(), BoardLayout::default());
    }

    #[test]
    fn slot_origin_centres_icon_in_cell() {
        let layout = BoardLayout::default();
        let metrics = BoardMetrics::default();

        let first = metrics.slot_origin(&layout, SlotId::new(Band::Left, 0, 0));
        assert_eq!(first, Point::new(171.0, 5.0));

        let right = metrics.slot_origin(&layout, SlotId::new(Band::Right, 2, 1));
        // 170 + 4 * 22 + 12 for the left band, then the right name column.
        assert_eq!(right, Point::new(270.0 + 170.0 + 22.0 + 1.0, 65.0));
    }

    #[test]
    fn board_size_covers_both_bands() {
        let layout = BoardLayout::default();
        let size = BoardMetrics::default().board_size(&layout, 18);
        assert_eq!(size, Size::new(270.0 + 170.0 + 88.0, 540.0));
    }
}

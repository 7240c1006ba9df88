use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    geometry::{Point, Vector},
    layout::BoardLayout,
};

/// One of the two column groups sharing a row-indexed name column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Left,
    Right,
}

impl Band {
    pub const ALL: [Band; 2] = [Band::Left, Band::Right];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId {
    pub band: Band,
    pub row: usize,
    pub column: usize,
}

impl SlotId {
    pub const fn new(band: Band, row: usize, column: usize) -> Self {
        Self { band, row, column }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let band = match self.band {
            Band::Left => "left",
            Band::Right => "right",
        };
        write!(f, "{band} row {} column {}", self.row, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlotMode {
    /// Showing the default marker in its grid cell.
    GridFixed,
    /// Showing catalog item `item` at an explicit board position.
    FreeDraggable { item: usize, position: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    id: SlotId,
    mode: SlotMode,
}

impl Slot {
    fn new(id: SlotId) -> Self {
        Self {
            id,
            mode: SlotMode::GridFixed,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn mode(&self) -> SlotMode {
        self.mode
    }

    pub fn is_committed(&self) -> bool {
        matches!(self.mode, SlotMode::FreeDraggable { .. })
    }

    pub fn item(&self) -> Option<usize> {
        match self.mode {
            SlotMode::GridFixed => None,
            SlotMode::FreeDraggable { item, .. } => Some(item),
        }
    }

    /// Free position, `None` while the slot still sits in its grid cell.
    pub fn position(&self) -> Option<Point> {
        match self.mode {
            SlotMode::GridFixed => None,
            SlotMode::FreeDraggable { position, .. } => Some(position),
        }
    }

    /// The first commit places the slot at `grid_origin`; later commits only
    /// swap the item.
    fn commit(&mut self, chosen: usize, grid_origin: Point) {
        match self.mode {
            SlotMode::GridFixed => {
                self.mode = SlotMode::FreeDraggable {
                    item: chosen,
                    position: grid_origin,
                }
            }
            SlotMode::FreeDraggable { ref mut item, .. } => *item = chosen,
        }
    }

    fn translate(&mut self, delta: Vector) -> Option<Point> {
        match &mut self.mode {
            SlotMode::GridFixed => None,
            SlotMode::FreeDraggable { position, .. } => {
                *position += delta;
                Some(*position)
            }
        }
    }
}

/// A read-only location label bound to one row of a band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub band: Band,
    pub row: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no slot at {0}")]
    UnknownSlot(SlotId),
    #[error("catalog has no item #{0}")]
    UnknownItem(usize),
}

#[derive(Debug, Clone)]
pub struct BoardState {
    layout: BoardLayout,
    names: Vec<NameEntry>,
    slots: Vec<Slot>,
}

/// Lays out name labels and creates every slot in its grid cell.
///
/// The left column takes `names[0..rows)` and the right column continues with
/// `names[rows..right_name_limit)`. Short name lists leave rows unlabelled.
/// Shapes past `MAX_ROWS` by `MAX_COLUMNS` are cut down to that size.
pub fn build_board<S: AsRef<str>>(layout: BoardLayout, names: &[S]) -> BoardState {
    let layout = if layout.within_limits() {
        layout
    } else {
        warn!(?layout, "board shape too large, clamping");
        layout.clamped()
    };
    let left_end = layout.rows.min(names.len());
    let right_end = layout.right_name_limit.min(names.len()).max(left_end);

    let left = names[..left_end]
        .iter()
        .enumerate()
        .map(|(row, name)| NameEntry {
            band: Band::Left,
            row,
            text: name.as_ref().to_string(),
        });
    let right = names[left_end..right_end]
        .iter()
        .enumerate()
        .map(|(row, name)| NameEntry {
            band: Band::Right,
            row,
            text: name.as_ref().to_string(),
        });
    let names: Vec<NameEntry> = left.chain(right).collect();

    let mut slots = Vec::with_capacity(layout.slot_count());
    for band in Band::ALL {
        for row in 0..layout.rows {
            for column in 0..layout.columns(band) {
                slots.push(Slot::new(SlotId::new(band, row, column)));
            }
        }
    }

    debug!(
        rows = layout.rows,
        labels = names.len(),
        slots = slots.len(),
        "built board"
    );
    BoardState {
        layout,
        names,
        slots,
    }
}

impl BoardState {
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn names(&self) -> &[NameEntry] {
        &self.names
    }

    pub fn names_in(&self, band: Band) -> impl Iterator<Item = &NameEntry> {
        self.names.iter().filter(move |n| n.band == band)
    }

    pub fn name_at(&self, band: Band, row: usize) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.band == band && n.row == row)
            .map(|n| n.text.as_str())
    }

    /// Rows the board needs on screen: the slot rows, or more when the right
    /// column carries labels past the last slot row.
    pub fn display_rows(&self) -> usize {
        self.names
            .iter()
            .map(|n| n.row + 1)
            .max()
            .unwrap_or(0)
            .max(self.layout.rows)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.layout.slot_index(id).and_then(|i| self.slots.get(i))
    }

    fn slot_mut(&mut self, id: SlotId) -> Result<&mut Slot, BoardError> {
        self.layout
            .slot_index(id)
            .and_then(|i| self.slots.get_mut(i))
            .ok_or(BoardError::UnknownSlot(id))
    }

    pub fn committed(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.is_committed())
    }

    pub fn is_committed(&self, id: SlotId) -> bool {
        self.slot(id).is_some_and(Slot::is_committed)
    }

    /// Assigns catalog item `item` to the slot. On the slot's first commit it
    /// leaves the grid at `grid_origin` and becomes draggable.
    pub fn commit(&mut self, id: SlotId, item: usize, grid_origin: Point) -> Result<(), BoardError> {
        self.slot_mut(id)?.commit(item, grid_origin);
        Ok(())
    }

    /// Moves a committed slot by `delta`. Returns the new position, or `None`
    /// when the slot is unknown or still in its grid cell.
    pub fn translate(&mut self, id: SlotId, delta: Vector) -> Option<Point> {
        self.slot_mut(id).ok()?.translate(delta)
    }
}

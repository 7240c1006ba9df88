use tracing::info;

use crate::{
    board::{BoardError, BoardState, SlotId},
    catalog::Catalog,
    layout::BoardMetrics,
};

/// Icons per picker row.
pub const PICKER_COLUMNS: usize = 4;

/// One selectable cell of the picker, carried by the selection message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickerEntry {
    /// Catalog index of the item this cell shows.
    pub index: usize,
}

/// Wraps `len` entries into rows of `columns`, in catalog order.
pub fn picker_grid(len: usize, columns: usize) -> Vec<Vec<PickerEntry>> {
    let columns = columns.max(1);
    (0..len)
        .map(|index| PickerEntry { index })
        .collect::<Vec<_>>()
        .chunks(columns)
        .map(<[PickerEntry]>::to_vec)
        .collect()
}

/// Result of choosing an entry: `item` now sits on `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub slot: SlotId,
    pub item: usize,
}

/// Item picker bound to one target slot. Closing it, by choosing or by
/// dismissing, consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    target: SlotId,
    rows: Vec<Vec<PickerEntry>>,
    len: usize,
}

impl Picker {
    pub fn open(target: SlotId, catalog: &Catalog) -> Self {
        info!(%target, items = catalog.len(), "opening item picker");
        Self {
            target,
            rows: picker_grid(catalog.len(), PICKER_COLUMNS),
            len: catalog.len(),
        }
    }

    pub fn target(&self) -> SlotId {
        self.target
    }

    pub fn rows(&self) -> &[Vec<PickerEntry>] {
        &self.rows
    }

    /// Commits `entry` to the target slot. A slot leaving its grid cell
    /// starts out at its grid coordinate.
    pub fn choose(
        self,
        entry: PickerEntry,
        board: &mut BoardState,
        metrics: &BoardMetrics,
    ) -> Result<Placement, BoardError> {
        if entry.index >= self.len {
            return Err(BoardError::UnknownItem(entry.index));
        }
        let origin = metrics.slot_origin(board.layout(), self.target);
        board.commit(self.target, entry.index, origin)?;
        info!(target = %self.target, item = entry.index, "committed item");
        Ok(Placement {
            slot: self.target,
            item: entry.index,
        })
    }

    /// Closes the picker without touching the board. Returns the slot it was
    /// opened for.
    pub fn dismiss(self) -> SlotId {
        info!(target = %self.target, "picker dismissed");
        self.target
    }
}

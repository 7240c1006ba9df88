use common::{
    board::{Band, BoardError, BoardState, Slot, SlotId},
    drag::DragController,
    geometry::{Point, Size},
    layout::BoardMetrics,
    picker::{Picker, PickerEntry, Placement},
};
use iced::{Font, Length, Padding, alignment, font::Weight, mouse, widget};
use tracing::error;

use crate::icons::Icons;

use super::GridMessage;

/// The tracking board: name columns, slot cells and the layer of placed items
/// floating above them.
#[derive(Debug)]
pub struct GridWidget {
    board: BoardState,
    metrics: BoardMetrics,
    drag: DragController,
    pointer: Point,
}

impl GridWidget {
    pub fn new(board: BoardState, metrics: BoardMetrics) -> Self {
        Self {
            board,
            metrics,
            drag: DragController::new(),
            pointer: Point::ORIGIN,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn update(&mut self, message: GridMessage) -> iced::Task<GridMessage> {
        match message {
            GridMessage::OpenPicker(_) => {
                error!("OpenPicker should be consumed by parent");
            }
            GridMessage::BeginDrag(id) => {
                self.drag.begin(&self.board, id, self.pointer);
            }
            GridMessage::PointerMoved(p) => {
                self.pointer = p;
                self.drag.continue_drag(&mut self.board, p);
            }
            GridMessage::PointerReleased => {
                self.drag.end();
            }
        }
        iced::Task::none()
    }

    /// Drops any drag in progress, e.g. when a dialog takes over the pointer.
    pub fn cancel_drag(&mut self) {
        self.drag.end();
    }

    pub fn commit(&mut self, picker: Picker, entry: PickerEntry) -> Result<Placement, BoardError> {
        picker.choose(entry, &mut self.board, &self.metrics)
    }

    pub fn view<'a>(&'a self, icons: &'a Icons) -> iced::Element<'a, GridMessage> {
        let layout = self.board.layout();
        let rows = self.board.display_rows();

        let mut grid = widget::column![];
        for r in 0..rows {
            let mut row: widget::Row<'_, GridMessage> = widget::row![];
            for band in Band::ALL {
                if band == Band::Right {
                    row = row.push(widget::horizontal_space().width(self.metrics.band_gap));
                }
                row = row.push(self.name_cell(band, r));
                for c in 0..layout.columns(band) {
                    row = row.push(self.slot_cell(SlotId::new(band, r, c), icons));
                }
            }
            grid = grid.push(row);
        }

        let size = self.metrics.board_size(layout, rows);
        let mut layers: Vec<iced::Element<'a, GridMessage>> = vec![grid.into()];
        layers.extend(
            self.board
                .committed()
                .map(|slot| self.placed(slot, size, icons)),
        );

        widget::Stack::with_children(layers)
            .width(size.width)
            .height(size.height)
            .into()
    }

    fn name_cell(&self, band: Band, row: usize) -> iced::Element<'_, GridMessage> {
        let mut font = Font::DEFAULT;
        font.weight = Weight::Medium;
        let label = self.board.name_at(band, row).unwrap_or_default();
        widget::container(widget::text(label).size(14.0).font(font))
            .width(self.metrics.name_width)
            .height(self.metrics.row_height)
            .padding(Padding::default().left(4.0).right(4.0))
            .align_y(alignment::Vertical::Center)
            .into()
    }

    fn slot_cell<'a>(&'a self, id: SlotId, icons: &'a Icons) -> iced::Element<'a, GridMessage> {
        let cell = |content: iced::Element<'a, GridMessage>| {
            widget::container(content)
                .width(self.metrics.cell_width)
                .height(self.metrics.row_height)
                .align_x(alignment::Horizontal::Center)
                .align_y(alignment::Vertical::Center)
        };
        match self.board.slot(id) {
            Some(slot) if !slot.is_committed() => {
                widget::mouse_area(cell(icons.marker(self.metrics.icon_size)))
                    .on_double_click(GridMessage::OpenPicker(id))
                    .interaction(mouse::Interaction::Pointer)
                    .into()
            }
            // Committed slots are drawn on the floating layer; rows past the
            // slot rows only carry a right-hand label.
            _ => cell(widget::horizontal_space().into()).into(),
        }
    }

    fn placed<'a>(
        &'a self,
        slot: &Slot,
        board: Size,
        icons: &'a Icons,
    ) -> iced::Element<'a, GridMessage> {
        let (Some(item), Some(position)) = (slot.item(), slot.position()) else {
            return widget::horizontal_space().into();
        };
        let id = slot.id();
        let interaction = if self.drag.active() == Some(id) {
            mouse::Interaction::Grabbing
        } else {
            mouse::Interaction::Grab
        };
        let handle = widget::mouse_area(icons.item(item, self.metrics.icon_size))
            .on_press(GridMessage::BeginDrag(id))
            .on_double_click(GridMessage::OpenPicker(id))
            .interaction(interaction);

        let offset = draw_offset(position, board, self.metrics.icon_size);
        widget::container(handle)
            .padding(Padding::default().left(offset.x).top(offset.y))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Where an item at `position` is drawn. Items dragged past any edge stay
/// fully visible against it while their stored position keeps going.
fn draw_offset(position: Point, board: Size, icon: f32) -> Point {
    Point::new(
        position.x.min(board.width - icon).max(0.0),
        position.y.min(board.height - icon).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use common::{board::build_board, catalog::Catalog, layout::BoardLayout};

    use super::*;

    fn widget() -> GridWidget {
        let board = build_board(BoardLayout::default(), common::catalog::LOCATIONS);
        GridWidget::new(board, BoardMetrics::default())
    }

    #[test]
    fn drag_follows_pointer_after_commit() {
        let mut grid = widget();
        let id = SlotId::new(Band::Left, 0, 0);
        let catalog = Catalog::builtin();
        let picker = Picker::open(id, &catalog);
        let entry = picker.rows()[0][0];
        grid.commit(picker, entry).unwrap();
        let start = grid.board().slot(id).unwrap().position().unwrap();

        let _ = grid.update(GridMessage::PointerMoved(Point::new(180.0, 10.0)));
        let _ = grid.update(GridMessage::BeginDrag(id));
        let _ = grid.update(GridMessage::PointerMoved(Point::new(200.0, 30.0)));
        let _ = grid.update(GridMessage::PointerMoved(Point::new(190.0, 60.0)));
        let _ = grid.update(GridMessage::PointerReleased);
        let _ = grid.update(GridMessage::PointerMoved(Point::new(500.0, 500.0)));

        assert_eq!(
            grid.board().slot(id).unwrap().position(),
            Some(Point::new(start.x + 10.0, start.y + 50.0))
        );
    }

    #[test]
    fn items_past_any_edge_stay_whole_on_the_board() {
        let board = Size::new(528.0, 540.0);
        let inside = Point::new(100.0, 200.0);
        assert_eq!(draw_offset(inside, board, 20.0), inside);
        assert_eq!(
            draw_offset(Point::new(-30.0, -5.0), board, 20.0),
            Point::new(0.0, 0.0)
        );
        assert_eq!(
            draw_offset(Point::new(600.0, 539.0), board, 20.0),
            Point::new(508.0, 520.0)
        );
    }

    #[test]
    fn marker_slots_ignore_drags() {
        let mut grid = widget();
        let id = SlotId::new(Band::Right, 5, 2);
        let _ = grid.update(GridMessage::BeginDrag(id));
        let _ = grid.update(GridMessage::PointerMoved(Point::new(80.0, 80.0)));
        assert!(!grid.board().is_committed(id));
        assert_eq!(grid.board().slot(id).unwrap().position(), None);
    }
}

use tracing::{debug, trace};

use crate::{
    board::{BoardState, SlotId},
    geometry::Point,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    slot: SlotId,
    anchor: Point,
}

/// Turns pointer events into moves of committed slots.
///
/// Every step moves the slot by the distance from the previous pointer
/// position, so after any number of steps the slot has moved by exactly
/// `last - anchor`.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts dragging `slot` from `pointer`. Slots still showing the default
    /// marker cannot be dragged; for those this does nothing and returns
    /// `false`.
    pub fn begin(&mut self, board: &BoardState, slot: SlotId, pointer: Point) -> bool {
        if !board.is_committed(slot) {
            trace!(%slot, "ignoring drag on uncommitted slot");
            return false;
        }
        debug!(%slot, x = pointer.x, y = pointer.y, "drag started");
        self.session = Some(DragSession {
            slot,
            anchor: pointer,
        });
        true
    }

    /// Moves the dragged slot by `pointer - anchor` and re-anchors at
    /// `pointer`. Returns the slot's new position.
    pub fn continue_drag(&mut self, board: &mut BoardState, pointer: Point) -> Option<Point> {
        let session = self.session.as_mut()?;
        let delta = pointer - session.anchor;
        session.anchor = pointer;
        board.translate(session.slot, delta)
    }

    /// Ends the current drag, returning the slot that was being dragged.
    pub fn end(&mut self) -> Option<SlotId> {
        let session = self.session.take()?;
        debug!(slot = %session.slot, "drag ended");
        Some(session.slot)
    }

    pub fn active(&self) -> Option<SlotId> {
        self.session.map(|s| s.slot)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        board::{Band, build_board},
        layout::BoardLayout,
    };

    fn board_with_committed(id: SlotId, at: Point) -> BoardState {
        let mut board = build_board::<&str>(BoardLayout::default(), &["Kokiri Forest"]);
        board.commit(id, 0, at).unwrap();
        board
    }

    #[test]
    fn each_step_is_relative_to_the_previous_event() {
        let id = SlotId::new(Band::Left, 0, 0);
        let mut board = board_with_committed(id, Point::new(100.0, 100.0));
        let mut drag = DragController::new();

        assert!(drag.begin(&board, id, Point::new(10.0, 10.0)));
        assert_eq!(
            drag.continue_drag(&mut board, Point::new(15.0, 10.0)),
            Some(Point::new(105.0, 100.0))
        );
        assert_eq!(
            drag.continue_drag(&mut board, Point::new(20.0, 12.0)),
            Some(Point::new(110.0, 102.0))
        );
        // Holding still does not keep moving the slot.
        assert_eq!(
            drag.continue_drag(&mut board, Point::new(20.0, 12.0)),
            Some(Point::new(110.0, 102.0))
        );
        assert_eq!(drag.end(), Some(id));
        assert_eq!(drag.continue_drag(&mut board, Point::new(90.0, 90.0)), None);
        assert_eq!(board.slot(id).unwrap().position(), Some(Point::new(110.0, 102.0)));
    }

    #[test]
    fn drag_is_not_clamped_to_the_window() {
        let id = SlotId::new(Band::Right, 1, 1);
        let mut board = board_with_committed(id, Point::new(5.0, 5.0));
        let mut drag = DragController::new();

        drag.begin(&board, id, Point::new(50.0, 50.0));
        let moved = drag.continue_drag(&mut board, Point::new(-400.0, 5000.0));
        assert_eq!(moved, Some(Point::new(-445.0, 4955.0)));
    }

    #[test]
    fn uncommitted_slot_cannot_be_dragged() {
        let mut board = build_board::<&str>(BoardLayout::default(), &["Kokiri Forest"]);
        let id = SlotId::new(Band::Left, 0, 0);
        let mut drag = DragController::new();

        assert!(!drag.begin(&board, id, Point::new(1.0, 1.0)));
        assert_eq!(drag.active(), None);
        assert_eq!(drag.continue_drag(&mut board, Point::new(30.0, 30.0)), None);
        assert!(!board.is_committed(id));
    }

    fn pointer() -> impl Strategy<Value = Point> {
        (-2000i16..2000, -2000i16..2000).prop_map(|(x, y)| Point::new(x as f32, y as f32))
    }

    proptest! {
        #[test]
        fn final_position_telescopes(
            start in pointer(),
            anchor in pointer(),
            steps in prop::collection::vec(pointer(), 1..40),
        ) {
            let id = SlotId::new(Band::Left, 2, 3);
            let mut board = board_with_committed(id, start);
            let mut drag = DragController::new();

            prop_assert!(drag.begin(&board, id, anchor));
            for p in &steps {
                drag.continue_drag(&mut board, *p);
            }
            let last = *steps.last().unwrap();
            prop_assert_eq!(board.slot(id).unwrap().position(), Some(start + (last - anchor)));
        }

        #[test]
        fn uncommitted_slot_never_moves(
            anchor in pointer(),
            steps in prop::collection::vec(pointer(), 0..20),
            row in 0usize..18,
            column in 0usize..4,
        ) {
            let mut board = build_board::<&str>(BoardLayout::default(), &["Kokiri Forest"]);
            let id = SlotId::new(Band::Right, row, column);
            let mut drag = DragController::new();

            drag.begin(&board, id, anchor);
            for p in steps {
                drag.continue_drag(&mut board, p);
            }
            let slot = board.slot(id).unwrap();
            prop_assert!(!slot.is_committed());
            prop_assert_eq!(slot.position(), None);
        }
    }
}

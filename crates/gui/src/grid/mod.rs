use common::{board::SlotId, geometry::Point};

pub mod widget;

#[derive(Debug, Clone)]
pub enum GridMessage {
    OpenPicker(SlotId),
    BeginDrag(SlotId),
    PointerMoved(Point), // board coordinates
    PointerReleased,
}

use common::picker::PickerEntry;

pub mod widget;

#[derive(Debug, Clone)]
pub enum PickerMessage {
    Choose(PickerEntry),
    Dismiss,
}

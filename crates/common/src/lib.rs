//! Board model for the location tracker: grid layout, slot placement and
//! pointer dragging. Nothing in here depends on the UI toolkit.

pub mod board;
pub mod catalog;
pub mod drag;
pub mod geometry;
pub mod layout;
pub mod picker;

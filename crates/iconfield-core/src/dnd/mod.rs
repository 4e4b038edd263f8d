//! Drag and drop: action negotiation, the source and destination sessions
//! and edge autoscrolling.

pub mod action;
pub mod autoscroll;
pub mod session;
pub mod target;

pub use action::{DragAction, DragActions};

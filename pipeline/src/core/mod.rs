//! Core board logic
//!
//! Pure state transitions with no I/O: column partitioning, drop
//! resolution, optimistic application and exact rollback.

pub mod board;
pub mod drag;

pub use board::{Board, MoveSnapshot, Position};
pub use drag::{DragContext, DropTarget, Transition, resolve_drop};

//! # Taskboard Core
//!
//! Board state model and reorder/move engine for kanban task boards.
//!
//! The [`BoardStore`] owns the normalized board (ordered columns holding task
//! ids, tasks in one map) and exposes atomic mutations. The
//! [`DragInterpreter`] turns drag gestures into exactly one store call each.
//! [`BoardService`] wires both to a [`Storage`] backend without depending on
//! any UI.

pub mod domain;
pub mod drag;
pub mod error;
pub mod service;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use domain::{
    board::{Board, BoardConfig, Column, ColumnId, ColumnUpdate},
    task::{NewTask, Priority, Task, TaskId, TaskUpdate},
};
pub use drag::{resolve_drop, DragEntity, DragInterpreter, DragOutcome, DragState};
pub use error::{BoardError, ErrorKind, Result};
pub use service::BoardService;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{BoardCommand, BoardStore};

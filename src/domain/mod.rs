pub mod board;
pub mod filter;
pub mod task;

pub use board::{Board, BoardConfig, Column, ColumnId, ColumnSeed, ColumnUpdate, TaskSeed};
pub use filter::{filter_columns, filter_task_ids};
pub use task::{NewTask, Priority, Task, TaskId, TaskUpdate};

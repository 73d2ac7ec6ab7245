use crate::domain::{ColumnId, TaskId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Column not found: {0}")]
    ColumnNotFound(ColumnId),

    #[error("Task {task} is not in column {column}")]
    TaskNotInColumn { task: TaskId, column: ColumnId },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Board integrity violated: {0}")]
    Integrity(String),

    #[error("Board not initialized")]
    BoardNotInitialized,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Coarse classification of a [`BoardError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    OutOfRange,
    Integrity,
    Storage,
}

impl BoardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_) | Self::ColumnNotFound(_) | Self::TaskNotInColumn { .. } => {
                ErrorKind::NotFound
            }
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::BoardNotInitialized
            | Self::StorageError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorKind::Storage,
        }
    }
}

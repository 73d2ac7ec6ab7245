use crate::{domain::Board, error::Result};
use async_trait::async_trait;

pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// Storage trait for persisting board snapshots
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Saves the whole board snapshot
    async fn save_board(&self, board: &Board) -> Result<()>;

    /// Loads the last saved snapshot
    ///
    /// Fails with `BoardNotInitialized` when nothing has been saved yet.
    async fn load_board(&self) -> Result<Board>;

    /// Checks if a snapshot exists
    async fn is_initialized(&self) -> bool;
}

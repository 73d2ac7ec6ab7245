use crate::{
    domain::Board,
    error::{BoardError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage holding the last saved snapshot
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the service saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    snapshot: Arc<RwLock<Option<Board>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that already holds `board`
    pub fn with_board(board: Board) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(board))),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn save_board(&self, board: &Board) -> Result<()> {
        *self.snapshot.write().await = Some(board.clone());
        Ok(())
    }

    async fn load_board(&self) -> Result<Board> {
        self.snapshot
            .read()
            .await
            .clone()
            .ok_or(BoardError::BoardNotInitialized)
    }

    async fn is_initialized(&self) -> bool {
        self.snapshot.read().await.is_some()
    }
}

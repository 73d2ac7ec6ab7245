//! The board service ties a [`BoardStore`], a [`DragInterpreter`] and a
//! [`Storage`] backend together.
//!
//! It is created explicitly and handed to whatever drives the event loop.
//! Every successful mutation is followed by a best-effort save of the whole
//! snapshot; a failing backend only costs durability.

use crate::domain::{
    filter, Board, BoardConfig, Column, ColumnId, ColumnUpdate, NewTask, TaskId, TaskUpdate,
};
use crate::drag::{DragEntity, DragInterpreter, DragOutcome};
use crate::error::{BoardError, Result};
use crate::storage::Storage;
use crate::store::BoardStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct BoardService {
    store: BoardStore,
    drag: DragInterpreter,
    storage: Arc<dyn Storage>,
    /// Cleared when the saved snapshot could not be used; nothing is written back then
    durable: bool,
    search_term: String,
}

impl BoardService {
    /// Opens the last saved board, seeding the default board if there is none
    pub async fn open(storage: Arc<dyn Storage>) -> Self {
        Self::open_with_config(storage, &BoardConfig::default()).await
    }

    /// Opens the last saved board, seeding from `config` if there is none
    ///
    /// A seed is only saved when the backend holds no snapshot at all. A
    /// snapshot that cannot be read or fails the integrity check is left
    /// untouched; the service then runs on the seed purely in memory.
    pub async fn open_with_config(storage: Arc<dyn Storage>, config: &BoardConfig) -> Self {
        if let Err(err) = storage.initialize().await {
            warn!(error = %err, "failed to initialize storage");
        }

        let loaded = if storage.is_initialized().await {
            storage
                .load_board()
                .await
                .and_then(|board| board.check_integrity().map(|()| board))
        } else {
            Err(BoardError::BoardNotInitialized)
        };

        let (board, durable, seeded) = match loaded {
            Ok(board) => (board, true, false),
            Err(BoardError::BoardNotInitialized) => {
                info!("no saved board, seeding default");
                (Board::from_config(config), true, true)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    "saved board is unusable, leaving it untouched and running in memory"
                );
                (Board::from_config(config), false, false)
            }
        };

        let service = Self {
            store: BoardStore::new(board),
            drag: DragInterpreter::new(),
            storage,
            durable,
            search_term: String::new(),
        };
        if seeded {
            service.persist().await;
        }
        service
    }

    /// Whether mutations are written back to storage
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// The current board snapshot
    pub fn board(&self) -> Arc<Board> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn drag(&self) -> &DragInterpreter {
        &self.drag
    }

    async fn persist(&self) {
        if !self.durable {
            return;
        }
        if let Err(err) = self.storage.save_board(self.store.board()).await {
            warn!(error = %err, "failed to save board, continuing in memory");
        }
    }

    async fn saved<T>(&self, result: Result<T>) -> Result<T> {
        if result.is_ok() {
            self.persist().await;
        }
        result
    }

    pub async fn add_task(&mut self, column_id: &ColumnId, fields: NewTask) -> Result<TaskId> {
        let result = self.store.add_task(column_id, fields);
        self.saved(result).await
    }

    pub async fn update_task(&mut self, task_id: &TaskId, update: TaskUpdate) -> Result<()> {
        let result = self.store.update_task(task_id, update);
        self.saved(result).await
    }

    pub async fn delete_task(&mut self, task_id: &TaskId) -> Result<()> {
        let result = self.store.delete_task(task_id);
        self.saved(result).await
    }

    pub async fn add_column(&mut self, title: &str) -> Result<ColumnId> {
        let result = self.store.add_column(title);
        self.saved(result).await
    }

    pub async fn update_column(&mut self, column_id: &ColumnId, update: ColumnUpdate) -> Result<()> {
        let result = self.store.update_column(column_id, update);
        self.saved(result).await
    }

    pub async fn delete_column(&mut self, column_id: &ColumnId) -> Result<Vec<TaskId>> {
        let result = self.store.delete_column(column_id);
        self.saved(result).await
    }

    pub async fn move_task(
        &mut self,
        task_id: &TaskId,
        source: &ColumnId,
        destination: &ColumnId,
        destination_index: usize,
    ) -> Result<()> {
        let result = self
            .store
            .move_task(task_id, source, destination, destination_index);
        self.saved(result).await
    }

    pub async fn reorder_task_in_column(
        &mut self,
        column_id: &ColumnId,
        old_index: usize,
        new_index: usize,
    ) -> Result<()> {
        let result = self
            .store
            .reorder_task_in_column(column_id, old_index, new_index);
        self.saved(result).await
    }

    pub async fn reorder_column(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        let result = self.store.reorder_column(old_index, new_index);
        self.saved(result).await
    }

    /// Starts a drag of the entity with the given raw id
    ///
    /// Returns `false` when the id is unknown or a drag is already active.
    pub fn drag_start(&mut self, id: &str) -> bool {
        match DragEntity::classify(self.store.board(), id) {
            Some(entity) => self.drag.on_drag_start(entity),
            None => {
                debug!(id, "drag start on unknown id");
                false
            }
        }
    }

    pub fn drag_over(&mut self, active_id: &str, over_id: Option<&str>) -> Option<ColumnId> {
        let board = self.store.snapshot();
        let active = DragEntity::classify(&board, active_id)?;
        let over = over_id.and_then(|id| DragEntity::classify(&board, id));
        self.drag.on_drag_over(&board, &active, over.as_ref())
    }

    /// Completes a drag, saving the board if the drop changed it
    pub async fn drag_end(&mut self, active_id: &str, over_id: Option<&str>) -> DragOutcome {
        let board = self.store.snapshot();
        let Some(active) = DragEntity::classify(&board, active_id) else {
            self.drag.cancel();
            return DragOutcome::NoOp;
        };
        let over = over_id.and_then(|id| DragEntity::classify(&board, id));

        let outcome = self.drag.on_drag_end(&mut self.store, &active, over.as_ref());
        if !outcome.is_noop() {
            self.persist().await;
        }
        outcome
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Columns as they should be displayed under the current search term
    pub fn visible_columns(&self) -> Vec<Column> {
        filter::filter_columns(self.store.board(), &self.search_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragState;
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::store::BoardCommand;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Backend whose every call fails
    struct BrokenStorage;

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn initialize(&self) -> Result<()> {
            Err(BoardError::StorageError("offline".to_string()))
        }

        async fn save_board(&self, _board: &Board) -> Result<()> {
            Err(BoardError::StorageError("offline".to_string()))
        }

        async fn load_board(&self) -> Result<Board> {
            Err(BoardError::StorageError("offline".to_string()))
        }

        async fn is_initialized(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_open_seeds_and_persists() {
        let storage = MemoryStorage::new();
        let service = BoardService::open(Arc::new(storage.clone())).await;

        assert_eq!(service.board().columns.len(), 3);
        assert_eq!(service.board().tasks.len(), 5);
        assert_eq!(storage.load_board().await.unwrap(), *service.board());
    }

    #[tokio::test]
    async fn test_open_restores_saved_board() {
        let mut board = Board::from_config(&BoardConfig::default());
        board.columns.truncate(2);
        board.tasks.retain(|_, task| task.column_id.as_str() != "column-3");
        let storage = MemoryStorage::with_board(board.clone());

        let service = BoardService::open(Arc::new(storage)).await;
        assert_eq!(*service.board(), board);
    }

    #[tokio::test]
    async fn test_open_keeps_inconsistent_snapshot() {
        let mut board = Board::from_config(&BoardConfig::default());
        board.columns[0].task_ids.push(TaskId::from("task-ghost"));
        let storage = MemoryStorage::with_board(board.clone());

        let mut service = BoardService::open(Arc::new(storage.clone())).await;

        assert!(!service.is_durable());
        assert!(service.board().check_integrity().is_ok());
        assert_eq!(service.board().tasks.len(), 5);

        service.add_column("Later").await.unwrap();
        assert_eq!(storage.load_board().await.unwrap(), board);
    }

    #[tokio::test]
    async fn test_open_leaves_unreadable_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();
        let json = r#"{
        "columns": [
            { "id": "column-a", "title": "Mine", "taskIds": ["task-x"], "color": "gray.50" }
        ],
        "tasks": {
            "task-x": {
                "id": "task-x",
                "title": "Precious",
                "priority": "urgent",
                "columnId": "column-a"
            }
        }
    }"#;
        std::fs::write(storage.board_file(), json).unwrap();

        let mut service = BoardService::open(Arc::new(FileStorage::new(temp_dir.path()))).await;
        assert!(!service.is_durable());
        assert_eq!(service.board().tasks.len(), 5);

        service
            .delete_task(&TaskId::from("task-1"))
            .await
            .unwrap();
        assert!(service.drag_start("task-2"));
        assert!(!service.drag_end("task-2", Some("column-3")).await.is_noop());

        let on_disk = std::fs::read_to_string(storage.board_file()).unwrap();
        assert_eq!(on_disk, json);
    }

    #[tokio::test]
    async fn test_open_with_custom_config() {
        let service =
            BoardService::open_with_config(Arc::new(MemoryStorage::new()), &BoardConfig::empty())
                .await;

        assert!(service.board().columns.is_empty());
    }

    #[tokio::test]
    async fn test_mutations_are_saved() {
        let storage = MemoryStorage::new();
        let mut service = BoardService::open(Arc::new(storage.clone())).await;

        let column_id = service.add_column("Review").await.unwrap();
        let task_id = service
            .add_task(&column_id, NewTask::new("Check docs"))
            .await
            .unwrap();

        let saved = storage.load_board().await.unwrap();
        assert_eq!(saved.column(&column_id).unwrap().task_ids, vec![task_id]);
    }

    #[tokio::test]
    async fn test_failed_mutation_is_not_saved() {
        let storage = MemoryStorage::new();
        let mut service = BoardService::open(Arc::new(storage.clone())).await;

        let err = service.add_column("  ").await.unwrap_err();
        assert!(matches!(err, BoardError::InvalidInput(_)));
        assert_eq!(storage.load_board().await.unwrap().columns.len(), 3);
    }

    #[tokio::test]
    async fn test_broken_storage_degrades_to_memory() {
        let mut service = BoardService::open(Arc::new(BrokenStorage)).await;

        assert_eq!(service.board().tasks.len(), 5);
        service
            .delete_column(&ColumnId::from("column-1"))
            .await
            .unwrap();
        assert_eq!(service.board().tasks.len(), 3);
    }

    #[tokio::test]
    async fn test_drag_gesture_through_raw_ids() {
        let storage = MemoryStorage::new();
        let mut service = BoardService::open(Arc::new(storage.clone())).await;

        assert!(service.drag_start("task-1"));
        assert_eq!(
            service.drag_over("task-1", Some("task-5")),
            Some(ColumnId::from("column-3"))
        );
        let outcome = service.drag_end("task-1", Some("task-5")).await;

        assert_eq!(
            outcome,
            DragOutcome::Applied(BoardCommand::MoveTask {
                task_id: TaskId::from("task-1"),
                source: ColumnId::from("column-1"),
                destination: ColumnId::from("column-3"),
                destination_index: 0,
            })
        );
        assert_eq!(*service.drag().state(), DragState::Idle);

        let saved = storage.load_board().await.unwrap();
        assert_eq!(
            saved.column(&ColumnId::from("column-3")).unwrap().task_ids,
            vec![TaskId::from("task-1"), TaskId::from("task-5")]
        );
    }

    #[tokio::test]
    async fn test_drag_end_with_unknown_ids_is_noop() {
        let mut service = BoardService::open(Arc::new(MemoryStorage::new())).await;
        let before = service.board();

        assert!(!service.drag_start("task-ghost"));
        service.drag_start("task-2");
        assert!(service.drag_end("task-ghost", Some("column-2")).await.is_noop());
        assert!(!service.drag().is_dragging());

        service.drag_start("task-2");
        assert!(service.drag_end("task-2", Some("column-ghost")).await.is_noop());
        assert_eq!(service.board(), before);
    }

    #[tokio::test]
    async fn test_drag_end_requires_matching_start() {
        let storage = MemoryStorage::new();
        let mut service = BoardService::open(Arc::new(storage.clone())).await;
        let before = service.board();

        assert!(service.drag_end("task-1", Some("task-4")).await.is_noop());

        service.drag_start("column-1");
        assert!(service.drag_end("task-5", Some("column-1")).await.is_noop());

        assert_eq!(service.board(), before);
        assert_eq!(storage.load_board().await.unwrap(), *before);
    }

    #[tokio::test]
    async fn test_search_projection() {
        let mut service = BoardService::open(Arc::new(MemoryStorage::new())).await;

        service.set_search_term("NAVIGATION");
        assert_eq!(service.search_term(), "NAVIGATION");
        let columns = service.visible_columns();
        assert_eq!(columns[1].task_ids, vec![TaskId::from("task-4")]);
        assert!(columns[0].task_ids.is_empty());

        service.set_search_term("");
        assert_eq!(service.visible_columns()[0].task_ids.len(), 2);
        assert_eq!(service.board().tasks.len(), 5);
    }

    #[tokio::test]
    async fn test_file_backed_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut service = BoardService::open(Arc::new(FileStorage::new(temp_dir.path()))).await;
        service.reorder_column(2, 0).await.unwrap();
        service
            .update_task(
                &TaskId::from("task-2"),
                TaskUpdate::default().column(ColumnId::from("column-2")),
            )
            .await
            .unwrap();
        let expected = service.board();

        let reopened = BoardService::open(Arc::new(FileStorage::new(temp_dir.path()))).await;
        assert_eq!(reopened.board(), expected);
        assert_eq!(reopened.board().columns[0].id.as_str(), "column-3");
    }
}

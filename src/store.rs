//! Canonical board state and its atomic mutation operations.
//!
//! Every operation clones the published [`Board`], mutates the clone and only
//! publishes it once the whole change succeeded. A caller holding an older
//! snapshot keeps seeing exactly that snapshot.

use crate::domain::{Board, Column, ColumnId, ColumnUpdate, NewTask, Task, TaskId, TaskUpdate};
use crate::error::{BoardError, Result};
use std::sync::Arc;
use tracing::debug;

/// A structural change to task or column ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    MoveTask {
        task_id: TaskId,
        source: ColumnId,
        destination: ColumnId,
        destination_index: usize,
    },
    ReorderTask {
        column_id: ColumnId,
        old_index: usize,
        new_index: usize,
    },
    ReorderColumn {
        old_index: usize,
        new_index: usize,
    },
}

/// Owner of the canonical board
#[derive(Debug, Clone)]
pub struct BoardStore {
    board: Arc<Board>,
}

impl BoardStore {
    pub fn new(board: Board) -> Self {
        Self {
            board: Arc::new(board),
        }
    }

    /// The current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// A shared handle to the current snapshot
    pub fn snapshot(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    /// Runs `change` against a copy of the board and publishes it on success
    fn commit<T>(&mut self, change: impl FnOnce(&mut Board) -> Result<T>) -> Result<T> {
        let mut next = Board::clone(&self.board);
        let value = change(&mut next)?;
        self.board = Arc::new(next);
        Ok(value)
    }

    pub fn add_task(&mut self, column_id: &ColumnId, fields: NewTask) -> Result<TaskId> {
        require_title(&fields.title)?;

        let task_id = self.commit(|board| {
            let task_id = TaskId::generate();
            let column = board
                .column_mut(column_id)
                .ok_or_else(|| BoardError::ColumnNotFound(column_id.clone()))?;
            column.task_ids.push(task_id.clone());
            board.tasks.insert(
                task_id.clone(),
                Task::new(task_id.clone(), column_id.clone(), fields),
            );
            Ok(task_id)
        })?;

        debug!(task = %task_id, column = %column_id, "added task");
        Ok(task_id)
    }

    pub fn update_task(&mut self, task_id: &TaskId, update: TaskUpdate) -> Result<()> {
        if let Some(title) = &update.title {
            require_title(title)?;
        }

        self.commit(|board| {
            let current = board
                .task(task_id)
                .map(|task| task.column_id.clone())
                .ok_or_else(|| BoardError::TaskNotFound(task_id.clone()))?;

            if let Some(target) = update.column_id.as_ref().filter(|target| **target != current) {
                if board.column(target).is_none() {
                    return Err(BoardError::ColumnNotFound(target.clone()));
                }
                if let Some(column) = board.column_mut(&current) {
                    column.task_ids.retain(|id| id != task_id);
                }
                if let Some(column) = board.column_mut(target) {
                    column.task_ids.push(task_id.clone());
                }
            }

            if let Some(task) = board.tasks.get_mut(task_id) {
                task.apply_fields(&update);
                if let Some(target) = &update.column_id {
                    task.column_id = target.clone();
                }
            }
            Ok(())
        })?;

        debug!(task = %task_id, "updated task");
        Ok(())
    }

    pub fn delete_task(&mut self, task_id: &TaskId) -> Result<()> {
        self.commit(|board| {
            let task = board
                .tasks
                .remove(task_id)
                .ok_or_else(|| BoardError::TaskNotFound(task_id.clone()))?;
            if let Some(column) = board.column_mut(&task.column_id) {
                column.task_ids.retain(|id| id != task_id);
            }
            Ok(())
        })?;

        debug!(task = %task_id, "deleted task");
        Ok(())
    }

    pub fn add_column(&mut self, title: &str) -> Result<ColumnId> {
        require_title(title)?;

        let column_id = self.commit(|board| {
            let column_id = ColumnId::generate();
            board
                .columns
                .push(Column::new(column_id.clone(), title.trim().to_string()));
            Ok(column_id)
        })?;

        debug!(column = %column_id, "added column");
        Ok(column_id)
    }

    pub fn update_column(&mut self, column_id: &ColumnId, update: ColumnUpdate) -> Result<()> {
        if let Some(title) = &update.title {
            require_title(title)?;
        }

        self.commit(|board| {
            let column = board
                .column_mut(column_id)
                .ok_or_else(|| BoardError::ColumnNotFound(column_id.clone()))?;
            if let Some(title) = update.title {
                column.title = title.trim().to_string();
            }
            if let Some(color) = update.color {
                column.color = color;
            }
            Ok(())
        })?;

        debug!(column = %column_id, "updated column");
        Ok(())
    }

    /// Deletes a column together with every task it holds
    ///
    /// Returns the ids of the removed tasks.
    pub fn delete_column(&mut self, column_id: &ColumnId) -> Result<Vec<TaskId>> {
        let removed = self.commit(|board| {
            let index = board
                .column_index(column_id)
                .ok_or_else(|| BoardError::ColumnNotFound(column_id.clone()))?;
            let column = board.columns.remove(index);
            for task_id in &column.task_ids {
                board.tasks.remove(task_id);
            }
            Ok(column.task_ids)
        })?;

        debug!(column = %column_id, tasks = removed.len(), "deleted column");
        Ok(removed)
    }

    /// Moves a task into `destination` at `destination_index`
    ///
    /// The index is clamped to the destination list after the task has been
    /// removed from `source`, so `source == destination` acts as a reorder.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        source: &ColumnId,
        destination: &ColumnId,
        destination_index: usize,
    ) -> Result<()> {
        let inserted_at = self.commit(|board| {
            if board.column(destination).is_none() {
                return Err(BoardError::ColumnNotFound(destination.clone()));
            }
            if !board.tasks.contains_key(task_id) {
                return Err(BoardError::TaskNotFound(task_id.clone()));
            }

            let source_column = board
                .column_mut(source)
                .ok_or_else(|| BoardError::ColumnNotFound(source.clone()))?;
            let position = source_column
                .index_of(task_id)
                .ok_or_else(|| BoardError::TaskNotInColumn {
                    task: task_id.clone(),
                    column: source.clone(),
                })?;
            source_column.task_ids.remove(position);

            let mut inserted_at = destination_index;
            if let Some(column) = board.column_mut(destination) {
                inserted_at = destination_index.min(column.task_ids.len());
                column.task_ids.insert(inserted_at, task_id.clone());
            }
            if let Some(task) = board.tasks.get_mut(task_id) {
                task.column_id = destination.clone();
            }
            Ok(inserted_at)
        })?;

        debug!(
            task = %task_id,
            from = %source,
            to = %destination,
            index = inserted_at,
            "moved task"
        );
        Ok(())
    }

    /// Splice-style reorder of one column's task list
    pub fn reorder_task_in_column(
        &mut self,
        column_id: &ColumnId,
        old_index: usize,
        new_index: usize,
    ) -> Result<()> {
        self.commit(|board| {
            let column = board
                .column_mut(column_id)
                .ok_or_else(|| BoardError::ColumnNotFound(column_id.clone()))?;
            splice(&mut column.task_ids, old_index, new_index)
        })?;

        debug!(column = %column_id, old_index, new_index, "reordered task");
        Ok(())
    }

    /// Splice-style reorder of the board's columns
    pub fn reorder_column(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        self.commit(|board| splice(&mut board.columns, old_index, new_index))?;

        debug!(old_index, new_index, "reordered column");
        Ok(())
    }

    /// Applies a structural command through the matching operation
    pub fn apply(&mut self, command: &BoardCommand) -> Result<()> {
        match command {
            BoardCommand::MoveTask {
                task_id,
                source,
                destination,
                destination_index,
            } => self.move_task(task_id, source, destination, *destination_index),
            BoardCommand::ReorderTask {
                column_id,
                old_index,
                new_index,
            } => self.reorder_task_in_column(column_id, *old_index, *new_index),
            BoardCommand::ReorderColumn {
                old_index,
                new_index,
            } => self.reorder_column(*old_index, *new_index),
        }
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

fn require_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(BoardError::InvalidInput("title must not be empty".to_string()));
    }
    Ok(())
}

/// Removes the item at `old_index` and reinserts it at `new_index` of the
/// shortened list. Both indices must address an existing item.
fn splice<T>(items: &mut Vec<T>, old_index: usize, new_index: usize) -> Result<()> {
    let len = items.len();
    for index in [old_index, new_index] {
        if index >= len {
            return Err(BoardError::OutOfRange { index, len });
        }
    }
    let item = items.remove(old_index);
    items.insert(new_index, item);
    Ok(())
}

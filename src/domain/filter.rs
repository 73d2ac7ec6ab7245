use crate::domain::board::{Board, Column, ColumnId};
use crate::domain::task::{Task, TaskId};

/// Checks whether a task matches a search term
///
/// Matches when the term is a case-insensitive substring of the title or the
/// description. A blank term matches every task.
pub fn matches(task: &Task, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let term_lower = term.to_lowercase();

    let title_matches = task.title.to_lowercase().contains(&term_lower);
    let description_matches = task
        .description
        .as_ref()
        .map(|d| d.to_lowercase().contains(&term_lower))
        .unwrap_or(false);

    title_matches || description_matches
}

/// Task ids of a column that match the term, in column order
///
/// Returns an empty list for an unknown column.
pub fn filter_task_ids(board: &Board, column_id: &ColumnId, term: &str) -> Vec<TaskId> {
    board
        .column(column_id)
        .map(|column| visible_ids(board, column, term))
        .unwrap_or_default()
}

/// Projection of every column with its task list narrowed to matching tasks
pub fn filter_columns(board: &Board, term: &str) -> Vec<Column> {
    board
        .columns
        .iter()
        .map(|column| Column {
            task_ids: visible_ids(board, column, term),
            ..column.clone()
        })
        .collect()
}

fn visible_ids(board: &Board, column: &Column, term: &str) -> Vec<TaskId> {
    column
        .task_ids
        .iter()
        .filter(|id| board.task(id).map(|task| matches(task, term)).unwrap_or(false))
        .cloned()
        .collect()
}

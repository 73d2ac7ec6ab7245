use crate::domain::task::{NewTask, Priority, Task, TaskId};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a column (e.g., column-1, column-3f2c...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    const PREFIX: &'static str = "column-";

    /// Generates a fresh, globally unique column id
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Uuid::new_v4()))
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered lane of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub task_ids: Vec<TaskId>,
    pub color: String,
}

impl Column {
    pub const DEFAULT_COLOR: &'static str = "gray.50";

    pub fn new(id: ColumnId, title: String) -> Self {
        Self {
            id,
            title,
            task_ids: Vec::new(),
            color: Self::DEFAULT_COLOR.to_string(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Position of a task within this column
    pub fn index_of(&self, task_id: &TaskId) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }
}

/// Partial update of a column; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnUpdate {
    pub title: Option<String>,
    pub color: Option<String>,
}

impl ColumnUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Seed definition of a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSeed {
    pub id: ColumnId,
    pub title: String,
    pub color: String,
}

/// Seed definition of a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSeed {
    pub id: TaskId,
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
}

/// Board seed used when no saved snapshot exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub columns: Vec<ColumnSeed>,
    pub tasks: Vec<TaskSeed>,
}

impl BoardConfig {
    /// A config that seeds an empty board
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

fn column_seed(id: &str, title: &str, color: &str) -> ColumnSeed {
    ColumnSeed {
        id: ColumnId::from(id),
        title: title.to_string(),
        color: color.to_string(),
    }
}

fn task_seed(id: &str, column: &str, title: &str, description: &str, priority: Priority) -> TaskSeed {
    TaskSeed {
        id: TaskId::from(id),
        column_id: ColumnId::from(column),
        title: title.to_string(),
        description: Some(description.to_string()),
        priority,
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: vec![
                column_seed("column-1", "To Do", "gray.100"),
                column_seed("column-2", "In Progress", "blue.50"),
                column_seed("column-3", "Done", "green.50"),
            ],
            tasks: vec![
                task_seed(
                    "task-1",
                    "column-1",
                    "Research user needs",
                    "Conduct user interviews to understand pain points",
                    Priority::Medium,
                ),
                task_seed(
                    "task-2",
                    "column-1",
                    "Create wireframes",
                    "Design initial wireframes for the application",
                    Priority::High,
                ),
                task_seed(
                    "task-3",
                    "column-2",
                    "Develop landing page",
                    "Code the landing page based on approved design",
                    Priority::Low,
                ),
                task_seed(
                    "task-4",
                    "column-2",
                    "Test navigation",
                    "Ensure navigation works on all devices",
                    Priority::Medium,
                ),
                task_seed(
                    "task-5",
                    "column-3",
                    "Setup analytics",
                    "Implement analytics tracking to monitor user behavior",
                    Priority::Low,
                ),
            ],
        }
    }
}

/// Kanban board state: ordered columns plus a task arena keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<Column>,
    pub tasks: HashMap<TaskId, Task>,
}

impl Board {
    /// Builds a board from a seed. Tasks whose column is not seeded are skipped.
    pub fn from_config(config: &BoardConfig) -> Self {
        let mut board = Self {
            columns: config
                .columns
                .iter()
                .map(|seed| Column::new(seed.id.clone(), seed.title.clone()).with_color(&seed.color))
                .collect(),
            tasks: HashMap::new(),
        };

        for seed in &config.tasks {
            if board.tasks.contains_key(&seed.id) {
                continue;
            }
            let Some(column) = board.columns.iter_mut().find(|c| c.id == seed.column_id) else {
                continue;
            };
            column.task_ids.push(seed.id.clone());

            let mut fields = NewTask::new(seed.title.clone()).with_priority(seed.priority);
            fields.description = seed.description.clone();
            board.tasks.insert(
                seed.id.clone(),
                Task::new(seed.id.clone(), seed.column_id.clone(), fields),
            );
        }

        board
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub(crate) fn column_mut(&mut self, id: &ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| &c.id == id)
    }

    /// Position of a column within the board
    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    /// Verifies referential integrity between columns and tasks
    pub fn check_integrity(&self) -> Result<()> {
        let mut column_ids = HashSet::new();
        let mut placed: HashMap<&TaskId, &ColumnId> = HashMap::new();

        for column in &self.columns {
            if !column_ids.insert(&column.id) {
                return Err(BoardError::Integrity(format!(
                    "duplicate column id {}",
                    column.id
                )));
            }
            for task_id in &column.task_ids {
                let Some(task) = self.tasks.get(task_id) else {
                    return Err(BoardError::Integrity(format!(
                        "column {} lists unknown task {}",
                        column.id, task_id
                    )));
                };
                if let Some(previous) = placed.insert(task_id, &column.id) {
                    return Err(BoardError::Integrity(format!(
                        "task {} listed in both {} and {}",
                        task_id, previous, column.id
                    )));
                }
                if task.column_id != column.id {
                    return Err(BoardError::Integrity(format!(
                        "task {} listed in {} but belongs to {}",
                        task_id, column.id, task.column_id
                    )));
                }
            }
        }

        for (key, task) in &self.tasks {
            if &task.id != key {
                return Err(BoardError::Integrity(format!(
                    "task stored under {} has id {}",
                    key, task.id
                )));
            }
            if !placed.contains_key(key) {
                return Err(BoardError::Integrity(format!(
                    "task {} is not listed in any column",
                    key
                )));
            }
        }

        Ok(())
    }
}

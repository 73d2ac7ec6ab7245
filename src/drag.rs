//! Drag gesture interpretation.
//!
//! A gesture is reported as start, any number of overs, and one end. Only the
//! end mutates the board, through exactly one [`BoardStore`] call.

use crate::domain::{Board, ColumnId, TaskId};
use crate::store::{BoardCommand, BoardStore};
use tracing::{debug, warn};

/// Something the user can drag or drop onto
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DragEntity {
    Task(TaskId),
    Column(ColumnId),
}

impl DragEntity {
    /// Resolves a raw id reported by the pointer layer
    ///
    /// Task ids are looked up first, then column ids. Unknown ids resolve to `None`.
    pub fn classify(board: &Board, raw_id: &str) -> Option<Self> {
        let task_id = TaskId::from(raw_id);
        if board.tasks.contains_key(&task_id) {
            return Some(Self::Task(task_id));
        }
        let column_id = ColumnId::from(raw_id);
        board.column(&column_id).map(|_| Self::Column(column_id))
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Task(id) => id.as_str(),
            Self::Column(id) => id.as_str(),
        }
    }

    /// The column that holds this entity; a column is its own container
    pub fn container(&self, board: &Board) -> Option<ColumnId> {
        match self {
            Self::Task(id) => board.task(id).map(|task| task.column_id.clone()),
            Self::Column(id) => board.column(id).map(|column| column.id.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active: DragEntity,
        /// Container under the pointer when it differs from the active one
        hovered: Option<ColumnId>,
    },
}

/// Result of a completed gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Applied(BoardCommand),
    NoOp,
}

impl DragOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

/// Decides which store command a drop should produce
///
/// Returns `None` for cancelled gestures, drops that change nothing, and any
/// id that cannot be resolved against `board`.
pub fn resolve_drop(
    board: &Board,
    active: &DragEntity,
    over: Option<&DragEntity>,
) -> Option<BoardCommand> {
    let over = over?;

    match active {
        DragEntity::Task(task_id) => {
            let source = board.task(task_id)?.column_id.clone();
            board.column(&source)?;
            let destination = over.container(board)?;
            let target_column = board.column(&destination)?;

            if destination != source {
                let destination_index = match over {
                    DragEntity::Task(target) => target_column.index_of(target)?,
                    DragEntity::Column(_) => target_column.task_ids.len(),
                };
                return Some(BoardCommand::MoveTask {
                    task_id: task_id.clone(),
                    source,
                    destination,
                    destination_index,
                });
            }

            match over {
                DragEntity::Task(target) if target != task_id => Some(BoardCommand::ReorderTask {
                    old_index: target_column.index_of(task_id)?,
                    new_index: target_column.index_of(target)?,
                    column_id: destination,
                }),
                _ => None,
            }
        }
        DragEntity::Column(column_id) => match over {
            DragEntity::Column(target) if target != column_id => {
                Some(BoardCommand::ReorderColumn {
                    old_index: board.column_index(column_id)?,
                    new_index: board.column_index(target)?,
                })
            }
            _ => None,
        },
    }
}

/// State machine for one drag gesture at a time
#[derive(Debug, Default)]
pub struct DragInterpreter {
    state: DragState,
}

impl DragInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The entity being dragged, if any
    pub fn active(&self) -> Option<&DragEntity> {
        match &self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    pub fn hovered_container(&self) -> Option<&ColumnId> {
        match &self.state {
            DragState::Dragging { hovered, .. } => hovered.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Begins a gesture. Returns `false` if a gesture is already active.
    pub fn on_drag_start(&mut self, entity: DragEntity) -> bool {
        if let Some(active) = self.active() {
            debug!(active = active.id(), ignored = entity.id(), "drag already in progress");
            return false;
        }
        debug!(entity = entity.id(), "drag started");
        self.state = DragState::Dragging {
            active: entity,
            hovered: None,
        };
        true
    }

    /// Abandons the current gesture without touching the board
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }

    /// Tracks the container under the pointer. Never touches the board.
    pub fn on_drag_over(
        &mut self,
        board: &Board,
        active: &DragEntity,
        over: Option<&DragEntity>,
    ) -> Option<ColumnId> {
        let DragState::Dragging { hovered, .. } = &mut self.state else {
            return None;
        };

        *hovered = match (active, over) {
            (DragEntity::Task(_), Some(over)) => {
                let active_container = active.container(board);
                over.container(board)
                    .filter(|container| Some(container) != active_container.as_ref())
            }
            _ => None,
        };
        hovered.clone()
    }

    /// Completes a gesture, applying at most one store operation
    ///
    /// Only ends the gesture begun by [`Self::on_drag_start`]: while Idle, or
    /// when `active` is not the recorded entity, nothing is applied. The
    /// interpreter is back to [`DragState::Idle`] afterwards whatever the
    /// outcome. Store failures are logged and reported as [`DragOutcome::NoOp`].
    pub fn on_drag_end(
        &mut self,
        store: &mut BoardStore,
        active: &DragEntity,
        over: Option<&DragEntity>,
    ) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { active: recorded, .. } if recorded == *active => {}
            DragState::Dragging { active: recorded, .. } => {
                debug!(
                    recorded = recorded.id(),
                    reported = active.id(),
                    "drag end for a different entity"
                );
                return DragOutcome::NoOp;
            }
            DragState::Idle => {
                debug!(entity = active.id(), "drag end without a drag in progress");
                return DragOutcome::NoOp;
            }
        }

        let Some(command) = resolve_drop(store.board(), active, over) else {
            debug!(entity = active.id(), "drag ended without change");
            return DragOutcome::NoOp;
        };

        match store.apply(&command) {
            Ok(()) => DragOutcome::Applied(command),
            Err(err) => {
                warn!(entity = active.id(), error = %err, "drop rejected by board");
                DragOutcome::NoOp
            }
        }
    }
}

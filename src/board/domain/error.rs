//! Error types for board domain rules and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors raised by board domain rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A drag gesture is already active; only one may exist at a time.
    #[error("task {active} is already being dragged")]
    DragAlreadyActive {
        /// Task held by the active gesture.
        active: TaskId,
    },

    /// A drop or hover arrived while no drag gesture is active.
    #[error("no drag gesture is active")]
    NoActiveDrag,

    /// The referenced task is not on the board.
    #[error("task {0} is not on the board")]
    TaskNotOnBoard(TaskId),

    /// The task carries a status that maps to no column.
    #[error("task {0} has an unrecognised status and cannot be dragged")]
    TaskWithoutColumn(TaskId),

    /// A status mutation for the task has not resolved yet.
    #[error("a status change for task {0} is still in flight")]
    MutationInFlight(TaskId),

    /// The task is already in the requested column.
    #[error("task {task_id} is already in {status}")]
    AlreadyInColumn {
        /// Task identifier.
        task_id: TaskId,
        /// Column the task already occupies.
        status: TaskStatus,
    },
}

/// Error returned while parsing a task status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a task priority string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Error returned while parsing a bus event name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown board event: {0}")]
pub struct ParseBoardEventError(pub String);

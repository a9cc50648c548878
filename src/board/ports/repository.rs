//! Repository port for loading board tasks and persisting status changes.

use crate::board::domain::{BoardScope, Task, TaskFilters, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Repository answer to a status change request.
///
/// A response with `success == false` is a rejection; `message` then explains
/// why, when the repository says.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    /// Whether the change was accepted.
    pub success: bool,
    /// Updated record, when the repository returns one.
    pub task: Option<Task>,
    /// Human-readable explanation.
    pub message: Option<String>,
}

impl StatusUpdate {
    /// Creates an accepted response carrying the updated record.
    #[must_use]
    pub const fn accepted(task: Task) -> Self {
        Self {
            success: true,
            task: Some(task),
            message: None,
        }
    }

    /// Creates a rejected response.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            task: None,
            message: Some(message.into()),
        }
    }
}

/// Task source of truth consumed by the board.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns every task in `scope` that passes `filters`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError`] when the repository is unreachable or
    /// refuses the query.
    async fn fetch_tasks(
        &self,
        scope: &BoardScope,
        filters: &TaskFilters,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Changes the status of one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or another [`TaskRepositoryError`] when the request fails outright.
    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<StatusUpdate>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The repository refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The repository could not be reached or failed internally.
    #[error("repository unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a transport or backend error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

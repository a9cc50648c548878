//! Aggregate figures derived from the canonical task list.

use super::{Task, TaskStatus};
use serde::Serialize;

/// Board totals. Recomputed on every read, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStatistics {
    /// Tasks in the TODO column.
    pub todo: usize,
    /// Tasks in the IN_PROGRESS column.
    pub in_progress: usize,
    /// Tasks in the IN_REVIEW column.
    pub in_review: usize,
    /// Tasks in the COMPLETED column.
    pub completed: usize,
    /// Tasks whose status maps to no column.
    pub unplaced: usize,
    /// All tasks on the board, placed or not.
    pub total_tasks: usize,
    /// Sum of estimated hours across all tasks.
    pub total_estimated_hours: f64,
    /// Sum of estimated hours across completed tasks.
    pub completed_estimated_hours: f64,
    /// Sum of actual hours across all tasks.
    pub total_actual_hours: f64,
}

impl BoardStatistics {
    /// Computes statistics for a task list.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: TaskStatus| {
            tasks
                .iter()
                .filter(|task| task.status() == Some(status))
                .count()
        };
        Self {
            todo: count(TaskStatus::Todo),
            in_progress: count(TaskStatus::InProgress),
            in_review: count(TaskStatus::InReview),
            completed: count(TaskStatus::Completed),
            unplaced: tasks.iter().filter(|task| task.status().is_none()).count(),
            total_tasks: tasks.len(),
            total_estimated_hours: tasks.iter().map(Task::estimated_hours).sum(),
            completed_estimated_hours: tasks
                .iter()
                .filter(|task| task.status() == Some(TaskStatus::Completed))
                .map(Task::estimated_hours)
                .sum(),
            total_actual_hours: tasks.iter().map(Task::actual_hours).sum(),
        }
    }

    /// Returns the task count of one column.
    #[must_use]
    pub const fn count_for(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::InReview => self.in_review,
            TaskStatus::Completed => self.completed,
        }
    }
}

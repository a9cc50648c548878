//! Partitioning of the canonical task list into ordered status columns.
//!
//! Columns are views: they borrow tasks from the canonical list and are
//! rebuilt on every change instead of being mutated in place.

use super::{Task, TaskId, TaskStatus};
use std::cmp::Reverse;

/// Ordered view of the tasks sharing one status.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    status: TaskStatus,
    tasks: Vec<&'a Task>,
}

impl<'a> Column<'a> {
    /// Returns the status this column represents.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[&'a Task] {
        &self.tasks
    }

    /// Returns the number of tasks in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the column holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the task identifiers in display order.
    #[must_use]
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|task| task.id()).collect()
    }

    /// Returns the display position of a task within this column.
    #[must_use]
    pub fn position_of(&self, task_id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == task_id)
    }

    /// Returns `true` when the column holds the task.
    #[must_use]
    pub fn contains(&self, task_id: TaskId) -> bool {
        self.position_of(task_id).is_some()
    }
}

/// The four board columns in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns<'a> {
    todo: Column<'a>,
    in_progress: Column<'a>,
    in_review: Column<'a>,
    completed: Column<'a>,
}

impl<'a> Columns<'a> {
    /// Returns the column for a status.
    #[must_use]
    pub const fn get(&self, status: TaskStatus) -> &Column<'a> {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::InReview => &self.in_review,
            TaskStatus::Completed => &self.completed,
        }
    }

    /// Iterates columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Column<'a>> {
        [&self.todo, &self.in_progress, &self.in_review, &self.completed].into_iter()
    }

    /// Locates a task, returning its column status and position.
    #[must_use]
    pub fn locate(&self, task_id: TaskId) -> Option<(TaskStatus, usize)> {
        self.iter().find_map(|column| {
            column
                .position_of(task_id)
                .map(|position| (column.status(), position))
        })
    }

    /// Returns the total number of tasks placed in any column.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.iter().map(Column::len).sum()
    }
}

/// Splits tasks into the four status columns.
///
/// Within a column tasks are ordered by priority, most urgent first, with
/// absent priorities last; equal priorities are ordered by ascending id. Tasks
/// whose status is unrecognised are left out.
#[must_use]
pub fn partition(tasks: &[Task]) -> Columns<'_> {
    Columns {
        todo: build_column(tasks, TaskStatus::Todo),
        in_progress: build_column(tasks, TaskStatus::InProgress),
        in_review: build_column(tasks, TaskStatus::InReview),
        completed: build_column(tasks, TaskStatus::Completed),
    }
}

fn build_column(tasks: &[Task], status: TaskStatus) -> Column<'_> {
    let mut members: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.status() == Some(status))
        .collect();
    members.sort_by_key(|task| (Reverse(task.priority()), task.id()));
    Column {
        status,
        tasks: members,
    }
}

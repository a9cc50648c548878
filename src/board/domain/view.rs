//! Owned read model handed to renderers.

use super::{BoardStatistics, Columns, DragSlot, Task, TaskId, partition};

/// Point-in-time copy of the board, from which columns and statistics are
/// derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    tasks: Vec<Task>,
    drag: DragSlot,
    in_flight: Vec<TaskId>,
}

impl BoardView {
    /// Creates a view over a task list.
    #[must_use]
    pub fn new(tasks: Vec<Task>, drag: DragSlot, mut in_flight: Vec<TaskId>) -> Self {
        in_flight.sort_unstable();
        Self {
            tasks,
            drag,
            in_flight,
        }
    }

    /// Returns the canonical task list as captured.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Partitions the captured tasks into columns.
    #[must_use]
    pub fn columns(&self) -> Columns<'_> {
        partition(&self.tasks)
    }

    /// Computes board statistics.
    #[must_use]
    pub fn statistics(&self) -> BoardStatistics {
        BoardStatistics::from_tasks(&self.tasks)
    }

    /// Returns the drag gesture as captured.
    #[must_use]
    pub const fn drag(&self) -> &DragSlot {
        &self.drag
    }

    /// Returns the tasks whose status change has not resolved yet.
    #[must_use]
    pub fn in_flight(&self) -> &[TaskId] {
        &self.in_flight
    }

    /// Returns `true` when a status change for the task is unresolved.
    #[must_use]
    pub fn is_in_flight(&self, task_id: TaskId) -> bool {
        self.in_flight.binary_search(&task_id).is_ok()
    }
}

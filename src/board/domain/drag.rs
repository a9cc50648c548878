//! Pointer-driven drag gesture state machine.
//!
//! A gesture moves through `Idle → Dragging → {OverColumn | OverTask}` and
//! ends with a drop or a cancel, both of which return the slot to `Idle`.
//! Only one gesture exists at a time; the slot makes that explicit.

use super::{BoardDomainError, Task, TaskId, TaskStatus};

/// Ephemeral state of the active drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    task_id: TaskId,
    source_column: TaskStatus,
    target_column: Option<TaskStatus>,
    target_index: Option<usize>,
    is_over_column: bool,
    is_over_task: bool,
}

impl DragState {
    /// Returns the dragged task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the column the gesture started from.
    #[must_use]
    pub const fn source_column(&self) -> TaskStatus {
        self.source_column
    }

    /// Returns the column currently highlighted as drop target.
    #[must_use]
    pub const fn target_column(&self) -> Option<TaskStatus> {
        self.target_column
    }

    /// Returns the hovered position within the target column.
    #[must_use]
    pub const fn target_index(&self) -> Option<usize> {
        self.target_index
    }

    /// Returns `true` while the pointer is over a column body.
    #[must_use]
    pub const fn is_over_column(&self) -> bool {
        self.is_over_column
    }

    /// Returns `true` while the pointer is over another task.
    #[must_use]
    pub const fn is_over_task(&self) -> bool {
        self.is_over_task
    }
}

/// Observable phase of the drag machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// No gesture.
    Idle,
    /// A task is picked up but not over a valid target.
    Dragging,
    /// The pointer is over another column's body.
    OverColumn,
    /// The pointer is over another task.
    OverTask,
}

/// Where the pointer was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropLocation {
    /// Released over a column body.
    Column(TaskStatus),
    /// Released over a task card in the given column.
    Task {
        /// Task under the pointer.
        task_id: TaskId,
        /// Column holding that task.
        column: TaskStatus,
    },
    /// Released outside any column.
    Outside,
}

/// Resolution of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The task should move to another column.
    Move {
        /// Dragged task.
        task_id: TaskId,
        /// Column the gesture started from.
        from: TaskStatus,
        /// Column the task was dropped on.
        to: TaskStatus,
    },
    /// The task was dropped back onto its own column. Ordering within a
    /// column is not persisted, so the index is informational.
    SameColumn {
        /// Dragged task.
        task_id: TaskId,
        /// Column the task stays in.
        column: TaskStatus,
        /// Last hovered position, if any.
        target_index: Option<usize>,
    },
    /// The gesture ended without a drop target.
    Cancelled {
        /// Dragged task.
        task_id: TaskId,
    },
}

impl DropOutcome {
    /// Returns the task the gesture concerned.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        match self {
            Self::Move { task_id, .. }
            | Self::SameColumn { task_id, .. }
            | Self::Cancelled { task_id } => *task_id,
        }
    }
}

/// Holder of the single optional drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSlot {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture is in progress.
    Active(DragState),
}

impl DragSlot {
    /// Returns the active gesture, if any.
    #[must_use]
    pub const fn active(&self) -> Option<&DragState> {
        match self {
            Self::Idle => None,
            Self::Active(state) => Some(state),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        match self {
            Self::Idle => DragPhase::Idle,
            Self::Active(state) if state.is_over_task => DragPhase::OverTask,
            Self::Active(state) if state.is_over_column => DragPhase::OverColumn,
            Self::Active(_) => DragPhase::Dragging,
        }
    }

    /// Picks up a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DragAlreadyActive`] when a gesture is
    /// already in progress, or [`BoardDomainError::TaskWithoutColumn`] when
    /// the task has no board status.
    pub fn begin(&mut self, task: &Task) -> Result<(), BoardDomainError> {
        if let Self::Active(state) = self {
            return Err(BoardDomainError::DragAlreadyActive {
                active: state.task_id,
            });
        }
        let source_column = task
            .status()
            .ok_or(BoardDomainError::TaskWithoutColumn(task.id()))?;
        *self = Self::Active(DragState {
            task_id: task.id(),
            source_column,
            target_column: None,
            target_index: None,
            is_over_column: false,
            is_over_task: false,
        });
        Ok(())
    }

    /// Handles the pointer moving over a column body.
    ///
    /// `current_status` is the dragged task's status in the canonical list.
    /// Hovering the task's own column flags nothing. Returns `true` when the
    /// drop target changed.
    pub fn hover_column(&mut self, column: TaskStatus, current_status: TaskStatus) -> bool {
        let Self::Active(state) = self else {
            return false;
        };
        if column == current_status {
            return false;
        }
        let changed = state.target_column != Some(column) || !state.is_over_column;
        state.target_column = Some(column);
        state.target_index = None;
        state.is_over_column = true;
        state.is_over_task = false;
        changed
    }

    /// Handles the pointer moving over another task at `position` within
    /// `column`. Hovering the dragged task itself is ignored. Returns `true`
    /// when the drop target changed.
    pub fn hover_task(&mut self, over: TaskId, column: TaskStatus, position: usize) -> bool {
        let Self::Active(state) = self else {
            return false;
        };
        if over == state.task_id {
            return false;
        }
        let changed = state.target_column != Some(column)
            || state.target_index != Some(position)
            || !state.is_over_task;
        state.target_column = Some(column);
        state.target_index = Some(position);
        state.is_over_task = true;
        changed
    }

    /// Handles the pointer leaving a column. Clears the target when it was
    /// that column.
    pub fn leave_column(&mut self, column: TaskStatus) {
        let Self::Active(state) = self else {
            return;
        };
        if state.target_column == Some(column) {
            state.target_column = None;
            state.target_index = None;
            state.is_over_column = false;
            state.is_over_task = false;
        }
    }

    /// Ends the gesture at `location` and returns the slot to idle.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NoActiveDrag`] when no gesture is active.
    pub fn drop_at(&mut self, location: DropLocation) -> Result<DropOutcome, BoardDomainError> {
        let Self::Active(state) = std::mem::take(self) else {
            return Err(BoardDomainError::NoActiveDrag);
        };
        let to = match location {
            DropLocation::Column(column) | DropLocation::Task { column, .. } => column,
            DropLocation::Outside => {
                return Ok(DropOutcome::Cancelled {
                    task_id: state.task_id,
                });
            }
        };
        if to == state.source_column {
            return Ok(DropOutcome::SameColumn {
                task_id: state.task_id,
                column: to,
                target_index: state.target_index,
            });
        }
        Ok(DropOutcome::Move {
            task_id: state.task_id,
            from: state.source_column,
            to,
        })
    }

    /// Abandons the gesture, returning the cancellation when one was active.
    pub fn cancel(&mut self) -> Option<DropOutcome> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Active(state) => Some(DropOutcome::Cancelled {
                task_id: state.task_id,
            }),
        }
    }
}

//! Board controller: the entry point a UI shell drives.
//!
//! The controller owns the shared context, routes pointer events through the
//! drag machine, hands resolved drops to the mutation executor and runs the
//! refresh scheduler between activation and shutdown.

use super::{
    BoardContext, BoardError, BoardResult, MutationOutcome, OptimisticMutationExecutor,
    RefreshOrigin, RefreshOutcome, RefreshScheduler,
};
use crate::board::{
    config::BoardConfig,
    domain::{
        BoardDomainError, BoardScope, BoardStatistics, BoardView, DragPhase, DragState,
        DropLocation, DropOutcome, Notice, NoticeId, Task, TaskFilters, TaskId, TaskStatus,
        partition,
    },
    ports::{NotificationBus, TaskRepository},
};
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};

/// Result of a finished drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DropResult {
    /// The task was moved to another column and the change has settled.
    Moved(MutationOutcome),
    /// The task stayed in its column. Reordering is not persisted.
    Unchanged {
        /// Dragged task.
        task_id: TaskId,
        /// Column the task stays in.
        column: TaskStatus,
        /// Last hovered position, if any.
        target_index: Option<usize>,
    },
    /// The gesture ended without a target.
    Cancelled {
        /// Dragged task.
        task_id: TaskId,
    },
}

/// Orchestrates the canonical task list, drag gestures, optimistic moves and
/// refreshes for one board.
///
/// Dropping the controller shuts the board down.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mockable::DefaultClock;
/// use taskboard::board::{
///     adapters::memory::{InMemoryTaskRepository, InProcessNotificationBus},
///     config::BoardConfig,
///     domain::{BoardScope, ProjectId, Task, TaskId, TaskStatus},
///     services::BoardController,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let project = ProjectId::new(1);
/// let repository = InMemoryTaskRepository::new();
/// repository
///     .upsert(project, Task::new(TaskId::new(7), "Write docs", TaskStatus::Todo))
///     .expect("seed task");
///
/// let board = BoardController::new(
///     Arc::new(repository),
///     Arc::new(InProcessNotificationBus::default()),
///     Arc::new(DefaultClock),
///     BoardConfig::default(),
///     BoardScope::Project(project),
/// );
/// board.activate().await.expect("first activation");
/// let view = board.snapshot();
/// assert!(view.columns().get(TaskStatus::Todo).contains(TaskId::new(7)));
/// board.shutdown();
/// # }
/// ```
pub struct BoardController<R, B, C>
where
    R: TaskRepository + 'static,
    B: NotificationBus + 'static,
    C: Clock + Send + Sync + 'static,
{
    context: Arc<BoardContext<R, B, C>>,
    executor: OptimisticMutationExecutor<R, B, C>,
    scheduler: Mutex<Option<RefreshScheduler>>,
}

impl<R, B, C> BoardController<R, B, C>
where
    R: TaskRepository + 'static,
    B: NotificationBus + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an inactive-until-activated board over `scope`.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        bus: Arc<B>,
        clock: Arc<C>,
        config: BoardConfig,
        scope: BoardScope,
    ) -> Self {
        let context = Arc::new(BoardContext::new(repository, bus, clock, config, scope));
        Self {
            executor: OptimisticMutationExecutor::new(Arc::clone(&context)),
            context,
            scheduler: Mutex::new(None),
        }
    }

    /// Sets the initial filters. Takes effect from the first load.
    #[must_use]
    pub fn with_filters(self, filters: TaskFilters) -> Self {
        self.context.replace_filters(filters);
        self
    }

    /// Returns the shared context.
    #[must_use]
    pub const fn context(&self) -> &Arc<BoardContext<R, B, C>> {
        &self.context
    }

    /// Subscribes to the bus, loads the board and starts polling.
    ///
    /// A failed first load still activates the board; the failure is shown
    /// as a notice and the next trigger retries.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AlreadyActive`] on a second call and
    /// [`BoardError::Inactive`] after shutdown.
    pub async fn activate(&self) -> BoardResult<RefreshOutcome> {
        if !self.context.is_active() {
            return Err(BoardError::Inactive);
        }
        {
            let mut scheduler = self.lock_scheduler();
            if scheduler.is_some() {
                return Err(BoardError::AlreadyActive);
            }
            let events = self.context.bus().subscribe();
            *scheduler = Some(RefreshScheduler::start(&self.context, events));
        }
        tracing::info!(scope = %self.context.scope(), "board activated");
        Ok(self.context.refresh(RefreshOrigin::Initial).await)
    }

    /// Stops polling and bus refreshes and turns pending continuations into
    /// no-ops. Idempotent.
    pub fn shutdown(&self) {
        if let Some(scheduler) = self.lock_scheduler().as_mut() {
            scheduler.stop();
        }
        if self.context.is_active() {
            self.context.shut_down();
            tracing::info!(scope = %self.context.scope(), "board shut down");
        }
    }

    /// Returns `false` once the board has been shut down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.context.is_active()
    }

    /// Returns an owned read model for rendering.
    #[must_use]
    pub fn snapshot(&self) -> BoardView {
        self.context.view()
    }

    /// Returns a copy of the canonical task list.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.context.tasks()
    }

    /// Returns per-column counts and hour totals for the current list.
    #[must_use]
    pub fn statistics(&self) -> BoardStatistics {
        self.context
            .with_state(|state| BoardStatistics::from_tasks(&state.tasks))
    }

    /// Returns the ids of one column in display order.
    #[must_use]
    pub fn column_ids(&self, status: TaskStatus) -> Vec<TaskId> {
        self.context
            .with_state(|state| partition(&state.tasks).get(status).task_ids())
    }

    /// Returns the drag gesture, if one is active.
    #[must_use]
    pub fn drag_state(&self) -> Option<DragState> {
        self.context
            .with_state(|state| state.drag.active().cloned())
    }

    /// Returns the drag machine phase.
    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.context.with_state(|state| state.drag.phase())
    }

    /// Picks up a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Inactive`] after shutdown, or a domain error when
    /// a gesture is already active, the task is not on the board, it has no
    /// column, or a change for it is still in flight.
    pub fn begin_drag(&self, task_id: TaskId) -> BoardResult<()> {
        if !self.context.is_active() {
            return Err(BoardError::Inactive);
        }
        self.context.with_state(|state| -> BoardResult<()> {
            if state.in_flight.contains(&task_id) {
                return Err(BoardDomainError::MutationInFlight(task_id).into());
            }
            let task = state
                .task(task_id)
                .cloned()
                .ok_or(BoardDomainError::TaskNotOnBoard(task_id))?;
            state.drag.begin(&task)?;
            tracing::debug!(%task_id, "drag started");
            Ok(())
        })
    }

    /// Pointer over a column body. Returns `true` when the highlighted
    /// target changed.
    pub fn drag_over_column(&self, column: TaskStatus) -> bool {
        self.context.with_state(|state| {
            let Some(current) = state
                .drag
                .active()
                .and_then(|drag| state.task(drag.task_id()))
                .and_then(Task::status)
            else {
                return false;
            };
            state.drag.hover_column(column, current)
        })
    }

    /// Pointer over another task card. Returns `true` when the highlighted
    /// target changed.
    pub fn drag_over_task(&self, over: TaskId) -> bool {
        self.context.with_state(|state| {
            let Some((column, position)) = partition(&state.tasks).locate(over) else {
                return false;
            };
            state.drag.hover_task(over, column, position)
        })
    }

    /// Pointer left a column.
    pub fn drag_leave_column(&self, column: TaskStatus) {
        self.context
            .with_state(|state| state.drag.leave_column(column));
    }

    /// Pointer released over a column body.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when no gesture is active or the resulting move
    /// is refused before reaching the repository.
    pub async fn drop_on_column(&self, column: TaskStatus) -> BoardResult<DropResult> {
        self.finish_drag(DropLocation::Column(column)).await
    }

    /// Pointer released over a task card. The drop lands in that task's
    /// column; a card that has since left the board cancels the gesture.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when no gesture is active or the resulting move
    /// is refused before reaching the repository.
    pub async fn drop_on_task(&self, over: TaskId) -> BoardResult<DropResult> {
        let location = self.context.with_state(|state| {
            state
                .task(over)
                .and_then(Task::status)
                .map_or(DropLocation::Outside, |column| DropLocation::Task {
                    task_id: over,
                    column,
                })
        });
        self.finish_drag(location).await
    }

    /// Pointer released outside every column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when no gesture is active.
    pub fn release_outside(&self) -> BoardResult<DropResult> {
        let outcome = self
            .context
            .with_state(|state| state.drag.drop_at(DropLocation::Outside))?;
        tracing::debug!(task_id = %outcome.task_id(), "drag released outside the board");
        Ok(DropResult::Cancelled {
            task_id: outcome.task_id(),
        })
    }

    /// Abandons the active gesture, if any.
    pub fn cancel_drag(&self) -> Option<TaskId> {
        let cancelled = self.context.with_state(|state| state.drag.cancel());
        cancelled.map(|outcome| {
            tracing::debug!(task_id = %outcome.task_id(), "drag cancelled");
            outcome.task_id()
        })
    }

    /// Moves a task without a gesture, e.g. from a keyboard shortcut.
    ///
    /// # Errors
    ///
    /// See [`OptimisticMutationExecutor::apply`].
    pub async fn move_task(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> BoardResult<MutationOutcome> {
        self.executor.apply(task_id, status).await
    }

    /// Fetches immediately, bypassing the poll timer and bus debounce.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        self.context.refresh(RefreshOrigin::Manual).await
    }

    /// Replaces the filters and reloads.
    pub async fn set_filters(&self, filters: TaskFilters) -> RefreshOutcome {
        self.context.replace_filters(filters);
        self.context.refresh(RefreshOrigin::FilterChange).await
    }

    /// Returns the active filters.
    #[must_use]
    pub fn filters(&self) -> TaskFilters {
        self.context.filters()
    }

    /// Returns the undismissed notices, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.context.notices()
    }

    /// Dismisses a notice. Returns `false` when it was not shown.
    pub fn dismiss_notice(&self, id: NoticeId) -> bool {
        self.context.dismiss_notice(id)
    }

    async fn finish_drag(&self, location: DropLocation) -> BoardResult<DropResult> {
        let outcome = self
            .context
            .with_state(|state| state.drag.drop_at(location))?;
        match outcome {
            DropOutcome::Move { task_id, from, to } => {
                let current = self
                    .context
                    .with_state(|state| state.task(task_id).map(Task::status));
                match current {
                    None => {
                        tracing::debug!(%task_id, "dragged task left the board, cancelling");
                        Ok(DropResult::Cancelled { task_id })
                    }
                    Some(Some(status)) if status == to => {
                        tracing::debug!(%task_id, column = %to, "task already in drop column");
                        Ok(DropResult::Unchanged {
                            task_id,
                            column: to,
                            target_index: None,
                        })
                    }
                    Some(_) => {
                        tracing::debug!(%task_id, %from, %to, "drop resolved to a move");
                        Ok(DropResult::Moved(self.executor.apply(task_id, to).await?))
                    }
                }
            }
            DropOutcome::SameColumn {
                task_id,
                column,
                target_index,
            } => {
                tracing::debug!(%task_id, %column, ?target_index, "same-column drop, nothing to persist");
                Ok(DropResult::Unchanged {
                    task_id,
                    column,
                    target_index,
                })
            }
            DropOutcome::Cancelled { task_id } => Ok(DropResult::Cancelled { task_id }),
        }
    }

    fn lock_scheduler(&self) -> std::sync::MutexGuard<'_, Option<RefreshScheduler>> {
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R, B, C> Drop for BoardController<R, B, C>
where
    R: TaskRepository + 'static,
    B: NotificationBus + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

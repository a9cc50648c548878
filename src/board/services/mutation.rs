//! Optimistic status changes with authoritative reload or rollback.

use super::{BoardContext, BoardError, BoardResult, RefreshOrigin};
use crate::board::{
    domain::{BoardEvent, Notice, NoticeId, Task, TaskId, TaskStatus},
    ports::{NotificationBus, StatusUpdate, TaskRepository},
};
use mockable::Clock;
use std::sync::Arc;

/// How an optimistic move settled.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The repository accepted the change.
    Committed {
        /// Moved task.
        task_id: TaskId,
        /// New status.
        status: TaskStatus,
        /// Record returned by the repository. Informational only; the board
        /// reloads the authoritative list after a short delay.
        record: Option<Task>,
    },
    /// The repository refused or failed; the list was restored.
    RolledBack {
        /// Task that was moved back.
        task_id: TaskId,
        /// Column the move targeted.
        attempted: TaskStatus,
        /// Notice shown to the user.
        notice: NoticeId,
    },
    /// The board shut down before the repository answered; nothing was
    /// applied locally.
    Detached {
        /// Task whose change was in flight.
        task_id: TaskId,
    },
}

/// Releases the in-flight lock for a task however the mutation ends,
/// including when the caller drops the future mid-request.
struct InFlightGuard<'a, R, B, C>
where
    R: TaskRepository,
    B: NotificationBus,
    C: Clock + Send + Sync,
{
    context: &'a BoardContext<R, B, C>,
    task_id: TaskId,
}

impl<R, B, C> Drop for InFlightGuard<'_, R, B, C>
where
    R: TaskRepository,
    B: NotificationBus,
    C: Clock + Send + Sync,
{
    fn drop(&mut self) {
        let task_id = self.task_id;
        self.context.with_state(|state| state.in_flight.remove(&task_id));
    }
}

/// Applies a status change locally, persists it, then commits or rolls back.
pub struct OptimisticMutationExecutor<R, B, C>
where
    R: TaskRepository + 'static,
    B: NotificationBus + 'static,
    C: Clock + Send + Sync + 'static,
{
    context: Arc<BoardContext<R, B, C>>,
}

impl<R, B, C> Clone for OptimisticMutationExecutor<R, B, C>
where
    R: TaskRepository + 'static,
    B: NotificationBus + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
        }
    }
}

impl<R, B, C> OptimisticMutationExecutor<R, B, C>
where
    R: TaskRepository + 'static,
    B: NotificationBus + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an executor over a board context.
    #[must_use]
    pub const fn new(context: Arc<BoardContext<R, B, C>>) -> Self {
        Self { context }
    }

    /// Moves a task to `new_status`.
    ///
    /// The canonical list shows the move immediately. On acceptance a
    /// `task:updated` event is published and a reload is scheduled after
    /// [`BoardConfig::post_mutation_refresh_delay`]. On refusal or failure
    /// the task's pre-move record is put back and a notice is raised. Moves
    /// of other tasks are not touched by a rollback.
    ///
    /// [`BoardConfig::post_mutation_refresh_delay`]: crate::board::config::BoardConfig::post_mutation_refresh_delay
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Inactive`] after shutdown, or
    /// [`BoardError::Domain`] when the task is not on the board, is already
    /// in `new_status`, or has a change in flight. No repository call is made
    /// in those cases.
    pub async fn apply(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> BoardResult<MutationOutcome> {
        if !self.context.is_active() {
            return Err(BoardError::Inactive);
        }
        let pending = self
            .context
            .with_state(|state| state.begin_mutation(task_id, new_status))?;
        let _guard = InFlightGuard {
            context: &*self.context,
            task_id,
        };
        tracing::debug!(%task_id, from = ?pending.from, to = %new_status, "optimistic move applied");

        let response = self
            .context
            .repository()
            .update_task_status(task_id, new_status)
            .await;

        if !self.context.is_active() {
            tracing::debug!(%task_id, "status change settled after shutdown, ignoring");
            return Ok(MutationOutcome::Detached { task_id });
        }

        let reason = match response {
            Ok(StatusUpdate {
                success: true,
                task: record,
                ..
            }) => {
                self.commit(task_id, new_status);
                return Ok(MutationOutcome::Committed {
                    task_id,
                    status: new_status,
                    record,
                });
            }
            Ok(StatusUpdate { message, .. }) => message,
            Err(error) => Some(error.to_string()),
        };

        let clock = self.context.clock();
        let previous = pending.previous;
        let title = previous.title().to_owned();
        let notice = self.context.with_state(|state| {
            state.restore(previous);
            state.raise(|id| {
                Notice::mutation_failed(
                    id,
                    task_id,
                    &title,
                    new_status,
                    reason.as_deref(),
                    clock,
                )
            })
        });
        tracing::warn!(
            %task_id,
            attempted = %new_status,
            reason = reason.as_deref().unwrap_or("unspecified"),
            "status change rejected, rolled back"
        );
        Ok(MutationOutcome::RolledBack {
            task_id,
            attempted: new_status,
            notice,
        })
    }

    fn commit(&self, task_id: TaskId, status: TaskStatus) {
        tracing::info!(%task_id, %status, "status change committed");
        self.context.bus().publish(BoardEvent::task_updated(task_id));
        self.schedule_reload();
    }

    /// Reloads the authoritative list once server-side fields have settled.
    fn schedule_reload(&self) {
        let context = Arc::clone(&self.context);
        let delay = context.config().post_mutation_refresh_delay;
        let shutdown = context.shutdown_token().clone();
        tokio::spawn(async move {
            tokio::select! {
                () = shutdown.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    context.refresh(RefreshOrigin::PostMutation).await;
                }
            }
        });
    }
}

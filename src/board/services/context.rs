//! Shared board state and the fetch operation every refresh trigger feeds.

use crate::board::{
    config::BoardConfig,
    domain::{
        BoardDomainError, BoardScope, BoardView, DragSlot, Notice, NoticeId, Task, TaskFilters,
        TaskId, TaskStatus,
    },
    ports::{NotificationBus, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

/// What asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshOrigin {
    /// First load on activation.
    Initial,
    /// Periodic poll.
    Poll,
    /// Debounced bus event.
    Bus,
    /// Explicit user request.
    Manual,
    /// Authoritative reload after a committed move.
    PostMutation,
    /// The filters changed.
    FilterChange,
}

impl fmt::Display for RefreshOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initial => "initial",
            Self::Poll => "poll",
            Self::Bus => "bus",
            Self::Manual => "manual",
            Self::PostMutation => "post_mutation",
            Self::FilterChange => "filter_change",
        };
        f.write_str(name)
    }
}

/// Result of one refresh.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The response replaced the canonical list.
    Applied {
        /// Number of tasks received.
        task_count: usize,
    },
    /// A newer response had already been applied, so this one was dropped.
    Discarded,
    /// The fetch failed; the list was kept and a notice raised.
    Failed(TaskRepositoryError),
    /// The board was shut down; nothing changed.
    Inactive,
}

impl RefreshOutcome {
    /// Returns `true` when the canonical list was replaced.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A status rewrite that has been applied locally but not yet confirmed.
#[derive(Debug, Clone)]
pub(crate) struct PendingMutation {
    pub(crate) previous: Task,
    pub(crate) from: Option<TaskStatus>,
}

/// Mutable board state guarded by the context mutex.
#[derive(Debug, Default)]
pub(crate) struct BoardState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) drag: DragSlot,
    pub(crate) in_flight: HashSet<TaskId>,
    pub(crate) filters: TaskFilters,
    notices: Vec<Notice>,
    next_notice: u64,
    issued_fetches: u64,
    applied_fetch: u64,
}

impl BoardState {
    pub(crate) fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Raises a notice built around a freshly allocated identifier.
    pub(crate) fn raise(&mut self, build: impl FnOnce(NoticeId) -> Notice) -> NoticeId {
        self.next_notice += 1;
        let id = NoticeId::new(self.next_notice);
        self.notices.push(build(id));
        id
    }

    /// Keeps the task's pre-move record, rewrites its status and takes the
    /// in-flight lock for it.
    pub(crate) fn begin_mutation(
        &mut self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<PendingMutation, BoardDomainError> {
        if self.in_flight.contains(&task_id) {
            return Err(BoardDomainError::MutationInFlight(task_id));
        }
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or(BoardDomainError::TaskNotOnBoard(task_id))?;
        let from = task.status();
        if from == Some(status) {
            return Err(BoardDomainError::AlreadyInColumn { task_id, status });
        }
        let previous = task.clone();
        task.set_status(status);
        self.in_flight.insert(task_id);
        Ok(PendingMutation { previous, from })
    }

    /// Puts a task's pre-move record back into the current list.
    ///
    /// Other tasks are left alone so that concurrent moves keep their own
    /// state. A task that a refresh removed meanwhile stays removed.
    pub(crate) fn restore(&mut self, previous: Task) {
        let task_id = previous.id();
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id() == task_id) {
            *slot = previous;
        }
    }

    fn view(&self) -> BoardView {
        BoardView::new(
            self.tasks.clone(),
            self.drag.clone(),
            self.in_flight.iter().copied().collect(),
        )
    }
}

/// Canonical task list, collaborators and lifecycle token shared by the
/// controller, the mutation executor and the refresh scheduler.
pub struct BoardContext<R, B, C>
where
    R: TaskRepository,
    B: NotificationBus,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    bus: Arc<B>,
    clock: Arc<C>,
    config: BoardConfig,
    scope: BoardScope,
    state: Mutex<BoardState>,
    shutdown: CancellationToken,
}

impl<R, B, C> BoardContext<R, B, C>
where
    R: TaskRepository,
    B: NotificationBus,
    C: Clock + Send + Sync,
{
    /// Creates an active context with an empty task list.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        bus: Arc<B>,
        clock: Arc<C>,
        config: BoardConfig,
        scope: BoardScope,
    ) -> Self {
        Self {
            repository,
            bus,
            clock,
            config,
            scope,
            state: Mutex::new(BoardState::default()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Runs `f` with exclusive access to the board state.
    ///
    /// The lock is never held across an await point; a panic inside an
    /// earlier critical section does not wedge the board.
    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&mut BoardState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Returns the task repository.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns the notification bus.
    #[must_use]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Returns the wall clock used for notices.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the board configuration.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Returns the fetch scope.
    #[must_use]
    pub const fn scope(&self) -> &BoardScope {
        &self.scope
    }

    /// Returns the token cancelled on shutdown.
    #[must_use]
    pub const fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Returns `false` once the board has been shut down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    /// Shuts the board down. Idempotent.
    pub fn shut_down(&self) {
        self.shutdown.cancel();
    }

    /// Returns a copy of the canonical task list.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.with_state(|state| state.tasks.clone())
    }

    /// Returns an owned read model of the board.
    #[must_use]
    pub fn view(&self) -> BoardView {
        self.with_state(|state| state.view())
    }

    /// Returns the active filters.
    #[must_use]
    pub fn filters(&self) -> TaskFilters {
        self.with_state(|state| state.filters.clone())
    }

    /// Replaces the active filters without refreshing.
    pub fn replace_filters(&self, filters: TaskFilters) {
        self.with_state(|state| state.filters = filters);
    }

    /// Returns the undismissed notices, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.with_state(|state| state.notices.clone())
    }

    /// Dismisses a notice. Returns `false` when no such notice is shown.
    pub fn dismiss_notice(&self, id: NoticeId) -> bool {
        self.with_state(|state| {
            let before = state.notices.len();
            state.notices.retain(|notice| notice.id() != id);
            state.notices.len() != before
        })
    }

    /// Fetches the scope and replaces the canonical list with the response.
    ///
    /// Failures keep the current list and raise a fetch notice. Unless
    /// [`BoardConfig::discard_stale_fetches`] is set, whichever fetch
    /// completes last wins regardless of issue order.
    pub async fn refresh(&self, origin: RefreshOrigin) -> RefreshOutcome {
        if !self.is_active() {
            return RefreshOutcome::Inactive;
        }
        let (sequence, filters) = self.with_state(|state| {
            state.issued_fetches += 1;
            (state.issued_fetches, state.filters.clone())
        });
        tracing::debug!(%origin, sequence, scope = %self.scope, "fetching tasks");

        let result = self.repository.fetch_tasks(&self.scope, &filters).await;
        if !self.is_active() {
            tracing::debug!(%origin, sequence, "fetch completed after shutdown, ignoring");
            return RefreshOutcome::Inactive;
        }

        match result {
            Ok(tasks) => self.with_state(|state| {
                if self.config.discard_stale_fetches && sequence < state.applied_fetch {
                    tracing::warn!(
                        %origin,
                        sequence,
                        applied = state.applied_fetch,
                        "discarding stale fetch response"
                    );
                    return RefreshOutcome::Discarded;
                }
                let task_count = tasks.len();
                state.tasks = tasks;
                state.applied_fetch = state.applied_fetch.max(sequence);
                tracing::debug!(%origin, sequence, task_count, "task list replaced");
                RefreshOutcome::Applied { task_count }
            }),
            Err(error) => {
                tracing::warn!(%origin, sequence, %error, "task fetch failed, keeping last list");
                let message = error.to_string();
                self.with_state(|state| {
                    state.raise(|id| Notice::fetch_failed(id, &message, &*self.clock));
                });
                RefreshOutcome::Failed(error)
            }
        }
    }
}

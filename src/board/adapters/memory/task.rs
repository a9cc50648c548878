//! In-memory task repository for board tests and embedding.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::board::{
    domain::{BoardScope, ProjectId, Task, TaskFilters, TaskId, TaskStatus},
    ports::{StatusUpdate, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Scripted failure for status updates.
#[derive(Debug, Clone)]
pub enum UpdateFailure {
    /// Answer with `success == false` and an optional message.
    Rejected(Option<String>),
    /// Fail the request outright.
    Error(TaskRepositoryError),
}

/// Thread-safe in-memory task repository.
///
/// Fetches read the store when the call is made and deliver the result after
/// any queued latency, which makes overlapping fetch races reproducible.
#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
    fetch_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    projects: HashMap<TaskId, ProjectId>,
    fetch_failure: Option<TaskRepositoryError>,
    update_failure: Option<UpdateFailure>,
    fetch_latencies: VecDeque<Duration>,
    update_latencies: VecDeque<Duration>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps `updated_at` on every accepted status change using `clock`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    fn write(&self) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })
    }

    fn read(&self) -> TaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })
    }

    /// Inserts or replaces a task belonging to `project`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the store lock is
    /// poisoned.
    pub fn upsert(&self, project: ProjectId, task: Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.projects.insert(task.id(), project);
        state.tasks.insert(task.id(), task);
        Ok(())
    }

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub fn remove(&self, task_id: TaskId) -> TaskRepositoryResult<Task> {
        let mut state = self.write()?;
        state.projects.remove(&task_id);
        state
            .tasks
            .remove(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))
    }

    /// Returns the stored record of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the store lock is
    /// poisoned.
    pub fn task(&self, task_id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&task_id).cloned())
    }

    /// Makes every following fetch fail with `error`, or succeed again with
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the store lock is
    /// poisoned.
    pub fn set_fetch_failure(&self, error: Option<TaskRepositoryError>) -> TaskRepositoryResult<()> {
        self.write()?.fetch_failure = error;
        Ok(())
    }

    /// Makes every following status update fail, or succeed again with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the store lock is
    /// poisoned.
    pub fn set_update_failure(&self, failure: Option<UpdateFailure>) -> TaskRepositoryResult<()> {
        self.write()?.update_failure = failure;
        Ok(())
    }

    /// Delays delivery of the next fetch result by `latency`. Queued
    /// latencies are consumed one per fetch, in order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the store lock is
    /// poisoned.
    pub fn queue_fetch_latency(&self, latency: Duration) -> TaskRepositoryResult<()> {
        self.write()?.fetch_latencies.push_back(latency);
        Ok(())
    }

    /// Delays the next status update by `latency` before it touches the
    /// store. Queued latencies are consumed one per update, in order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the store lock is
    /// poisoned.
    pub fn queue_update_latency(&self, latency: Duration) -> TaskRepositoryResult<()> {
        self.write()?.update_latencies.push_back(latency);
        Ok(())
    }

    /// Returns how many fetches have been requested.
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Returns how many status updates have been requested.
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

fn in_scope(state: &InMemoryTaskState, scope: &BoardScope, task: &Task) -> bool {
    match scope {
        BoardScope::Project(project) => state.projects.get(&task.id()) == Some(project),
        BoardScope::Sprint(sprint) => task
            .user_story()
            .and_then(|story| story.sprint.as_ref())
            .is_some_and(|planned| planned.id == *sprint),
        BoardScope::Story(story) => task.user_story().is_some_and(|parent| parent.id == *story),
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn fetch_tasks(
        &self,
        scope: &BoardScope,
        filters: &TaskFilters,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let (result, latency) = {
            let mut state = self.write()?;
            let latency = state.fetch_latencies.pop_front();
            let result = match &state.fetch_failure {
                Some(error) => Err(error.clone()),
                None => Ok(state
                    .tasks
                    .values()
                    .filter(|task| in_scope(&state, scope, task) && filters.matches(task))
                    .cloned()
                    .collect()),
            };
            (result, latency)
        };
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<StatusUpdate> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.write()?.update_latencies.pop_front();
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.write()?;
        match &state.update_failure {
            Some(UpdateFailure::Rejected(message)) => {
                return Ok(StatusUpdate {
                    success: false,
                    task: None,
                    message: message.clone(),
                });
            }
            Some(UpdateFailure::Error(error)) => return Err(error.clone()),
            None => {}
        }
        let task = state
            .tasks
            .get_mut(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        task.set_status(status);
        if let Some(clock) = &self.clock {
            task.stamp(clock.utc());
        }
        Ok(StatusUpdate::accepted(task.clone()))
    }
}

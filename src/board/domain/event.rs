//! Lifecycle events carried on the notification bus.

use super::{ParseBoardEventError, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named lifecycle event kinds shared across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardEventKind {
    /// A task was created.
    #[serde(rename = "task:created")]
    TaskCreated,
    /// A task was updated.
    #[serde(rename = "task:updated")]
    TaskUpdated,
    /// A sprint was created.
    #[serde(rename = "sprint:created")]
    SprintCreated,
    /// A sprint was updated.
    #[serde(rename = "sprint:updated")]
    SprintUpdated,
    /// A user story was created.
    #[serde(rename = "userStory:created")]
    StoryCreated,
    /// A user story was updated.
    #[serde(rename = "userStory:updated")]
    StoryUpdated,
}

impl BoardEventKind {
    /// Every event kind the board listens to by default.
    pub const ALL: [Self; 6] = [
        Self::TaskCreated,
        Self::TaskUpdated,
        Self::SprintCreated,
        Self::SprintUpdated,
        Self::StoryCreated,
        Self::StoryUpdated,
    ];

    /// Returns the bus event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task:created",
            Self::TaskUpdated => "task:updated",
            Self::SprintCreated => "sprint:created",
            Self::SprintUpdated => "sprint:updated",
            Self::StoryCreated => "userStory:created",
            Self::StoryUpdated => "userStory:updated",
        }
    }
}

impl TryFrom<&str> for BoardEventKind {
    type Error = ParseBoardEventError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
            .ok_or_else(|| ParseBoardEventError(value.to_owned()))
    }
}

impl fmt::Display for BoardEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event published on the bus. The only payload is an optional task reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEvent {
    /// Event kind.
    pub kind: BoardEventKind,
    /// Task the event concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
}

impl BoardEvent {
    /// Creates an event without a payload.
    #[must_use]
    pub const fn new(kind: BoardEventKind) -> Self {
        Self {
            kind,
            task_id: None,
        }
    }

    /// Creates an event about a specific task.
    #[must_use]
    pub const fn for_task(kind: BoardEventKind, task_id: TaskId) -> Self {
        Self {
            kind,
            task_id: Some(task_id),
        }
    }

    /// Shorthand for the `task:updated` event emitted after a committed move.
    #[must_use]
    pub const fn task_updated(task_id: TaskId) -> Self {
        Self::for_task(BoardEventKind::TaskUpdated, task_id)
    }
}

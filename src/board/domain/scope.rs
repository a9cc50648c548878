//! Fetch scope and filter values passed to the task repository.

use super::{ProjectId, SprintId, StoryId, Task, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container whose tasks populate the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoardScope {
    /// All tasks of a project.
    Project(ProjectId),
    /// Tasks of stories planned into a sprint.
    Sprint(SprintId),
    /// Tasks of a single user story.
    Story(StoryId),
}

impl fmt::Display for BoardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project(id) => write!(f, "project:{id}"),
            Self::Sprint(id) => write!(f, "sprint:{id}"),
            Self::Story(id) => write!(f, "story:{id}"),
        }
    }
}

/// Optional narrowing applied on top of the scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilters {
    /// Only tasks of this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    /// Only tasks assigned to this user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
}

impl TaskFilters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a task type.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    /// Restricts to an assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Returns `true` when the task passes every filter that is set.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let type_matches = self
            .task_type
            .as_deref()
            .is_none_or(|wanted| task.task_type().eq_ignore_ascii_case(wanted));
        let assignee_matches = self
            .assignee_id
            .is_none_or(|wanted| task.assignee().is_some_and(|a| a.id == wanted));
        type_matches && assignee_matches
    }
}

//! Task record and the status and priority vocabularies the board sorts by.

use super::{
    EpicId, ParseTaskPriorityError, ParseTaskStatusError, SprintId, StoryId, TaskId, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Workflow status of a task, one per board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is awaiting review.
    InReview,
    /// Work is finished.
    Completed,
}

impl TaskStatus {
    /// Every status in board display order.
    pub const ALL: [Self; 4] = [Self::Todo, Self::InProgress, Self::InReview, Self::Completed];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::InReview => "IN_REVIEW",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns the column heading shown for this status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::InReview => "In Review",
            Self::Completed => "Completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "IN_REVIEW" => Ok(Self::InReview),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status as received from the repository.
///
/// Statuses outside the board vocabulary are kept verbatim so the task can be
/// round-tripped, but they belong to no column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusValue {
    /// One of the four board statuses.
    Known(TaskStatus),
    /// Any other status string.
    Unrecognized(String),
}

impl StatusValue {
    /// Returns the board status, if recognised.
    #[must_use]
    pub const fn known(&self) -> Option<TaskStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<String> for StatusValue {
    fn from(value: String) -> Self {
        TaskStatus::try_from(value.as_str()).map_or(Self::Unrecognized(value), Self::Known)
    }
}

impl From<StatusValue> for String {
    fn from(value: StatusValue) -> Self {
        match value {
            StatusValue::Known(status) => status.as_str().to_owned(),
            StatusValue::Unrecognized(raw) => raw,
        }
    }
}

impl From<TaskStatus> for StatusValue {
    fn from(value: TaskStatus) -> Self {
        Self::Known(value)
    }
}

/// Task priority. Ordering is ascending urgency: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    /// Low urgency.
    Low,
    /// Normal urgency.
    Medium,
    /// High urgency.
    High,
    /// Must be handled first.
    Critical,
}

impl TaskPriority {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised priorities rank with absent ones rather than failing the fetch.
fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<TaskPriority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| TaskPriority::try_from(value.as_str()).ok()))
}

/// User a task is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

impl Assignee {
    /// Creates an assignee reference.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Epic referenced by a parent story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicRef {
    /// Epic identifier.
    pub id: EpicId,
    /// Epic name, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Sprint referenced by a parent story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintRef {
    /// Sprint identifier.
    pub id: SprintId,
    /// Sprint name, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Parent user story of a task. Read-only for the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRef {
    /// Story identifier.
    pub id: StoryId,
    /// Story title, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Owning epic, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic: Option<EpicRef>,
    /// Sprint the story is planned into, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<SprintRef>,
}

/// Task record as held in the canonical board list.
///
/// The board only ever rewrites the status; every other field is whatever the
/// repository last returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    status: StatusValue,
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    priority: Option<TaskPriority>,
    #[serde(rename = "type", default)]
    task_type: String,
    #[serde(default)]
    estimated_hours: f64,
    #[serde(default)]
    actual_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignee: Option<Assignee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_story: Option<StoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task with the required fields and no optional metadata.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status: StatusValue::Known(status),
            priority: None,
            task_type: String::new(),
            estimated_hours: 0.0,
            actual_hours: 0.0,
            assignee: None,
            user_story: None,
            updated_at: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the task type.
    #[must_use]
    pub fn with_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    /// Sets the estimated effort in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    /// Sets the effort spent so far in hours.
    #[must_use]
    pub const fn with_actual_hours(mut self, hours: f64) -> Self {
        self.actual_hours = hours;
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the parent story reference.
    #[must_use]
    pub fn with_user_story(mut self, story: StoryRef) -> Self {
        self.user_story = Some(story);
        self
    }

    /// Replaces the status with a raw repository value.
    #[must_use]
    pub fn with_status_value(mut self, status: StatusValue) -> Self {
        self.status = status;
        self
    }

    /// Sets the last-modified timestamp.
    #[must_use]
    pub const fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the board status, or `None` for an unrecognised status.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status.known()
    }

    /// Returns the status exactly as the repository reported it.
    #[must_use]
    pub const fn status_value(&self) -> &StatusValue {
        &self.status
    }

    /// Returns the priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the task type.
    #[must_use]
    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// Returns the estimated effort in hours.
    #[must_use]
    pub const fn estimated_hours(&self) -> f64 {
        self.estimated_hours
    }

    /// Returns the effort spent in hours.
    #[must_use]
    pub const fn actual_hours(&self) -> f64 {
        self.actual_hours
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&Assignee> {
        self.assignee.as_ref()
    }

    /// Returns the parent story, if any.
    #[must_use]
    pub const fn user_story(&self) -> Option<&StoryRef> {
        self.user_story.as_ref()
    }

    /// Returns the last-modified timestamp, if the repository supplied one.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Moves the task to another status.
    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = StatusValue::Known(status);
    }

    /// Records a repository-side modification time.
    pub(crate) const fn stamp(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

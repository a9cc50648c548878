//! User-facing, non-fatal notices raised by failed fetches and moves.

use super::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::fmt;

/// Message shown when a failed move carries no repository message.
pub const GENERIC_MUTATION_FAILURE: &str = "the status change could not be saved";

/// Identifier of a notice, unique within one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NoticeId(u64);

impl NoticeId {
    /// Creates a notice identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoticeKind {
    /// Loading tasks failed; the board kept its last list.
    FetchFailed,
    /// Moving a task failed and was rolled back.
    MutationFailed {
        /// Task that was moved.
        task_id: TaskId,
        /// Column the move targeted.
        attempted: TaskStatus,
    },
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    id: NoticeId,
    kind: NoticeKind,
    message: String,
    raised_at: DateTime<Utc>,
}

impl Notice {
    /// Creates a fetch failure notice.
    #[must_use]
    pub fn fetch_failed(id: NoticeId, error: &str, clock: &impl Clock) -> Self {
        Self {
            id,
            kind: NoticeKind::FetchFailed,
            message: format!("Failed to load tasks: {error}"),
            raised_at: clock.utc(),
        }
    }

    /// Creates a move failure notice naming the task.
    ///
    /// Uses [`GENERIC_MUTATION_FAILURE`] when the repository gave no reason.
    #[must_use]
    pub fn mutation_failed(
        id: NoticeId,
        task_id: TaskId,
        task_title: &str,
        attempted: TaskStatus,
        reason: Option<&str>,
        clock: &impl Clock,
    ) -> Self {
        let explanation = reason
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(GENERIC_MUTATION_FAILURE);
        Self {
            id,
            kind: NoticeKind::MutationFailed { task_id, attempted },
            message: format!(
                "Could not move \"{task_title}\" to {}: {explanation}",
                attempted.label()
            ),
            raised_at: clock.utc(),
        }
    }

    /// Returns the notice identifier.
    #[must_use]
    pub const fn id(&self) -> NoticeId {
        self.id
    }

    /// Returns what went wrong.
    #[must_use]
    pub const fn kind(&self) -> &NoticeKind {
        &self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the notice was raised.
    #[must_use]
    pub const fn raised_at(&self) -> DateTime<Utc> {
        self.raised_at
    }
}

//! Domain model for the task board.
//!
//! Everything here is synchronous and free of I/O: the task record, column
//! partitioning, the drag gesture machine, derived statistics and user
//! notices.

mod column;
mod drag;
mod error;
mod event;
mod ids;
mod notice;
mod scope;
mod stats;
mod task;
mod view;

pub use column::{Column, Columns, partition};
pub use drag::{DragPhase, DragSlot, DragState, DropLocation, DropOutcome};
pub use error::{
    BoardDomainError, ParseBoardEventError, ParseTaskPriorityError, ParseTaskStatusError,
};
pub use event::{BoardEvent, BoardEventKind};
pub use ids::{EpicId, ProjectId, SprintId, StoryId, TaskId, UserId};
pub use notice::{GENERIC_MUTATION_FAILURE, Notice, NoticeId, NoticeKind};
pub use scope::{BoardScope, TaskFilters};
pub use stats::BoardStatistics;
pub use task::{
    Assignee, EpicRef, SprintRef, StatusValue, StoryRef, Task, TaskPriority, TaskStatus,
};
pub use view::BoardView;

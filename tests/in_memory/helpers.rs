//! Shared builders for in-memory board integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::{InMemoryTaskRepository, InProcessNotificationBus},
    config::BoardConfig,
    domain::{
        Assignee, BoardScope, EpicId, EpicRef, ProjectId, SprintId, SprintRef, StoryId, StoryRef,
        Task, TaskId, TaskPriority, TaskStatus, UserId,
    },
    services::BoardController,
};

/// Board type used by the integration tests.
pub type MemoryBoard =
    BoardController<InMemoryTaskRepository, InProcessNotificationBus, DefaultClock>;

/// Project every seeded task belongs to.
pub const PROJECT: ProjectId = ProjectId::new(10);

/// Sprint the "Board view" story is planned into.
pub const SPRINT: SprintId = SprintId::new(3);

/// Story holding the planned tasks.
pub const STORY: StoryId = StoryId::new(21);

/// Provides a shared bus for each test.
#[fixture]
pub fn bus() -> Arc<InProcessNotificationBus> {
    Arc::new(InProcessNotificationBus::default())
}

/// Provides a repository seeded with a small sprint backlog.
#[fixture]
pub fn repository() -> InMemoryTaskRepository {
    let repository = InMemoryTaskRepository::new().with_clock(Arc::new(DefaultClock));
    for task in backlog() {
        repository
            .upsert(PROJECT, task)
            .expect("seeding the in-memory store should succeed");
    }
    repository
}

/// Timings short enough for real-time tests.
#[must_use]
pub fn fast_config() -> BoardConfig {
    BoardConfig {
        post_mutation_refresh_delay: std::time::Duration::from_millis(30),
        ..BoardConfig::default()
    }
    .with_poll_interval(std::time::Duration::from_millis(80))
    .with_bus_debounce(std::time::Duration::from_millis(20))
}

/// Builds a project board over `repository`.
#[must_use]
pub fn project_board(
    repository: &InMemoryTaskRepository,
    bus: &Arc<InProcessNotificationBus>,
    config: BoardConfig,
) -> MemoryBoard {
    board_for(repository, bus, config, BoardScope::Project(PROJECT))
}

/// Builds a board over `repository` for any scope.
#[must_use]
pub fn board_for(
    repository: &InMemoryTaskRepository,
    bus: &Arc<InProcessNotificationBus>,
    config: BoardConfig,
    scope: BoardScope,
) -> MemoryBoard {
    BoardController::new(
        Arc::new(repository.clone()),
        Arc::clone(bus),
        Arc::new(DefaultClock),
        config,
        scope,
    )
}

fn planned_story() -> StoryRef {
    StoryRef {
        id: STORY,
        title: Some("Board view".to_owned()),
        epic: Some(EpicRef {
            id: EpicId::new(2),
            name: Some("Planning".to_owned()),
        }),
        sprint: Some(SprintRef {
            id: SPRINT,
            name: Some("Sprint 3".to_owned()),
        }),
    }
}

fn backlog() -> Vec<Task> {
    let alex = Assignee::new(UserId::new(1), "Alex");
    let robin = Assignee::new(UserId::new(2), "Robin");
    vec![
        Task::new(TaskId::new(7), "Render columns", TaskStatus::Todo)
            .with_priority(TaskPriority::High)
            .with_type("feature")
            .with_estimated_hours(5.0)
            .with_assignee(alex.clone())
            .with_user_story(planned_story()),
        Task::new(TaskId::new(8), "Fix drop flicker", TaskStatus::InProgress)
            .with_priority(TaskPriority::Critical)
            .with_type("bug")
            .with_estimated_hours(2.0)
            .with_assignee(robin)
            .with_user_story(planned_story()),
        Task::new(TaskId::new(9), "Write changelog", TaskStatus::Todo)
            .with_type("chore")
            .with_estimated_hours(1.0)
            .with_assignee(alex),
        Task::new(TaskId::new(11), "Release 0.1", TaskStatus::Completed)
            .with_priority(TaskPriority::Medium)
            .with_type("chore")
            .with_estimated_hours(3.0)
            .with_actual_hours(4.0),
    ]
}

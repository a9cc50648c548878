//! Shared world state for board drag and drop BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::{InMemoryTaskRepository, InProcessNotificationBus},
    config::BoardConfig,
    domain::{BoardScope, ProjectId, TaskStatus},
    services::{BoardController, BoardError, DropResult},
};

/// Board type used by the BDD world.
pub type TestBoard = BoardController<InMemoryTaskRepository, InProcessNotificationBus, DefaultClock>;

/// Project the scenario tasks belong to.
pub const PROJECT: ProjectId = ProjectId::new(1);

/// Scenario world for board drag and drop behaviour tests.
pub struct BoardWorld {
    pub repository: InMemoryTaskRepository,
    pub bus: Arc<InProcessNotificationBus>,
    pub board: Option<TestBoard>,
    pub last_drop: Option<Result<DropResult, BoardError>>,
}

impl BoardWorld {
    /// Creates a world with an empty repository and no board yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            repository: InMemoryTaskRepository::new(),
            bus: Arc::new(InProcessNotificationBus::default()),
            board: None,
            last_drop: None,
        }
    }

    /// Builds the board over the seeded repository.
    pub fn open_board(&mut self) -> &TestBoard {
        self.board.insert(BoardController::new(
            Arc::new(self.repository.clone()),
            Arc::clone(&self.bus),
            Arc::new(DefaultClock),
            BoardConfig::default(),
            BoardScope::Project(PROJECT),
        ))
    }

    /// Returns the loaded board.
    ///
    /// # Errors
    ///
    /// Returns an error when no step has loaded the board yet.
    pub fn board(&self) -> Result<&TestBoard, eyre::Report> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("the board has not been loaded in this scenario"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Parses a status written in a feature file.
///
/// # Errors
///
/// Returns an error when the text is not a board status.
pub fn parse_status(raw: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

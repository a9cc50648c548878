//! Port contracts for the task board.
//!
//! Ports define the collaborator interfaces the board consumes: the task
//! repository and the notification bus.

pub mod bus;
pub mod repository;

pub use bus::{BoardEventReceiver, NotificationBus};
pub use repository::{StatusUpdate, TaskRepository, TaskRepositoryError, TaskRepositoryResult};

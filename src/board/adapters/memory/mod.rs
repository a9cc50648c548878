//! In-memory adapters for the board ports.

mod bus;
mod task;

pub use bus::{DEFAULT_BUS_CAPACITY, InProcessNotificationBus};
pub use task::{InMemoryTaskRepository, UpdateFailure};

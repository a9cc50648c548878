//! Application services for board synchronization.

mod context;
mod controller;
mod error;
mod mutation;
mod scheduler;

pub use context::{BoardContext, RefreshOrigin, RefreshOutcome};
pub use controller::{BoardController, DropResult};
pub use error::{BoardError, BoardResult};
pub use mutation::{MutationOutcome, OptimisticMutationExecutor};
pub use scheduler::RefreshScheduler;

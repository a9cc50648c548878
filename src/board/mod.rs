//! Kanban board synchronization.
//!
//! Keeps a local view of a scoped task list consistent with a remote task
//! repository. Tasks are partitioned into status columns, moved through a
//! drag-and-drop state machine, changed optimistically with rollback on
//! failure, and refreshed from polling, bus notifications and explicit
//! requests. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Timing and policy knobs in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

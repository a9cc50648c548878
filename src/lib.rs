//! Taskboard: a synchronization engine for kanban task boards.
//!
//! This crate keeps a local, column-partitioned view of a scoped task list in
//! step with a remote task repository. Users move tasks between status
//! columns by drag and drop; moves are applied optimistically and rolled back
//! if the repository refuses them. The board refreshes itself on a polling
//! timer, on debounced notification bus events and on demand.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board logic with no I/O
//! - **Ports**: Trait interfaces for the task repository and notification bus
//! - **Adapters**: In-memory implementations of those ports
//! - **Services**: The board controller and the machinery it drives
//!
//! # Modules
//!
//! - [`board`]: Board state, drag gestures, optimistic moves and refreshes

pub mod board;

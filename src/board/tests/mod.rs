//! Unit tests for the board module.
//!
//! Tests are organised by component: the pure domain types first, then the
//! services that drive them under paused tokio time.

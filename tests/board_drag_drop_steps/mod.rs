//! Step definitions for board drag and drop scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;

//! Service-level errors for board operations.

use crate::board::domain::BoardDomainError;
use thiserror::Error;

/// Errors returned by board services.
///
/// Repository failures are not here: they become notices and outcomes, never
/// errors, so a caller cannot observe a half-applied board.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    /// A board rule rejected the request.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The board has been shut down.
    #[error("the board has been shut down")]
    Inactive,

    /// The board was already activated.
    #[error("the board is already active")]
    AlreadyActive,
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

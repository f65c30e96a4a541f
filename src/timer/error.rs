//! Timer engine error types.

use thiserror::Error;

/// Errors returned by [`TimerEngine`](super::TimerEngine) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine task has exited, so the command could not be delivered.
    #[error("timer engine is not running")]
    Closed,
}

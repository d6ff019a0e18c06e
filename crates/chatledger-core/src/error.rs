use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Command not recognized")]
    UnrecognizedCommand,
    #[error("Column index must be positive")]
    InvalidColumn,
    #[error("Invalid column letters: {0}")]
    InvalidColumnLetters(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
    #[error("Backend unavailable: {0}")]
    Backend(String),
    #[error("Backend call `{operation}` timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl CoreError {
    /// True for failures of the external tabular store.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            CoreError::Backend(_) | CoreError::Timeout { .. } | CoreError::SheetNotFound(_)
        )
    }
}

use chatledger_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Workbook lock poisoned")]
    Poisoned,
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Backend(err.to_string())
    }
}

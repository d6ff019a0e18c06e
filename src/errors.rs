use chatledger_config::ConfigError;
use chatledger_core::CoreError;
use chatledger_sheets::SheetsError;
use thiserror::Error;

/// Failures of the service shell: startup, transport, and wiring.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Ledger error: {0}")]
    Core(#[from] CoreError),
    #[error("Spreadsheet access failed: {0}")]
    Sheets(#[from] SheetsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Transport closed: {0}")]
    Transport(String),
}

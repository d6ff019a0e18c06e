use chatledger_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Access token rejected (HTTP {0})")]
    Unauthorized(u16),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),
    #[error("URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Request exhausted retries")]
    RetriesExhausted,
}

impl From<SheetsError> for CoreError {
    fn from(err: SheetsError) -> Self {
        CoreError::Backend(err.to_string())
    }
}

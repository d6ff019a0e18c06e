//! Splits raw message text into tokens.

use chatledger_domain::ChatCommand;

use crate::CoreError;

/// Trims the message and splits it on runs of whitespace.
///
/// Returns [`CoreError::EmptyMessage`] when nothing is left after trimming.
pub fn tokenize(raw: &str) -> Result<ChatCommand, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyMessage);
    }
    let tokens = trimmed.split_whitespace().map(str::to_string).collect();
    Ok(ChatCommand::new(trimmed, tokens))
}

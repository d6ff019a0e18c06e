//! Inbound chat commands.

use serde::{Deserialize, Serialize};

/// A tokenized chat message. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCommand {
    raw_text: String,
    tokens: Vec<String>,
}

impl ChatCommand {
    pub fn new(raw_text: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            tokens,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Tokens as typed, for display and free-text fields.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Lowercase view of the token at `index`, for keyword matching.
    pub fn lowercase(&self, index: usize) -> Option<String> {
        self.tokens.get(index).map(|token| token.to_lowercase())
    }

    /// Tokens remaining after the first `consumed` entries.
    pub fn tail(&self, consumed: usize) -> &[String] {
        self.tokens.get(consumed..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

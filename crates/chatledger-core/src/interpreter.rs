//! Tokenize, classify, extract.

use chatledger_domain::{ChatCommand, Operation};

use crate::{classifier::classify, extractor::extract, tokenizer::tokenize, CoreError};

/// Interprets an already tokenized command.
pub fn interpret_command(command: &ChatCommand) -> Operation {
    let classification = classify(command);
    extract(classification.kind, command.tail(classification.consumed))
}

/// Interprets raw message text.
///
/// Blank input is [`CoreError::EmptyMessage`]; unrelated chatter is
/// [`Operation::Unrecognized`], which is not an error.
pub fn interpret(raw: &str) -> Result<Operation, CoreError> {
    let command = tokenize(raw)?;
    Ok(interpret_command(&command))
}

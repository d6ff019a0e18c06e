//! Chat transport seam and a line-oriented implementation over any async stream.

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout},
    sync::Mutex,
};
use uuid::Uuid;

use crate::errors::AppError;

const DEFAULT_SENDER: &str = "stdin";

/// One chat message as delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: Uuid,
    pub sender: String,
    pub text: String,
}

impl InboundMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// Yields inbound messages until the conversation ends.
#[async_trait]
pub trait MessageSource: Send {
    /// `None` once the source is exhausted.
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, AppError>;
}

/// Sends reply text back to the sender of a message.
#[async_trait]
pub trait Replier: Send + Sync {
    async fn reply(&self, to: &InboundMessage, text: &str) -> Result<(), AppError>;
}

/// Splits `sender: text`; lines without a single-word prefix come from the default sender.
pub fn parse_line(line: &str) -> InboundMessage {
    if let Some((sender, text)) = line.split_once(':') {
        let sender = sender.trim();
        if !sender.is_empty() && !sender.contains(char::is_whitespace) {
            return InboundMessage::new(sender, text.trim());
        }
    }
    InboundMessage::new(DEFAULT_SENDER, line.trim())
}

/// Each line read from `R` is one message.
pub struct LineSource<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl LineSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> MessageSource for LineSource<R> {
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, AppError> {
        Ok(self.lines.next_line().await?.map(|line| parse_line(&line)))
    }
}

/// Writes replies to `W` as `sender: text` lines.
pub struct LineReplier<W> {
    writer: Mutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> LineReplier<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl LineReplier<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Replier for LineReplier<W> {
    async fn reply(&self, to: &InboundMessage, text: &str) -> Result<(), AppError> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(format!("{}: {}\n", to.sender, text).as_bytes())
            .await?;
        writer.flush().await?;
        Ok(())
    }
}

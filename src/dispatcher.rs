//! Routes inbound messages to the engine, one task per message.

use std::{future::Future, sync::Arc};

use chatledger_core::{Dispatch, LedgerEngine};
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::{
    errors::AppError,
    transport::{InboundMessage, MessageSource, Replier},
};

/// Counters for a finished dispatch loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub received: usize,
    pub replied: usize,
}

pub struct Dispatcher {
    engine: Arc<LedgerEngine>,
    replier: Arc<dyn Replier>,
}

impl Dispatcher {
    pub fn new(engine: Arc<LedgerEngine>, replier: Arc<dyn Replier>) -> Self {
        Self { engine, replier }
    }

    /// Drains `source`, then waits for every in-flight message.
    pub async fn run<S: MessageSource>(&self, source: S) -> Result<DispatchSummary, AppError> {
        self.run_until(source, std::future::pending()).await
    }

    /// Like [`Dispatcher::run`], but stops reading once `shutdown` resolves.
    /// Messages already handed to the engine still complete.
    pub async fn run_until<S, F>(
        &self,
        mut source: S,
        shutdown: F,
    ) -> Result<DispatchSummary, AppError>
    where
        S: MessageSource,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut tasks = JoinSet::new();
        let mut summary = DispatchSummary::default();
        loop {
            let message = tokio::select! {
                next = source.next_message() => match next? {
                    Some(message) => message,
                    None => break,
                },
                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown requested; draining");
                    break;
                }
            };
            summary.received += 1;
            let span = info_span!("message", message_id = %message.id, sender = %message.sender);
            tasks.spawn(
                handle(self.engine.clone(), self.replier.clone(), message).instrument(span),
            );
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(true) => summary.replied += 1,
                Ok(false) => {}
                Err(err) => error!(error = %err, "message task aborted"),
            }
        }
        Ok(summary)
    }
}

/// Returns true when a reply was delivered.
async fn handle(engine: Arc<LedgerEngine>, replier: Arc<dyn Replier>, message: InboundMessage) -> bool {
    let dispatch = engine.handle_message(&message.text).await;
    if let Dispatch::Ignored(reason) = &dispatch {
        debug!(?reason, "no reply");
    }
    let Some(text) = dispatch.reply() else {
        return false;
    };
    match replier.reply(&message, &text).await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "failed to send reply");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use chatledger_core::{CellRange, CoreError, EngineSettings, FixedClock, TabularStore};
    use chatledger_domain::{CellValue, Grid};
    use chrono::NaiveDate;

    use super::*;

    /// Expense sheet whose appends take a while to land.
    #[derive(Default)]
    struct SlowStore {
        appended: Mutex<Vec<Vec<CellValue>>>,
    }

    #[async_trait]
    impl TabularStore for SlowStore {
        async fn list_sheet_names(&self) -> Result<Vec<String>, CoreError> {
            Ok(vec!["GASTOS OCT 26".into()])
        }

        async fn read_range(&self, _sheet: &str, _range: &CellRange) -> Result<Grid, CoreError> {
            Ok(Grid::new())
        }

        async fn append_row(&self, _sheet: &str, row: Vec<CellValue>) -> Result<(), CoreError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.appended.lock().expect("appended").push(row);
            Ok(())
        }

        async fn update_range(
            &self,
            _sheet: &str,
            _range: &CellRange,
            _values: Grid,
        ) -> Result<(), CoreError> {
            Ok(())
        }
    }

    /// Yields one message, then waits forever like an idle chat.
    struct OneThenIdle {
        sent: bool,
    }

    #[async_trait]
    impl MessageSource for OneThenIdle {
        async fn next_message(&mut self) -> Result<Option<InboundMessage>, AppError> {
            if self.sent {
                std::future::pending::<()>().await;
            }
            self.sent = true;
            Ok(Some(InboundMessage::new("ana", "gastos 5 pan")))
        }
    }

    #[derive(Default)]
    struct CountingReplier {
        replies: Mutex<usize>,
    }

    #[async_trait]
    impl Replier for CountingReplier {
        async fn reply(&self, _to: &InboundMessage, _text: &str) -> Result<(), AppError> {
            *self.replies.lock().expect("replies") += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn shutdown_waits_for_in_flight_messages() {
        let store = Arc::new(SlowStore::default());
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).expect("date");
        let engine = LedgerEngine::new(
            store.clone(),
            Arc::new(FixedClock::new(today)),
            EngineSettings::default(),
        );
        let replier = Arc::new(CountingReplier::default());
        let dispatcher = Dispatcher::new(Arc::new(engine), replier.clone());

        let summary = dispatcher
            .run_until(
                OneThenIdle { sent: false },
                tokio::time::sleep(Duration::from_millis(20)),
            )
            .await
            .expect("run");

        assert_eq!(summary, DispatchSummary { received: 1, replied: 1 });
        assert_eq!(store.appended.lock().expect("appended").len(), 1);
        assert_eq!(*replier.replies.lock().expect("replies"), 1);
    }
}

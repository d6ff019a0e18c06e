//! Message handling: interpret, locate, decide, write.
//!
//! Store calls are the only suspension points. Commands that target the same
//! sheet run their read-decide-write sequence one at a time when
//! `serialize_writes` is set.

use std::{future::Future, sync::Arc, time::Duration};

use chatledger_domain::{
    CellValue, ExpenseColumn, ExpenseFields, FlowFields, LedgerSheet, Operation, OutflowColumn,
    SaleFields, SalesColumn, SheetCoordinate,
};
use chrono::NaiveDate;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, error, info};

use crate::{
    addresser::{coordinate, CellRange},
    interpreter::interpret,
    locator::{LedgerLocator, LocatorSettings},
    locks::SheetLocks,
    reply,
    row_matcher::{ledger_date, plan_sale, SaleWrite},
    slot_scanner::SlotScanner,
    store::TabularStore,
    time::Clock,
    CoreError,
};

pub const DEFAULT_BILLED_START_ROW: u32 = 37;
pub const DEFAULT_UNBILLED_START_ROW: u32 = 16;
pub const DEFAULT_OUTFLOW_SCAN_END_ROW: u32 = 1000;
pub const DEFAULT_SALES_SCAN_END_ROW: u32 = 10_000;
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub locator: LocatorSettings,
    /// First row of the billed outflow band.
    pub billed_start_row: u32,
    /// First row of the unbilled outflow band.
    pub unbilled_start_row: u32,
    /// Last row read when scanning an outflow band.
    pub outflow_scan_end_row: u32,
    /// Last row read when matching sales.
    pub sales_scan_end_row: u32,
    /// Upper bound for each store call; `None` waits indefinitely.
    pub backend_timeout: Option<Duration>,
    pub serialize_writes: bool,
    /// Create the target sheet before writing when the backend supports it.
    pub provision_sheets: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            locator: LocatorSettings::default(),
            billed_start_row: DEFAULT_BILLED_START_ROW,
            unbilled_start_row: DEFAULT_UNBILLED_START_ROW,
            outflow_scan_end_row: DEFAULT_OUTFLOW_SCAN_END_ROW,
            sales_scan_end_row: DEFAULT_SALES_SCAN_END_ROW,
            backend_timeout: Some(DEFAULT_BACKEND_TIMEOUT),
            serialize_writes: true,
            provision_sheets: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Describes the write an operation performed.
pub enum Receipt {
    SaleUpdated {
        coordinate: SheetCoordinate,
        sale: SaleFields,
    },
    SaleRecorded {
        sheet: String,
        sale: SaleFields,
    },
    ExpenseRecorded {
        sheet: String,
        expense: ExpenseFields,
    },
    OutflowRecorded {
        coordinate: SheetCoordinate,
        flow: FlowFields,
    },
}

impl Receipt {
    pub fn sheet(&self) -> &str {
        match self {
            Receipt::SaleUpdated { coordinate, .. } | Receipt::OutflowRecorded { coordinate, .. } => {
                &coordinate.sheet_name
            }
            Receipt::SaleRecorded { sheet, .. } | Receipt::ExpenseRecorded { sheet, .. } => sheet,
        }
    }

    pub fn reply_text(&self) -> String {
        match self {
            Receipt::SaleUpdated { sale, .. } => reply::sale_updated(&sale.client),
            Receipt::SaleRecorded { sale, .. } => {
                reply::sale_recorded(&sale.client, &sale.description)
            }
            Receipt::ExpenseRecorded { expense, .. } => reply::expense_recorded(expense),
            Receipt::OutflowRecorded { flow, .. } => reply::outflow_recorded(flow),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyMessage,
    Unrecognized,
}

#[derive(Debug)]
/// Outcome of handling one inbound message.
pub enum Dispatch {
    /// Nothing written, nothing to reply.
    Ignored(IgnoreReason),
    Completed(Receipt),
    /// The operation failed; the user gets the generic failure reply.
    Failed(CoreError),
}

impl Dispatch {
    pub fn reply(&self) -> Option<String> {
        match self {
            Dispatch::Ignored(_) => None,
            Dispatch::Completed(receipt) => Some(receipt.reply_text()),
            Dispatch::Failed(_) => Some(reply::FAILURE_REPLY.to_string()),
        }
    }
}

/// Applies chat commands to the ledger held by a [`TabularStore`].
pub struct LedgerEngine {
    store: Arc<dyn TabularStore>,
    clock: Arc<dyn Clock>,
    locator: LedgerLocator,
    settings: EngineSettings,
    locks: SheetLocks,
}

impl LedgerEngine {
    pub fn new(
        store: Arc<dyn TabularStore>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            clock,
            locator: LedgerLocator::new(settings.locator.clone()),
            settings,
            locks: SheetLocks::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn locator(&self) -> &LedgerLocator {
        &self.locator
    }

    /// Interprets and applies one message. Never returns an error: failures
    /// are logged and reported through [`Dispatch::Failed`].
    pub async fn handle_message(&self, text: &str) -> Dispatch {
        let operation = match interpret(text) {
            Ok(operation) => operation,
            Err(CoreError::EmptyMessage) => return Dispatch::Ignored(IgnoreReason::EmptyMessage),
            Err(err) => return Dispatch::Failed(err),
        };
        if !operation.is_recognized() {
            debug!("ignoring unrecognized message");
            return Dispatch::Ignored(IgnoreReason::Unrecognized);
        }

        let kind = operation.kind();
        match self.execute(operation).await {
            Ok(receipt) => {
                info!(%kind, sheet = receipt.sheet(), "ledger updated");
                Dispatch::Completed(receipt)
            }
            Err(err) => {
                error!(%kind, error = %err, "ledger update failed");
                Dispatch::Failed(err)
            }
        }
    }

    /// Applies an already interpreted operation.
    pub async fn execute(&self, operation: Operation) -> Result<Receipt, CoreError> {
        let today = self.clock.today();
        let kind = operation.kind();
        let names = if self.locator.requires_listing(kind) {
            self.bounded("list_sheet_names", self.store.list_sheet_names())
                .await?
        } else {
            Vec::new()
        };
        let sheet = self
            .locator
            .resolve(kind, today, &names)
            .ok_or(CoreError::UnrecognizedCommand)?;
        let _guard = self.guard(&sheet).await;

        match operation {
            Operation::RecordSale(sale) => {
                self.provision(&sheet, sales_header()).await?;
                self.record_sale(sheet, sale, today).await
            }
            Operation::RecordPersonalExpense(expense) => {
                self.provision_unlisted(&sheet, &names).await?;
                self.record_expense(sheet, expense, today).await
            }
            Operation::RecordBilledOutflow(flow) => {
                self.provision_unlisted(&sheet, &names).await?;
                self.record_outflow(sheet, FlowFields { billed: true, ..flow })
                    .await
            }
            Operation::RecordUnbilledOutflow(flow) => {
                self.provision_unlisted(&sheet, &names).await?;
                self.record_outflow(sheet, FlowFields { billed: false, ..flow })
                    .await
            }
            Operation::Unrecognized => Err(CoreError::UnrecognizedCommand),
        }
    }

    async fn provision(&self, sheet: &str, header: Vec<CellValue>) -> Result<(), CoreError> {
        if !self.settings.provision_sheets {
            return Ok(());
        }
        let created = self
            .bounded("ensure_sheet", self.store.ensure_sheet(sheet, header))
            .await?;
        if created {
            info!(sheet, "created missing sheet");
        }
        Ok(())
    }

    /// Provisions a prefix-resolved sheet only when the listing did not contain it.
    async fn provision_unlisted(&self, sheet: &str, names: &[String]) -> Result<(), CoreError> {
        if names.iter().any(|name| name == sheet) {
            return Ok(());
        }
        self.provision(sheet, Vec::new()).await
    }

    async fn record_sale(
        &self,
        sheet: String,
        sale: SaleFields,
        today: NaiveDate,
    ) -> Result<Receipt, CoreError> {
        let range = CellRange::new(1, 1, SalesColumn::WIDTH, self.settings.sales_scan_end_row)?;
        let grid = self
            .bounded("read_range", self.store.read_range(&sheet, &range))
            .await?;
        let ledger = LedgerSheet::from_grid(&sheet, grid, range.start_row);

        match plan_sale(&ledger, &sale, today) {
            SaleWrite::UpdateAdvance { row_number, value } => {
                let column = SalesColumn::Advance.index();
                let coordinate = coordinate(&sheet, row_number, column, column)?;
                let target = CellRange::from_coordinate(&coordinate)?;
                debug!(sheet = %sheet, row = row_number, "updating advance of existing sale");
                self.bounded(
                    "update_range",
                    self.store.update_range(&sheet, &target, vec![vec![value]]),
                )
                .await?;
                Ok(Receipt::SaleUpdated { coordinate, sale })
            }
            SaleWrite::Append { row } => {
                debug!(sheet = %sheet, "appending new sale");
                self.bounded("append_row", self.store.append_row(&sheet, row))
                    .await?;
                Ok(Receipt::SaleRecorded { sheet, sale })
            }
        }
    }

    async fn record_expense(
        &self,
        sheet: String,
        expense: ExpenseFields,
        today: NaiveDate,
    ) -> Result<Receipt, CoreError> {
        let row = expense_row(&expense, today);
        self.bounded("append_row", self.store.append_row(&sheet, row))
            .await?;
        Ok(Receipt::ExpenseRecorded { sheet, expense })
    }

    async fn record_outflow(&self, sheet: String, flow: FlowFields) -> Result<Receipt, CoreError> {
        let start_row = if flow.billed {
            self.settings.billed_start_row
        } else {
            self.settings.unbilled_start_row
        };
        let band = CellRange::new(
            OutflowColumn::FIRST.index(),
            start_row,
            OutflowColumn::LAST.index(),
            self.settings.outflow_scan_end_row.max(start_row),
        )?;
        let grid = self
            .bounded("read_range", self.store.read_range(&sheet, &band))
            .await?;
        let row = SlotScanner::new(start_row).first_free_row(&grid);
        debug!(sheet = %sheet, row, billed = flow.billed, "outflow slot selected");

        let coordinate = coordinate(
            &sheet,
            row,
            OutflowColumn::FIRST.index(),
            OutflowColumn::LAST.index(),
        )?;
        let target = CellRange::from_coordinate(&coordinate)?;
        let values = vec![vec![
            CellValue::from(flow.concept.as_str()),
            CellValue::from(flow.amount),
        ]];
        self.bounded("update_range", self.store.update_range(&sheet, &target, values))
            .await?;
        Ok(Receipt::OutflowRecorded { coordinate, flow })
    }

    async fn guard(&self, sheet: &str) -> Option<OwnedMutexGuard<()>> {
        if self.settings.serialize_writes {
            Some(self.locks.acquire(sheet).await)
        } else {
            None
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        match self.settings.backend_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CoreError::Timeout {
                    operation,
                    after: limit,
                })?,
            None => call.await,
        }
    }
}

/// Column titles of the sales sheet, in layout order.
pub fn sales_header() -> Vec<CellValue> {
    SalesColumn::ALL
        .iter()
        .map(|column| CellValue::from(column.header()))
        .collect()
}

/// `[date, concept, amount]` row for a personal expense.
pub fn expense_row(expense: &ExpenseFields, today: NaiveDate) -> Vec<CellValue> {
    ExpenseColumn::ALL
        .iter()
        .map(|column| match column {
            ExpenseColumn::Date => CellValue::from(ledger_date(today)),
            ExpenseColumn::Concept => CellValue::from(expense.concept.as_str()),
            ExpenseColumn::Amount => CellValue::from(expense.amount),
        })
        .collect()
}

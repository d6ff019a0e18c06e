use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chatledger_core::{CellRange, CoreError, TabularStore};
use chatledger_domain::{CellValue, Grid};
use tracing::debug;

use crate::{error::StoreError, workbook::Workbook};

/// Volatile workbook for dry runs and tests. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryWorkbookStore {
    workbook: Mutex<Workbook>,
}

impl MemoryWorkbookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-provisioned with empty sheets.
    pub fn with_sheets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_workbook(Workbook::with_sheets(names))
    }

    pub fn from_workbook(workbook: Workbook) -> Self {
        Self {
            workbook: Mutex::new(workbook),
        }
    }

    /// Copy of the current workbook contents.
    pub fn snapshot(&self) -> Result<Workbook, CoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn add_sheet(&self, name: &str) -> Result<bool, CoreError> {
        Ok(self.lock()?.add_sheet(name))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Workbook>, CoreError> {
        self.workbook
            .lock()
            .map_err(|_| CoreError::from(StoreError::Poisoned))
    }
}

#[async_trait]
impl TabularStore for MemoryWorkbookStore {
    async fn list_sheet_names(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.lock()?.sheet_names())
    }

    async fn read_range(&self, sheet: &str, range: &CellRange) -> Result<Grid, CoreError> {
        self.lock()?.read_range(sheet, range)
    }

    async fn append_row(&self, sheet: &str, row: Vec<CellValue>) -> Result<(), CoreError> {
        let row_number = self.lock()?.append_row(sheet, row)?;
        debug!(sheet, row = row_number, "appended row in memory");
        Ok(())
    }

    async fn update_range(
        &self,
        sheet: &str,
        range: &CellRange,
        values: Grid,
    ) -> Result<(), CoreError> {
        self.lock()?.update_range(sheet, range, values)
    }

    async fn ensure_sheet(&self, sheet: &str, header: Vec<CellValue>) -> Result<bool, CoreError> {
        Ok(self.lock()?.ensure_sheet(sheet, header))
    }
}

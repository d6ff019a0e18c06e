use async_trait::async_trait;
use chatledger_domain::{CellValue, Grid};

use crate::{addresser::CellRange, CoreError};

/// Abstraction over the remote tabular store the ledger lives in.
///
/// Each call either succeeds as a whole or returns an error; the engine never retries.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Sheet titles in the backend's listing order.
    async fn list_sheet_names(&self) -> Result<Vec<String>, CoreError>;

    /// Values inside `range`. Trailing empty rows and cells may be omitted.
    async fn read_range(&self, sheet: &str, range: &CellRange) -> Result<Grid, CoreError>;

    /// Appends a row after the last non-empty row of the sheet.
    async fn append_row(&self, sheet: &str, row: Vec<CellValue>) -> Result<(), CoreError>;

    /// Overwrites the cells of `range` with `values`, leaving other cells untouched.
    async fn update_range(
        &self,
        sheet: &str,
        range: &CellRange,
        values: Grid,
    ) -> Result<(), CoreError>;

    /// Creates `sheet` when it is missing, seeding `header` as its first row.
    /// Returns whether a sheet was created. Backends that cannot create
    /// sheets leave the workbook alone and report `false`.
    async fn ensure_sheet(&self, _sheet: &str, _header: Vec<CellValue>) -> Result<bool, CoreError> {
        Ok(false)
    }
}

//! Read-then-write views over ledger sheets.

use serde::{Deserialize, Serialize};

use crate::cell::{CellValue, Grid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One data row of a sheet together with its 1-based sheet row number.
pub struct DataRow {
    pub row_number: u32,
    pub cells: Vec<CellValue>,
}

impl DataRow {
    /// Cell at a 1-based column index; missing trailing cells read as empty.
    pub fn cell(&self, column: u32) -> CellValue {
        column
            .checked_sub(1)
            .and_then(|offset| self.cells.get(offset as usize))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A sheet region fetched for a single operation. Never cached across messages.
pub struct LedgerSheet {
    pub name: String,
    pub header_row: Vec<String>,
    pub data_rows: Vec<DataRow>,
}

impl LedgerSheet {
    /// Builds a view from a grid whose first row is the header and sits at `first_row`.
    pub fn from_grid(name: impl Into<String>, grid: Grid, first_row: u32) -> Self {
        let mut rows = grid.into_iter();
        let header_row = rows
            .next()
            .map(|header| header.iter().map(CellValue::display_text).collect())
            .unwrap_or_default();
        let data_rows = rows
            .enumerate()
            .map(|(index, cells)| DataRow {
                row_number: first_row + 1 + index as u32,
                cells,
            })
            .collect();
        Self {
            name: name.into(),
            header_row,
            data_rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data_rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Target of a single write: a row and an inclusive column-letter span.
pub struct SheetCoordinate {
    pub sheet_name: String,
    pub row_number: u32,
    pub column_range: (String, String),
}

impl SheetCoordinate {
    pub fn new(
        sheet_name: impl Into<String>,
        row_number: u32,
        start_column: impl Into<String>,
        end_column: impl Into<String>,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            row_number,
            column_range: (start_column.into(), end_column.into()),
        }
    }
}

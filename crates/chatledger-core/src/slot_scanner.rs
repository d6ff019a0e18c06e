//! First-free-row search inside a reserved row band.

use chatledger_domain::{CellValue, Grid, OutflowColumn};

/// Scans a band read from column `A` onward for its first free row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotScanner {
    start_row: u32,
}

impl SlotScanner {
    pub fn new(start_row: u32) -> Self {
        Self { start_row }
    }

    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    /// Sheet row number of the first row whose concept and amount are both blank.
    ///
    /// When every scanned row is occupied the row right after the window is used.
    pub fn first_free_row(&self, band: &Grid) -> u32 {
        let offset = band
            .iter()
            .position(|row| is_free(row))
            .unwrap_or(band.len());
        self.start_row + offset as u32
    }
}

fn is_free(row: &[CellValue]) -> bool {
    [OutflowColumn::Concept, OutflowColumn::Amount]
        .iter()
        .all(|column| row.get(column.offset()).map_or(true, |cell| cell.is_blank()))
}

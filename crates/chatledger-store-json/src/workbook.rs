use chatledger_core::{CellRange, CoreError};
use chatledger_domain::{CellValue, Grid};
use serde::{Deserialize, Serialize};

/// One named grid. Row `n` of the sheet lives at `rows[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    pub name: String,
    #[serde(default)]
    pub rows: Grid,
}

impl SheetData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Grid::new(),
        }
    }

    /// 1-based number of the last row holding any value, or 0 for an empty sheet.
    pub fn last_filled_row(&self) -> u32 {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|cell| !is_vacant(cell)))
            .map(|index| index as u32 + 1)
            .unwrap_or(0)
    }

    fn cell_mut(&mut self, row: u32, column: u32) -> &mut CellValue {
        let row_index = (row - 1) as usize;
        if self.rows.len() <= row_index {
            self.rows.resize_with(row_index + 1, Vec::new);
        }
        let cells = &mut self.rows[row_index];
        let column_index = (column - 1) as usize;
        if cells.len() <= column_index {
            cells.resize_with(column_index + 1, CellValue::default);
        }
        &mut cells[column_index]
    }
}

/// Ordered collection of sheets with the value semantics of a spreadsheet API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    sheets: Vec<SheetData>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut workbook = Self::new();
        for name in names {
            workbook.add_sheet(name);
        }
        workbook
    }

    /// Sheet titles in creation order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheets(&self) -> &[SheetData] {
        &self.sheets
    }

    /// Adds an empty sheet. Returns false when the name is already taken.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.sheet(&name).is_some() {
            return false;
        }
        self.sheets.push(SheetData::new(name));
        true
    }

    /// Adds `name` with `header` as its first row unless it already exists.
    pub fn ensure_sheet(&mut self, name: &str, header: Vec<CellValue>) -> bool {
        if self.sheet(name).is_some() {
            return false;
        }
        let rows = if header.is_empty() { Grid::new() } else { vec![header] };
        self.sheets.push(SheetData {
            name: name.to_string(),
            rows,
        });
        true
    }

    /// Replaces the content of a sheet, creating it when missing.
    pub fn set_rows(&mut self, name: &str, rows: Grid) {
        match self.sheets.iter().position(|sheet| sheet.name == name) {
            Some(index) => self.sheets[index].rows = rows,
            None => self.sheets.push(SheetData {
                name: name.to_string(),
                rows,
            }),
        }
    }

    /// Values inside `range`, with trailing vacant cells and rows omitted.
    pub fn read_range(&self, name: &str, range: &CellRange) -> Result<Grid, CoreError> {
        let sheet = self
            .sheet(name)
            .ok_or_else(|| CoreError::SheetNotFound(name.to_string()))?;
        let mut grid = Grid::new();
        for row_number in range.start_row..=range.end_row {
            let Some(row) = sheet.rows.get((row_number - 1) as usize) else {
                break;
            };
            let mut cells: Vec<CellValue> = (range.start_column..=range.end_column)
                .map(|column| row.get((column - 1) as usize).cloned().unwrap_or_default())
                .collect();
            while cells.last().is_some_and(is_vacant) {
                cells.pop();
            }
            grid.push(cells);
        }
        while grid.last().is_some_and(|row| row.is_empty()) {
            grid.pop();
        }
        Ok(grid)
    }

    /// Writes `row` right after the last filled row and returns its row number.
    pub fn append_row(&mut self, name: &str, row: Vec<CellValue>) -> Result<u32, CoreError> {
        let sheet = self.sheet_mut(name)?;
        let row_number = sheet.last_filled_row() + 1;
        sheet.rows.truncate((row_number - 1) as usize);
        sheet.rows.push(row);
        Ok(row_number)
    }

    /// Overwrites the cells of `range`; cells outside `values` keep their content.
    pub fn update_range(
        &mut self,
        name: &str,
        range: &CellRange,
        values: Grid,
    ) -> Result<(), CoreError> {
        if values.len() > range.height() as usize
            || values.iter().any(|row| row.len() > range.width() as usize)
        {
            return Err(CoreError::InvalidRange(format!(
                "values do not fit inside {range}"
            )));
        }
        let sheet = self.sheet_mut(name)?;
        for (row_offset, cells) in values.into_iter().enumerate() {
            for (column_offset, value) in cells.into_iter().enumerate() {
                let row = range.start_row + row_offset as u32;
                let column = range.start_column + column_offset as u32;
                *sheet.cell_mut(row, column) = value;
            }
        }
        Ok(())
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut SheetData, CoreError> {
        self.sheets
            .iter_mut()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| CoreError::SheetNotFound(name.to_string()))
    }
}

fn is_vacant(cell: &CellValue) -> bool {
    match cell {
        CellValue::Empty => true,
        CellValue::Text(text) => text.is_empty(),
        CellValue::Number(_) => false,
    }
}

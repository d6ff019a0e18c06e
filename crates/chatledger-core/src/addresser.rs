//! Column letters and A1-style range expressions.

use std::fmt;

use chatledger_domain::SheetCoordinate;

use crate::CoreError;

/// Encodes a 1-based column index in bijective base-26 (`1 -> A`, `27 -> AA`).
pub fn column_letter(index: u32) -> Result<String, CoreError> {
    if index == 0 {
        return Err(CoreError::InvalidColumn);
    }
    let mut remaining = index;
    let mut letters = Vec::new();
    while remaining > 0 {
        let digit = ((remaining - 1) % 26) as u8;
        letters.push(char::from(b'A' + digit));
        remaining = (remaining - 1) / 26;
    }
    Ok(letters.iter().rev().collect())
}

/// Decodes column letters back to a 1-based index. Case-insensitive.
pub fn column_index(letters: &str) -> Result<u32, CoreError> {
    if letters.is_empty() {
        return Err(CoreError::InvalidColumnLetters(letters.to_string()));
    }
    letters.chars().try_fold(0u32, |acc, ch| {
        if !ch.is_ascii_alphabetic() {
            return Err(CoreError::InvalidColumnLetters(letters.to_string()));
        }
        let digit = u32::from(ch.to_ascii_uppercase() as u8 - b'A') + 1;
        acc.checked_mul(26)
            .and_then(|value| value.checked_add(digit))
            .ok_or_else(|| CoreError::InvalidColumnLetters(letters.to_string()))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Rectangular block of cells with inclusive 1-based bounds.
pub struct CellRange {
    pub start_column: u32,
    pub start_row: u32,
    pub end_column: u32,
    pub end_row: u32,
}

impl CellRange {
    pub fn new(
        start_column: u32,
        start_row: u32,
        end_column: u32,
        end_row: u32,
    ) -> Result<Self, CoreError> {
        if start_column == 0 || end_column == 0 || start_row == 0 || end_row == 0 {
            return Err(CoreError::InvalidRange(
                "row and column bounds are 1-based".into(),
            ));
        }
        if end_column < start_column || end_row < start_row {
            return Err(CoreError::InvalidRange(format!(
                "end ({end_column}, {end_row}) precedes start ({start_column}, {start_row})"
            )));
        }
        Ok(Self {
            start_column,
            start_row,
            end_column,
            end_row,
        })
    }

    /// Columns `start_column..=end_column` of a single row.
    pub fn row_span(row: u32, start_column: u32, end_column: u32) -> Result<Self, CoreError> {
        Self::new(start_column, row, end_column, row)
    }

    /// The range a coordinate addresses.
    pub fn from_coordinate(coordinate: &SheetCoordinate) -> Result<Self, CoreError> {
        let (start, end) = &coordinate.column_range;
        Self::row_span(coordinate.row_number, column_index(start)?, column_index(end)?)
    }

    pub fn width(&self) -> u32 {
        self.end_column - self.start_column + 1
    }

    pub fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    /// A1 expression, e.g. `A16:B1000`.
    pub fn expression(&self) -> Result<String, CoreError> {
        Ok(format!(
            "{}{}:{}{}",
            column_letter(self.start_column)?,
            self.start_row,
            column_letter(self.end_column)?,
            self.end_row
        ))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expression() {
            Ok(expression) => f.write_str(&expression),
            Err(_) => write!(
                f,
                "R{}C{}:R{}C{}",
                self.start_row, self.start_column, self.end_row, self.end_column
            ),
        }
    }
}

/// Builds the coordinate of a single-row write.
pub fn coordinate(
    sheet_name: &str,
    row: u32,
    start_column: u32,
    end_column: u32,
) -> Result<SheetCoordinate, CoreError> {
    Ok(SheetCoordinate::new(
        sheet_name,
        row,
        column_letter(start_column)?,
        column_letter(end_column)?,
    ))
}

//! Cell values exchanged with the tabular store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rectangular block of cell values, row-major.
pub type Grid = Vec<Vec<CellValue>>;

/// A single spreadsheet cell as seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Returns true when the cell has no visible content once trimmed.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(_) => false,
            CellValue::Text(text) => text.trim().is_empty(),
        }
    }

    /// Text rendering used for comparisons and replies.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(value) => format_amount(*value),
            CellValue::Text(text) => text.clone(),
        }
    }

    /// Trimmed, lowercased rendering for case-insensitive equality.
    pub fn normalized(&self) -> String {
        self.display_text().trim().to_lowercase()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map(CellValue::Number).unwrap_or_default()
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map(CellValue::Text).unwrap_or_default()
    }
}

/// Renders an amount without a trailing `.0` for integral values.
pub fn format_amount(value: f64) -> String {
    value.to_string()
}

/// Renders an optional amount, absent values become the empty string.
pub fn format_optional_amount(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_amounts_render_without_fraction() {
        assert_eq!(format_amount(2800.0), "2800");
        assert_eq!(format_amount(2800.5), "2800.5");
        assert_eq!(format_optional_amount(None), "");
    }

    #[test]
    fn whitespace_text_counts_as_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from(0.0).is_blank());
        assert!(!CellValue::from("renta").is_blank());
    }

    #[test]
    fn cells_serialize_as_plain_json_scalars() {
        let row = vec![
            CellValue::Empty,
            CellValue::from("Carlos"),
            CellValue::from(2800.0),
        ];
        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"[null,"Carlos",2800.0]"#);

        let parsed: Vec<CellValue> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, row);
    }
}

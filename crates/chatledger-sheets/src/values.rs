use chatledger_domain::{CellValue, Grid};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a values read, append, or update call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    pub fn rows(range: String, grid: &Grid) -> Self {
        Self {
            range: Some(range),
            major_dimension: Some("ROWS".into()),
            values: grid
                .iter()
                .map(|row| row.iter().map(cell_to_json).collect())
                .collect(),
        }
    }

    pub fn into_grid(self) -> Grid {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(json_to_cell).collect())
            .collect()
    }
}

/// Sheet-qualified A1 range, quoting the title and doubling embedded quotes.
pub fn qualified_range(sheet: &str, range: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), range)
}

pub fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::String(String::new()),
        CellValue::Number(number) => serde_json::Number::from_f64(*number)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(String::new())),
        CellValue::Text(text) => Value::String(text.clone()),
    }
}

pub fn json_to_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::String(text) if text.is_empty() => CellValue::Empty,
        Value::String(text) => CellValue::Text(text),
        Value::Number(number) => number
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(number.to_string())),
        Value::Bool(flag) => CellValue::Text(if flag { "TRUE" } else { "FALSE" }.into()),
        other => CellValue::Text(other.to_string()),
    }
}

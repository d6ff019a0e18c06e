//! Ledger operations produced from chat commands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Client recorded when a sale command names nobody.
pub const NO_NAME_CLIENT: &str = "SIN NOMBRE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Enumerates the ledger operations a chat command can map to.
pub enum OperationKind {
    RecordSale,
    RecordPersonalExpense,
    RecordBilledOutflow,
    RecordUnbilledOutflow,
    Unrecognized,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperationKind::RecordSale => "sale",
            OperationKind::RecordPersonalExpense => "personal-expense",
            OperationKind::RecordBilledOutflow => "billed-outflow",
            OperationKind::RecordUnbilledOutflow => "unbilled-outflow",
            OperationKind::Unrecognized => "unrecognized",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleFields {
    pub client: String,
    pub description: String,
    pub estimated_date: Option<String>,
    pub payment_amount: Option<f64>,
    pub sale_amount: Option<f64>,
    pub advance_amount: Option<f64>,
}

impl SaleFields {
    /// Sales are matched on (client, description) only when a description exists.
    pub fn has_natural_key(&self) -> bool {
        !self.description.is_empty()
    }
}

impl Default for SaleFields {
    fn default() -> Self {
        Self {
            client: NO_NAME_CLIENT.to_string(),
            description: String::new(),
            estimated_date: None,
            payment_amount: None,
            sale_amount: None,
            advance_amount: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseFields {
    pub amount: Option<f64>,
    pub concept: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowFields {
    pub amount: Option<f64>,
    pub concept: String,
    /// Selects the billed row band; false targets the unbilled band.
    pub billed: bool,
}

impl FlowFields {
    pub fn label(&self) -> &'static str {
        if self.billed {
            "facturado"
        } else {
            "sin facturar"
        }
    }
}

/// A classified command with its extracted fields. Consumed once by the write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    RecordSale(SaleFields),
    RecordPersonalExpense(ExpenseFields),
    RecordBilledOutflow(FlowFields),
    RecordUnbilledOutflow(FlowFields),
    Unrecognized,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::RecordSale(_) => OperationKind::RecordSale,
            Operation::RecordPersonalExpense(_) => OperationKind::RecordPersonalExpense,
            Operation::RecordBilledOutflow(_) => OperationKind::RecordBilledOutflow,
            Operation::RecordUnbilledOutflow(_) => OperationKind::RecordUnbilledOutflow,
            Operation::Unrecognized => OperationKind::Unrecognized,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Operation::Unrecognized)
    }
}

//! Fixed column layouts of the ledger sheets.
//!
//! Column indices are 1-based to match spreadsheet addressing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Columns of a monthly sales sheet, `A` through `L`.
pub enum SalesColumn {
    Folio = 1,
    Date,
    Client,
    Colony,
    Phone,
    Description,
    EstimatedDate,
    Payment,
    SaleAmount,
    Profit,
    Advance,
    Remainder,
}

impl SalesColumn {
    pub const ALL: [SalesColumn; 12] = [
        SalesColumn::Folio,
        SalesColumn::Date,
        SalesColumn::Client,
        SalesColumn::Colony,
        SalesColumn::Phone,
        SalesColumn::Description,
        SalesColumn::EstimatedDate,
        SalesColumn::Payment,
        SalesColumn::SaleAmount,
        SalesColumn::Profit,
        SalesColumn::Advance,
        SalesColumn::Remainder,
    ];

    pub const WIDTH: u32 = 12;

    pub fn index(self) -> u32 {
        self as u32
    }

    /// Zero-based position inside a row slice.
    pub fn offset(self) -> usize {
        self.index() as usize - 1
    }

    pub fn header(self) -> &'static str {
        match self {
            SalesColumn::Folio => "Folio",
            SalesColumn::Date => "Fecha",
            SalesColumn::Client => "Cliente",
            SalesColumn::Colony => "Colonia",
            SalesColumn::Phone => "Teléfono",
            SalesColumn::Description => "Descripción",
            SalesColumn::EstimatedDate => "Fecha estimada",
            SalesColumn::Payment => "Pago",
            SalesColumn::SaleAmount => "Venta",
            SalesColumn::Profit => "Ganancia",
            SalesColumn::Advance => "Anticipos o pagos",
            SalesColumn::Remainder => "Resta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Columns of a personal expense sheet.
pub enum ExpenseColumn {
    Date = 1,
    Concept,
    Amount,
}

impl ExpenseColumn {
    pub const ALL: [ExpenseColumn; 3] = [
        ExpenseColumn::Date,
        ExpenseColumn::Concept,
        ExpenseColumn::Amount,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Columns written inside an outflow row band.
pub enum OutflowColumn {
    Concept = 1,
    Amount,
}

impl OutflowColumn {
    pub const FIRST: OutflowColumn = OutflowColumn::Concept;
    pub const LAST: OutflowColumn = OutflowColumn::Amount;

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn offset(self) -> usize {
        self.index() as usize - 1
    }
}

//! Update-or-append decision for sales.
//!
//! A sale is identified by its (client, description) pair. Repeated messages for
//! the same pair overwrite the advance cell of the first matching row instead of
//! adding rows, so the cell holds the latest reported advance, not a sum.

use chatledger_domain::{CellValue, DataRow, LedgerSheet, SaleFields, SalesColumn};
use chrono::NaiveDate;

/// Date format written to the ledger.
pub const LEDGER_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn ledger_date(date: NaiveDate) -> String {
    date.format(LEDGER_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq)]
/// What the sale write path should do.
pub enum SaleWrite {
    /// Overwrite only the advance cell of an existing row.
    UpdateAdvance { row_number: u32, value: CellValue },
    /// Append a full row in the sales layout.
    Append { row: Vec<CellValue> },
}

/// First row whose client and description equal the sale's, trimmed and case-insensitive.
///
/// Returns `None` when the sale has no description.
pub fn find_sale_row<'a>(sheet: &'a LedgerSheet, sale: &SaleFields) -> Option<&'a DataRow> {
    if !sale.has_natural_key() {
        return None;
    }
    let client = sale.client.trim().to_lowercase();
    let description = sale.description.trim().to_lowercase();
    sheet.data_rows.iter().find(|row| {
        row.cell(SalesColumn::Client.index()).normalized() == client
            && row.cell(SalesColumn::Description.index()).normalized() == description
    })
}

/// Decides between updating an existing sale and appending a new one.
pub fn plan_sale(sheet: &LedgerSheet, sale: &SaleFields, today: NaiveDate) -> SaleWrite {
    match find_sale_row(sheet, sale) {
        Some(row) => SaleWrite::UpdateAdvance {
            row_number: row.row_number,
            value: CellValue::from(sale.advance_amount),
        },
        None => SaleWrite::Append {
            row: new_sale_row(sale, today),
        },
    }
}

/// Full 12-column row for a new sale.
pub fn new_sale_row(sale: &SaleFields, today: NaiveDate) -> Vec<CellValue> {
    SalesColumn::ALL
        .iter()
        .map(|column| match column {
            SalesColumn::Date => CellValue::from(ledger_date(today)),
            SalesColumn::Client => CellValue::from(sale.client.as_str()),
            SalesColumn::Description => CellValue::from(sale.description.as_str()),
            SalesColumn::EstimatedDate => CellValue::from(sale.estimated_date.clone()),
            SalesColumn::Payment => CellValue::from(sale.payment_amount),
            SalesColumn::SaleAmount => CellValue::from(sale.sale_amount),
            SalesColumn::Advance => CellValue::from(sale.advance_amount),
            SalesColumn::Folio
            | SalesColumn::Colony
            | SalesColumn::Phone
            | SalesColumn::Profit
            | SalesColumn::Remainder => CellValue::Empty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn sale(client: &str, description: &str, advance: Option<f64>) -> SaleFields {
        SaleFields {
            client: client.into(),
            description: description.into(),
            advance_amount: advance,
            ..SaleFields::default()
        }
    }

    fn sheet(rows: &[(&str, &str)]) -> LedgerSheet {
        let mut grid = vec![SalesColumn::ALL
            .iter()
            .map(|column| CellValue::from(column.header()))
            .collect::<Vec<_>>()];
        for (client, description) in rows {
            let mut row = vec![CellValue::Empty; SalesColumn::WIDTH as usize];
            row[SalesColumn::Client.offset()] = CellValue::from(*client);
            row[SalesColumn::Description.offset()] = CellValue::from(*description);
            grid.push(row);
        }
        LedgerSheet::from_grid("OCTUBRE 2026", grid, 1)
    }

    #[test]
    fn matches_on_trimmed_case_insensitive_key() {
        let ledger = sheet(&[("Ana", "toldo"), (" carlos ", "Persianas Blackout ")]);
        let found = find_sale_row(&ledger, &sale("Carlos", "persianas blackout", None));
        assert_eq!(found.map(|row| row.row_number), Some(3));
    }

    #[test]
    fn first_match_wins() {
        let ledger = sheet(&[("Ana", "toldo"), ("Ana", "toldo")]);
        let plan = plan_sale(&ledger, &sale("Ana", "toldo", Some(500.0)), today());
        assert_eq!(
            plan,
            SaleWrite::UpdateAdvance {
                row_number: 2,
                value: CellValue::Number(500.0)
            }
        );
    }

    #[test]
    fn missing_advance_clears_the_cell() {
        let ledger = sheet(&[("Ana", "toldo")]);
        let plan = plan_sale(&ledger, &sale("Ana", "toldo", None), today());
        assert_eq!(
            plan,
            SaleWrite::UpdateAdvance {
                row_number: 2,
                value: CellValue::Empty
            }
        );
    }

    #[test]
    fn empty_description_never_matches() {
        let ledger = sheet(&[("Ana", "")]);
        assert!(find_sale_row(&ledger, &sale("Ana", "", Some(1.0))).is_none());
    }

    #[test]
    fn different_description_appends() {
        let ledger = sheet(&[("Ana", "toldo")]);
        let plan = plan_sale(&ledger, &sale("Ana", "persiana", Some(100.0)), today());
        let SaleWrite::Append { row } = plan else {
            panic!("expected append");
        };
        assert_eq!(row.len(), SalesColumn::WIDTH as usize);
        assert_eq!(row[SalesColumn::Date.offset()], CellValue::from("19/10/2026"));
        assert_eq!(row[SalesColumn::Advance.offset()], CellValue::Number(100.0));
    }
}

//! Resolves which sheet an operation writes to.
//!
//! Sales go to a sheet named after the current month. Expenses and outflows go
//! to the sheet found by prefix, in this order of preference:
//! 1. a sheet whose name equals the deterministic name for the current month,
//! 2. the first sheet, in listing order, whose name starts with the prefix,
//! 3. the deterministic name itself.

use chatledger_domain::{MonthLocale, OperationKind};
use chrono::NaiveDate;

pub const DEFAULT_EXPENSE_PREFIX: &str = "GASTOS";
pub const DEFAULT_OUTFLOW_PREFIX: &str = "ING-EGR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorSettings {
    pub locale: MonthLocale,
    pub expense_prefix: String,
    pub outflow_prefix: String,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            locale: MonthLocale::default(),
            expense_prefix: DEFAULT_EXPENSE_PREFIX.into(),
            outflow_prefix: DEFAULT_OUTFLOW_PREFIX.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LedgerLocator {
    settings: LocatorSettings,
}

impl LedgerLocator {
    pub fn new(settings: LocatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LocatorSettings {
        &self.settings
    }

    /// `{MONTH} {YYYY}`; the current month's sales sheet is assumed to exist.
    pub fn sales_sheet(&self, date: NaiveDate) -> String {
        self.settings.locale.month_year(date)
    }

    pub fn expense_fallback(&self, date: NaiveDate) -> String {
        self.prefixed_name(&self.settings.expense_prefix, date)
    }

    pub fn outflow_fallback(&self, date: NaiveDate) -> String {
        self.prefixed_name(&self.settings.outflow_prefix, date)
    }

    fn prefixed_name(&self, prefix: &str, date: NaiveDate) -> String {
        format!("{} {}", prefix, self.settings.locale.short_month_year(date))
    }

    /// Personal expense sheet among `sheet_names`.
    fn expense_sheet(&self, date: NaiveDate, sheet_names: &[String]) -> String {
        resolve_by_prefix(
            sheet_names,
            &self.settings.expense_prefix,
            &self.expense_fallback(date),
        )
    }

    /// Outflow sheet among `sheet_names`; billed and unbilled share it.
    fn outflow_sheet(&self, date: NaiveDate, sheet_names: &[String]) -> String {
        resolve_by_prefix(
            sheet_names,
            &self.settings.outflow_prefix,
            &self.outflow_fallback(date),
        )
    }

    /// Whether resolving `kind` needs the sheet listing.
    pub fn requires_listing(&self, kind: OperationKind) -> bool {
        matches!(
            kind,
            OperationKind::RecordPersonalExpense
                | OperationKind::RecordBilledOutflow
                | OperationKind::RecordUnbilledOutflow
        )
    }

    /// Sheet name for `kind`. `sheet_names` is only consulted for prefix searches.
    pub fn resolve(
        &self,
        kind: OperationKind,
        date: NaiveDate,
        sheet_names: &[String],
    ) -> Option<String> {
        match kind {
            OperationKind::RecordSale => Some(self.sales_sheet(date)),
            OperationKind::RecordPersonalExpense => Some(self.expense_sheet(date, sheet_names)),
            OperationKind::RecordBilledOutflow | OperationKind::RecordUnbilledOutflow => {
                Some(self.outflow_sheet(date, sheet_names))
            }
            OperationKind::Unrecognized => None,
        }
    }
}

/// Prefix search with an exact-name preference, case-insensitive.
pub fn resolve_by_prefix(sheet_names: &[String], prefix: &str, expected: &str) -> String {
    let expected_upper = expected.to_uppercase();
    if let Some(exact) = sheet_names
        .iter()
        .find(|name| name.trim().to_uppercase() == expected_upper)
    {
        return exact.clone();
    }

    let prefix_upper = prefix.to_uppercase();
    sheet_names
        .iter()
        .find(|name| name.to_uppercase().starts_with(&prefix_upper))
        .cloned()
        .unwrap_or_else(|| expected.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn october() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn sales_sheet_uses_month_and_year() {
        let locator = LedgerLocator::default();
        assert_eq!(
            locator.resolve(OperationKind::RecordSale, october(), &[]),
            Some("OCTUBRE 2026".to_string())
        );
    }

    #[test]
    fn expense_prefers_first_prefix_match() {
        let locator = LedgerLocator::default();
        let listing = names(&["OCTUBRE 2026", "Gastos Personales", "GASTOS SEP 26"]);
        assert_eq!(
            locator.resolve(OperationKind::RecordPersonalExpense, october(), &listing),
            Some("Gastos Personales".to_string())
        );
    }

    #[test]
    fn exact_month_name_beats_listing_order() {
        let locator = LedgerLocator::default();
        let listing = names(&["ING-EGR SEP 26", "ing-egr oct 26"]);
        assert_eq!(
            locator.resolve(OperationKind::RecordBilledOutflow, october(), &listing),
            Some("ing-egr oct 26".to_string())
        );
    }

    #[test]
    fn falls_back_to_deterministic_names() {
        let locator = LedgerLocator::default();
        let listing = names(&["OCTUBRE 2026"]);
        assert_eq!(
            locator.resolve(OperationKind::RecordPersonalExpense, october(), &listing),
            Some("GASTOS OCT 26".to_string())
        );
        assert_eq!(
            locator.resolve(OperationKind::RecordUnbilledOutflow, october(), &listing),
            Some("ING-EGR OCT 26".to_string())
        );
    }

    #[test]
    fn unrecognized_has_no_sheet() {
        let locator = LedgerLocator::default();
        assert_eq!(locator.resolve(OperationKind::Unrecognized, october(), &[]), None);
        assert!(!locator.requires_listing(OperationKind::RecordSale));
        assert!(locator.requires_listing(OperationKind::RecordBilledOutflow));
    }
}

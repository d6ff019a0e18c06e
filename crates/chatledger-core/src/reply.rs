//! User-visible reply texts.

use chatledger_domain::{format_optional_amount, ExpenseFields, FlowFields};

/// Sent when an operation fails for any reason after being recognized.
pub const FAILURE_REPLY: &str = "❌ Error interno al procesar.";

pub fn sale_updated(client: &str) -> String {
    format!("✅ Anticipo actualizado para {client}.")
}

pub fn sale_recorded(client: &str, description: &str) -> String {
    format!("✅ Venta registrada: {client} - {description}")
}

pub fn expense_recorded(expense: &ExpenseFields) -> String {
    format!(
        "✅ Gasto personal agregado: {} ${}",
        expense.concept,
        format_optional_amount(expense.amount)
    )
}

pub fn outflow_recorded(flow: &FlowFields) -> String {
    format!(
        "✅ Egreso ({}) agregado: {} ${}",
        flow.label(),
        flow.concept,
        format_optional_amount(flow.amount)
    )
}

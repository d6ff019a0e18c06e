//! Field extraction from command arguments.
//!
//! Extraction is best effort: missing or malformed values become absent fields
//! and never abort the operation.

use chatledger_domain::{
    ExpenseFields, FlowFields, Operation, OperationKind, SaleFields, NO_NAME_CLIENT,
};

pub const DATE_MARKER: &str = "fecha";
pub const PAYMENT_MARKER: &str = "pago";
pub const SALE_MARKER: &str = "venta";
pub const ADVANCE_MARKER: &str = "anticipo";

/// Markers that terminate a sale description.
pub const SALE_STOP_KEYWORDS: [&str; 4] = [DATE_MARKER, PAYMENT_MARKER, SALE_MARKER, ADVANCE_MARKER];

/// Coerces a token to a number after discarding everything but digits, `.` and `-`.
///
/// The longest leading numeric run is parsed, so `$2,800.50` reads as `2800.5`.
/// A remainder without digits yields `None`, never zero.
pub fn coerce_amount(token: &str) -> Option<f64> {
    let cleaned: String = token
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
        .collect();
    numeric_prefix(&cleaned)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn numeric_prefix(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let integer_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        let fraction_digits = fraction_end - fraction_start;
        if digits + fraction_digits > 0 {
            end = fraction_end;
            digits += fraction_digits;
        }
    }

    (digits > 0).then(|| &text[..end])
}

/// Position of the first case-insensitive occurrence of `marker`.
pub fn find_marker(tokens: &[String], marker: &str) -> Option<usize> {
    tokens
        .iter()
        .position(|token| token.to_lowercase() == marker)
}

/// Token that follows the first occurrence of `marker`.
pub fn value_after<'a>(tokens: &'a [String], marker: &str) -> Option<&'a str> {
    let index = find_marker(tokens, marker)?;
    tokens.get(index + 1).map(String::as_str)
}

/// Keyword-anchored numeric value.
pub fn amount_after(tokens: &[String], marker: &str) -> Option<f64> {
    value_after(tokens, marker).and_then(coerce_amount)
}

/// Joins tokens from `start` until one matches a stop keyword or input ends.
pub fn accumulate_until(tokens: &[String], start: usize, stop_keywords: &[&str]) -> String {
    tokens
        .iter()
        .skip(start)
        .take_while(|token| !stop_keywords.contains(&token.to_lowercase().as_str()))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts sale fields. `args` excludes the command keyword.
///
/// The first argument names the client; markers are searched after it.
pub fn extract_sale(args: &[String]) -> SaleFields {
    let client = args
        .first()
        .cloned()
        .unwrap_or_else(|| NO_NAME_CLIENT.to_string());
    let fields = args.get(1..).unwrap_or(&[]);

    SaleFields {
        client,
        description: accumulate_until(fields, 0, &SALE_STOP_KEYWORDS),
        estimated_date: value_after(fields, DATE_MARKER).map(str::to_string),
        payment_amount: amount_after(fields, PAYMENT_MARKER),
        sale_amount: amount_after(fields, SALE_MARKER),
        advance_amount: amount_after(fields, ADVANCE_MARKER),
    }
}

/// Extracts `{amount} {concept...}`.
pub fn extract_expense(args: &[String]) -> ExpenseFields {
    ExpenseFields {
        amount: args.first().and_then(|token| coerce_amount(token)),
        concept: args.get(1..).unwrap_or(&[]).join(" "),
    }
}

/// Outflows share the expense shape; `billed` only selects the row band later.
pub fn extract_flow(args: &[String], billed: bool) -> FlowFields {
    let ExpenseFields { amount, concept } = extract_expense(args);
    FlowFields {
        amount,
        concept,
        billed,
    }
}

/// Builds the operation for `kind` from the arguments that follow the command keyword.
pub fn extract(kind: OperationKind, args: &[String]) -> Operation {
    match kind {
        OperationKind::RecordSale => Operation::RecordSale(extract_sale(args)),
        OperationKind::RecordPersonalExpense => {
            Operation::RecordPersonalExpense(extract_expense(args))
        }
        OperationKind::RecordBilledOutflow => {
            Operation::RecordBilledOutflow(extract_flow(args, true))
        }
        OperationKind::RecordUnbilledOutflow => {
            Operation::RecordUnbilledOutflow(extract_flow(args, false))
        }
        OperationKind::Unrecognized => Operation::Unrecognized,
    }
}

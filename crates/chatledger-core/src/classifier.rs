//! Maps the leading tokens of a command to an operation kind.

use chatledger_domain::{ChatCommand, OperationKind};

/// Single-token command keywords, compared case-insensitively.
const KEYWORDS: &[(&str, OperationKind)] = &[
    ("venta", OperationKind::RecordSale),
    ("sale", OperationKind::RecordSale),
    ("gastos", OperationKind::RecordPersonalExpense),
    ("facturado", OperationKind::RecordBilledOutflow),
];

const UNBILLED_FIRST: &str = "sin";
const UNBILLED_SECOND: &str = "facturar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of classification: the kind and how many leading tokens name the command.
pub struct Classification {
    pub kind: OperationKind,
    pub consumed: usize,
}

impl Classification {
    fn new(kind: OperationKind, consumed: usize) -> Self {
        Self { kind, consumed }
    }

    pub fn unrecognized() -> Self {
        Self::new(OperationKind::Unrecognized, 0)
    }
}

pub fn classify(command: &ChatCommand) -> Classification {
    let Some(first) = command.lowercase(0) else {
        return Classification::unrecognized();
    };

    if let Some((_, kind)) = KEYWORDS.iter().find(|(keyword, _)| *keyword == first) {
        return Classification::new(*kind, 1);
    }

    if first == UNBILLED_FIRST && command.lowercase(1).as_deref() == Some(UNBILLED_SECOND) {
        return Classification::new(OperationKind::RecordUnbilledOutflow, 2);
    }

    Classification::unrecognized()
}

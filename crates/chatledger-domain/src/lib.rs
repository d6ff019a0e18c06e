//! chatledger-domain
//!
//! Pure domain models (chat commands, ledger operations, sheet views, column layouts).
//! No I/O, no transport, no storage. Only data types and core enums.

pub mod calendar;
pub mod cell;
pub mod command;
pub mod layout;
pub mod operation;
pub mod sheet;

pub use calendar::*;
pub use cell::*;
pub use command::*;
pub use layout::*;
pub use operation::*;
pub use sheet::*;

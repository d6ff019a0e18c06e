//! chatledger-sheets
//!
//! `TabularStore` over the spreadsheet values HTTP API.

pub mod client;
pub mod error;
pub mod retry;
pub mod values;

pub use client::SheetsClient;
pub use error::SheetsError;
pub use retry::{send_with_retry, RetryPolicy};
pub use values::{qualified_range, ValueRange};

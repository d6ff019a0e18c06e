//! chatledger-store-json
//!
//! `TabularStore` implementations backed by an in-process workbook:
//! a volatile in-memory store and a JSON file store with rolling backups.

pub mod error;
pub mod json;
pub mod memory;
pub mod workbook;

pub use error::StoreError;
pub use json::{BackupInfo, JsonWorkbookStore};
pub use memory::MemoryWorkbookStore;
pub use workbook::{SheetData, Workbook};

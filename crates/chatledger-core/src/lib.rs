//! chatledger-core
//!
//! Command interpretation and ledger update logic.
//! Depends on chatledger-domain. No transport, no terminal I/O, no concrete storage.

pub mod addresser;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod interpreter;
pub mod locator;
pub mod locks;
pub mod reply;
pub mod row_matcher;
pub mod slot_scanner;
pub mod store;
pub mod time;
pub mod tokenizer;


pub use addresser::*;
pub use classifier::*;
pub use engine::*;
pub use error::CoreError;
pub use extractor::*;
pub use interpreter::*;
pub use locator::*;
pub use locks::SheetLocks;
pub use row_matcher::*;
pub use slot_scanner::*;
pub use store::TabularStore;
pub use time::{Clock, FixedClock};
pub use tokenizer::*;

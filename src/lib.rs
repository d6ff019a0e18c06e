#![doc(test(attr(deny(warnings))))]

//! Chat Ledger turns short chat commands into rows of a monthly spreadsheet
//! ledger. This crate wires configuration, storage backends, the chat
//! transport, and the health endpoint around the engine in `chatledger-core`.

pub mod app;
pub mod clock;
pub mod dispatcher;
pub mod errors;
pub mod health;
pub mod transport;
pub mod utils;

pub use utils::build_info::BuildInfo;

/// Initializes global tracing. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

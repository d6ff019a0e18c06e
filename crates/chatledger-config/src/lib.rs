//! chatledger-config
//!
//! Service configuration model.
//! Owns the Config data structure, environment overrides, and disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{BackendConfig, Config, SheetLayout};

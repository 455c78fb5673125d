//! Utility functions and helpers.

pub mod exchange_log;
pub mod settings;

pub use exchange_log::{ExchangeLogger, FileExchangeLogger};
pub use settings::Settings;

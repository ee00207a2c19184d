//! Utility modules for common functionality.
//!
//! - logging: Subscriber setup for hosts of the ledger adapters

pub mod logging;

pub use logging::{setup_logging, setup_logging_with_writer, LoggingOptions};

//! Utility modules for dalec-mapper

pub mod logging;

pub use logging::{init_logging, LoggingConfig};

//! Utility modules for reprokit

pub mod logging;

pub use logging::{init_logging, init_with, LoggingConfig};

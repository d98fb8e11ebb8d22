//! Logging utilities.
//!
//! Centralizes logger initialization behind the `log` facade with an
//! `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};

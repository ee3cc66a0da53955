//! Error types for the spigot bridge.
//!
//! The generator core itself has no recoverable error path: misuse of an
//! unstarted handle panics, backpressure loss is a documented delivery
//! policy, and supply exhaustion is signalled as `None`. The variants here
//! cover the ambient configuration surface only.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration and logging-setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log directive: {0}")]
    InvalidLogDirective(String),

    #[error("Invalid log format: {0} (must be 'json' or 'text')")]
    InvalidLogFormat(String),

    #[error("Invalid log output: {0} (must be 'stdout' or 'file')")]
    InvalidLogOutput(String),

    #[error("Failed to prepare log file {path:?}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

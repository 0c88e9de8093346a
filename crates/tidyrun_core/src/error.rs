//! Driver error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing or running a dispatch.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Directory traversal error.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The analysis tool could not be spawned.
    ///
    /// A non-zero tool exit is not an error; this covers the binary
    /// disappearing between resolution and execution.
    #[error("Failed to spawn {}: {}", .tool.display(), .source)]
    Spawn {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked.
    #[error("Worker thread '{0}' panicked")]
    WorkerPanic(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

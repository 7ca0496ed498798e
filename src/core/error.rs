//! Error types for the logger system

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Async writer queue is at capacity; the payload was dropped
    #[error("Async writer full: {current}/{max} payloads queued")]
    QueueFull { current: usize, max: usize },

    /// Writer already closed
    #[error("Writer already closed")]
    WriterClosed,

    /// Logger has no output configured
    #[error("No output configured")]
    NoOutput,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Raw level value outside the known range
    #[error("Invalid log level {0}")]
    InvalidLevel(u32),

    /// Level name that does not parse
    #[error("Invalid log level: '{0}'")]
    ParseLevel(String),

    /// Background worker did not finish in time
    #[error("Writer did not drain within {0:?}")]
    ShutdownTimeout(Duration),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a queue full error with buffer details
    pub fn queue_full(current: usize, max: usize) -> Self {
        LoggerError::QueueFull { current, max }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error is the non-fatal "queue full" drop signal
    #[must_use]
    pub fn is_capacity(&self) -> bool {
        matches!(self, LoggerError::QueueFull { .. })
    }
}

//! Sink implementations

pub mod async_writer;
pub mod console;
pub mod file;
pub mod hourly;

pub use async_writer::{AsyncWriter, DEFAULT_ASYNC_CAPACITY};
pub use console::{ConsoleSink, ConsoleTarget};
pub use file::FileSink;
pub use hourly::{
    hourly_output, HourlyRotator, RotatorConfig, DEFAULT_CLEANUP_INTERVAL, DEFAULT_MAX_FILES,
    DEFAULT_MAX_SIZE,
};

pub use crate::core::Sink;

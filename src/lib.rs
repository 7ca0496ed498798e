//! # Rust Pooled Logger
//!
//! A leveled logging library built around a low-allocation hot path.
//!
//! ## Features
//!
//! - **Pooled entries**: log records and format buffers are recycled through
//!   process-wide pools, so steady-state logging barely allocates
//! - **Caller and trace capture**: every line can carry `file:line`, the
//!   calling function and a per-thread trace id
//! - **Hourly rotation**: `{base}{YYYYMMDDHH}.log` files with size limits,
//!   a `{base}.log` symlink and bounded retention
//! - **Async writes**: a non-blocking queue drained by one background thread
//!
//! ```
//! use rust_pooled_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .level(LogLevel::Info)
//!     .output(sink.clone())
//!     .prefix("[APP]")
//!     .build();
//!
//! logger.info("ready");
//! assert!(sink.contents_string().starts_with("[APP] ("));
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        hourly_output, AsyncWriter, ConsoleSink, FileSink, HourlyRotator, RotatorConfig,
    };
    pub use crate::core::{
        Format, FormatFull, Formatter, JsonFormatter, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, MemorySink, MultiSink, OutputConfig, Result, Sink, TraceGuard,
        WriterMetrics, WriterSink, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use crate::appenders::{
    hourly_output, AsyncWriter, ConsoleSink, ConsoleTarget, FileSink, HourlyRotator,
    RotatorConfig,
};
pub use crate::core::{
    global, trace, Format, FormatFull, Formatter, FormatterKind, JsonFormatter, LogEntry,
    LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, MemorySink, MultiSink,
    ObjectPool, OutputConfig, Result, Sink, TraceGuard, WriterMetrics, WriterSink,
    DEFAULT_SHUTDOWN_TIMEOUT, START_MSG,
};

//! Core logger types and traits

pub mod config;
pub mod error;
pub mod formatter;
pub mod global;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pool;
pub mod sink;
pub mod trace;

pub use config::{FormatterKind, LoggerConfig, OutputConfig};
pub use error::{LoggerError, Result};
pub use formatter::{split_package_name, Format, FormatFull, Formatter, JsonFormatter};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT, START_MSG};
pub use metrics::WriterMetrics;
pub use pool::{ObjectPool, Pooled};
pub use sink::{MemorySink, MultiSink, Sink, WriterSink};
pub use trace::TraceGuard;

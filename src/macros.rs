//! Logging macros for ergonomic log message formatting.
//!
//! Unlike the plain logger methods, the macros also record the qualified
//! name of the enclosing function, so each line carries `module/path`,
//! `file:line` and the function name. Arguments are only formatted when the
//! level is enabled.
//!
//! # Examples
//!
//! ```
//! use rust_pooled_logger::prelude::*;
//! use rust_pooled_logger::info;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().output(sink.clone()).build();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! assert!(sink.contents_string().contains("Server listening on port 8080"));
//! ```

#[doc(hidden)]
pub fn type_name_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

#[doc(hidden)]
pub fn strip_marker(name: &'static str) -> &'static str {
    name.strip_suffix("::__marker").unwrap_or(name)
}

/// Qualified name of the enclosing function, e.g. `app::net::serve`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __marker() {}
        $crate::macros::strip_marker($crate::macros::type_name_of(__marker))
    }};
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_pooled_logger::prelude::*;
/// # let logger = Logger::builder().no_output().build();
/// use rust_pooled_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_from($level, $crate::__function_name!(), format_args!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// ```
/// # use rust_pooled_logger::prelude::*;
/// # let mut logger = Logger::builder().no_output().build();
/// # logger.set_level(LogLevel::Trace);
/// use rust_pooled_logger::trace;
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at fatal level, flush, and exit the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Log at panic level, flush, and panic with the formatted line.
///
/// ```should_panic
/// # use rust_pooled_logger::prelude::*;
/// # let logger = Logger::builder().no_output().build();
/// use rust_pooled_logger::panic_log;
/// panic_log!(logger, "invariant broken: {}", "queue empty");
/// ```
#[macro_export]
macro_rules! panic_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Panic, $($arg)+)
    };
}

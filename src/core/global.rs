//! Process-wide default logger
//!
//! Built on first use with [`Logger::new`] defaults. The free functions
//! below delegate to it; setters take the write lock, logging calls only
//! the read lock, so concurrent logging never serializes on the logger.
//!
//! ```
//! use rust_pooled_logger::core::global;
//!
//! global::info("service started");
//! global::infof(format_args!("listening on port {}", 8080));
//! ```

use super::error::Result;
use super::formatter::Format;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::sink::Sink;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};

pub fn default_logger() -> &'static RwLock<Logger> {
    static LOGGER: OnceLock<RwLock<Logger>> = OnceLock::new();
    LOGGER.get_or_init(|| RwLock::new(Logger::new()))
}

/// Independent copy of the default logger, for deriving scoped loggers.
pub fn clone_logger() -> Logger {
    default_logger().read().clone()
}

/// Replace the default logger wholesale.
pub fn replace(logger: Logger) -> Logger {
    std::mem::replace(&mut *default_logger().write(), logger)
}

pub fn level() -> LogLevel {
    default_logger().read().level()
}

pub fn set_level(level: LogLevel) {
    default_logger().write().set_level(level);
}

pub fn set_output(sinks: Vec<Arc<dyn Sink>>) {
    default_logger().write().set_output(sinks);
}

pub fn set_formatter(format: Arc<dyn Format>) {
    default_logger().write().set_formatter(format);
}

pub fn set_prefix_msg(prefix: impl AsRef<[u8]>) {
    default_logger().write().set_prefix_msg(prefix);
}

pub fn append_prefix_msg(more: impl AsRef<[u8]>) {
    default_logger().write().append_prefix_msg(more);
}

pub fn set_suffix_msg(suffix: impl AsRef<[u8]>) {
    default_logger().write().set_suffix_msg(suffix);
}

pub fn append_suffix_msg(more: impl AsRef<[u8]>) {
    default_logger().write().append_suffix_msg(more);
}

pub fn enable_caller(enable: bool) {
    default_logger().write().enable_caller(enable);
}

pub fn enable_trace(enable: bool) {
    default_logger().write().enable_trace(enable);
}

/// See [`Logger::parsing_and_escaping`]; panics on a formatter without
/// runtime toggles.
pub fn parsing_and_escaping(disable: bool) {
    default_logger().write().parsing_and_escaping(disable);
}

/// See [`Logger::caller`]; panics on a formatter without runtime toggles.
pub fn caller(disable: bool) {
    default_logger().write().caller(disable);
}

pub fn sync() -> Result<()> {
    default_logger().read().sync()
}

pub fn close() -> Result<()> {
    default_logger().read().close()
}

#[track_caller]
pub fn start_msg() {
    default_logger().read().start_msg();
}

#[track_caller]
pub fn log(level: LogLevel, msg: impl fmt::Display) {
    default_logger().read().log(level, msg);
}

#[track_caller]
pub fn trace(msg: impl fmt::Display) {
    default_logger().read().trace(msg);
}

#[track_caller]
pub fn debug(msg: impl fmt::Display) {
    default_logger().read().debug(msg);
}

#[track_caller]
pub fn print(msg: impl fmt::Display) {
    default_logger().read().print(msg);
}

#[track_caller]
pub fn info(msg: impl fmt::Display) {
    default_logger().read().info(msg);
}

#[track_caller]
pub fn warn(msg: impl fmt::Display) {
    default_logger().read().warn(msg);
}

#[track_caller]
pub fn warning(msg: impl fmt::Display) {
    default_logger().read().warning(msg);
}

#[track_caller]
pub fn error(msg: impl fmt::Display) {
    default_logger().read().error(msg);
}

#[track_caller]
pub fn fatal(msg: impl fmt::Display) {
    default_logger().read().fatal(msg);
}

#[track_caller]
pub fn panic(msg: impl fmt::Display) {
    default_logger().read().panic(msg);
}

#[track_caller]
pub fn tracef(args: fmt::Arguments<'_>) {
    default_logger().read().tracef(args);
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    default_logger().read().debugf(args);
}

#[track_caller]
pub fn printf(args: fmt::Arguments<'_>) {
    default_logger().read().printf(args);
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    default_logger().read().infof(args);
}

#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    default_logger().read().warnf(args);
}

#[track_caller]
pub fn warningf(args: fmt::Arguments<'_>) {
    default_logger().read().warningf(args);
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    default_logger().read().errorf(args);
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) {
    default_logger().read().fatalf(args);
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) {
    default_logger().read().panicf(args);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::Formatter;
    use crate::core::sink::MemorySink;

    // The default logger is process-wide; keep every assertion about it in
    // one test so parallel tests cannot interfere.
    #[test]
    fn test_default_logger_roundtrip() {
        let sink = MemorySink::new();
        let previous = replace(
            Logger::builder()
                .output(sink.clone())
                .formatter(Formatter::plain())
                .build(),
        );
        assert_eq!(previous.level(), LogLevel::Debug);

        set_level(LogLevel::Info);
        set_prefix_msg("[G]");
        let line = line!() + 1;
        info("global ready");
        debug("filtered");
        infof(format_args!("{}-{}", "a", 1));
        warning("low disk");

        let out = sink.contents_string();
        assert!(out.starts_with("[G] ("), "{}", out);
        assert!(out.contains(&format!("global.rs:{} ", line)), "{}", out);
        assert!(out.contains("[info] a-1"));
        assert!(out.contains("[warn] low disk"));
        assert!(!out.contains("filtered"));

        let mut scoped = clone_logger();
        scoped.set_prefix_msg("[S]");
        assert_eq!(default_logger().read().prefix_msg(), b"[G]");

        replace(previous);
        assert_eq!(level(), LogLevel::Debug);
    }
}

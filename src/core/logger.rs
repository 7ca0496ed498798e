//! Main logger implementation

use super::{
    error::{LoggerError, Result},
    formatter::{split_package_into, Format, FormatFull, Formatter},
    log_entry::LogEntry,
    log_level::LogLevel,
    pool::{buffer_pool, entry_pool},
    sink::{MultiSink, Sink},
    trace,
};
use crate::appenders::ConsoleSink;
use chrono::Local;
use std::fmt::{self, Write as _};
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// How long closing a background writer may take before giving up (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Marker line written by [`Logger::start_msg`]
pub const START_MSG: &str = "========== start new log ==========";

/// Level-gated dispatch from logging calls to a formatter and a sink.
///
/// Setters take `&mut self`; share a configured logger behind an `Arc` or
/// derive child loggers with [`Clone`]. Clones share the sink and the
/// prefix/suffix bytes but own an independent formatter whenever the
/// formatter supports [`FormatFull`].
pub struct Logger {
    level: LogLevel,
    out: Option<Arc<dyn Sink>>,
    format: Arc<dyn Format>,
    prefix: Arc<[u8]>,
    suffix: Arc<[u8]>,
    enable_caller: bool,
    enable_trace: bool,
}

impl Logger {
    /// Logger at `Debug` writing to stdout, with caller and trace capture
    /// on and multi-line splitting off.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: LogLevel::Debug,
            out: Some(Arc::new(ConsoleSink::stdout())),
            format: Arc::new(Formatter::new().disable_parsing_and_escaping(true)),
            prefix: Arc::from(&[][..]),
            suffix: Arc::from(&[][..]),
            enable_caller: true,
            enable_trace: true,
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_pooled_logger::prelude::*;
    ///
    /// let sink = MemorySink::new();
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Info)
    ///     .output(sink.clone())
    ///     .formatter(Formatter::plain())
    ///     .prefix("[APP]")
    ///     .build();
    ///
    /// logger.info("ready");
    /// logger.debug("skip");
    /// assert!(sink.contents_string().contains("[info] ready"));
    /// assert!(!sink.contents_string().contains("skip"));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Get the minimum level this logger emits
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Set the minimum level
    ///
    /// Messages less severe than `level` return before an entry is taken
    /// from the pool, so filtered calls cost one comparison.
    pub fn set_level(&mut self, level: LogLevel) -> &mut Self {
        self.level = level;
        self
    }

    /// Whether a message at `level` would be emitted
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level.enables(level)
    }

    /// Replace the output. No sinks leaves the logger without output, one
    /// sink is used directly and several are fanned out to.
    pub fn set_output(&mut self, sinks: Vec<Arc<dyn Sink>>) -> &mut Self {
        self.out = match sinks.len() {
            0 => None,
            1 => sinks.into_iter().next(),
            _ => Some(Arc::new(MultiSink::new(sinks))),
        };
        self
    }

    /// Get the active output, `None` when the logger has no sink
    pub fn output(&self) -> Option<&Arc<dyn Sink>> {
        self.out.as_ref()
    }

    /// Replace the formatter
    ///
    /// A formatter that does not implement [`FormatFull`] makes
    /// [`parsing_and_escaping`](Self::parsing_and_escaping) and
    /// [`caller`](Self::caller) panic, and clones of this logger share it.
    pub fn set_formatter(&mut self, format: Arc<dyn Format>) -> &mut Self {
        self.format = format;
        self
    }

    /// Get the active formatter
    pub fn formatter(&self) -> &Arc<dyn Format> {
        &self.format
    }

    /// Set the bytes written at the start of every line
    ///
    /// A non-empty prefix is followed by a single space.
    pub fn set_prefix_msg(&mut self, prefix: impl AsRef<[u8]>) -> &mut Self {
        self.prefix = Arc::from(prefix.as_ref());
        self
    }

    /// Append to the current prefix
    pub fn append_prefix_msg(&mut self, more: impl AsRef<[u8]>) -> &mut Self {
        self.prefix = concat(&self.prefix, more.as_ref());
        self
    }

    /// Get the current prefix
    pub fn prefix_msg(&self) -> &[u8] {
        &self.prefix
    }

    /// Set the bytes written after the caller segment, before the newline
    pub fn set_suffix_msg(&mut self, suffix: impl AsRef<[u8]>) -> &mut Self {
        self.suffix = Arc::from(suffix.as_ref());
        self
    }

    /// Append to the current suffix
    pub fn append_suffix_msg(&mut self, more: impl AsRef<[u8]>) -> &mut Self {
        self.suffix = concat(&self.suffix, more.as_ref());
        self
    }

    /// Get the current suffix
    pub fn suffix_msg(&self) -> &[u8] {
        &self.suffix
    }

    /// Toggle capture of the calling file, line and function.
    pub fn enable_caller(&mut self, enable: bool) -> &mut Self {
        self.enable_caller = enable;
        self
    }

    /// Toggle attaching the thread id and its trace id.
    pub fn enable_trace(&mut self, enable: bool) -> &mut Self {
        self.enable_trace = enable;
        self
    }

    fn full_format(&self) -> &dyn FormatFull {
        match self.format.as_full() {
            Some(full) => full,
            None => panic!("formatter does not support runtime configuration"),
        }
    }

    /// `true` keeps multi-line messages on one line.
    ///
    /// # Panics
    ///
    /// If the active formatter does not implement [`FormatFull`].
    pub fn parsing_and_escaping(&mut self, disable: bool) -> &mut Self {
        self.full_format().parsing_and_escaping(disable);
        self
    }

    /// `true` hides the caller segment of each line.
    ///
    /// # Panics
    ///
    /// If the active formatter does not implement [`FormatFull`].
    pub fn caller(&mut self, disable: bool) -> &mut Self {
        self.full_format().caller(disable);
        self
    }

    /// Flush the output
    ///
    /// # Errors
    ///
    /// [`LoggerError::NoOutput`] when the logger has no sink, otherwise
    /// whatever the sink reports.
    pub fn sync(&self) -> Result<()> {
        self.out.as_ref().ok_or(LoggerError::NoOutput)?.sync()
    }

    /// Close the output
    ///
    /// Clones share the sink, so closing it here closes it for them too.
    pub fn close(&self) -> Result<()> {
        self.out.as_ref().ok_or(LoggerError::NoOutput)?.close()
    }

    /// Write the start-of-log marker line at info level
    #[track_caller]
    pub fn start_msg(&self) {
        self.info(START_MSG);
    }

    /// Log `msg` at `level`, attributing the line to the caller's location
    #[track_caller]
    pub fn log(&self, level: LogLevel, msg: impl fmt::Display) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, "", Location::caller(), msg);
    }

    /// Entry point of the logging macros, which also pass the qualified
    /// name of the calling function.
    #[doc(hidden)]
    #[track_caller]
    pub fn log_from(&self, level: LogLevel, function: &str, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, function, Location::caller(), args);
    }

    fn dispatch(
        &self,
        level: LogLevel,
        function: &str,
        location: &Location<'_>,
        msg: impl fmt::Display,
    ) {
        let mut pooled_entry = entry_pool().get();
        let entry: &mut LogEntry = &mut pooled_entry;

        entry.time = Local::now();
        entry.level = level;
        let _ = write!(entry.message, "{}", msg);

        if self.enable_trace {
            entry.gid = trace::current_gid();
            trace::write_trace(entry.gid, &mut entry.trace_id);
        }

        if self.enable_caller {
            fill_caller(entry, function, location);
        }

        if !self.prefix.is_empty() {
            entry.prefix.extend_from_slice(&self.prefix);
        }
        if !self.suffix.is_empty() {
            entry.suffix.extend_from_slice(&self.suffix);
        }

        let mut buf = buffer_pool().get();
        self.format.format(entry, &mut buf);
        self.write(level, &buf);
    }

    fn write(&self, level: LogLevel, buf: &[u8]) {
        if let Some(out) = &self.out {
            let _ = out.write(buf);
        }

        match level {
            LogLevel::Panic => {
                let _ = self.sync();
                panic!("{}", String::from_utf8_lossy(buf));
            }
            LogLevel::Fatal => {
                let _ = self.sync();
                std::process::exit(1);
            }
            _ => {}
        }
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Trace, msg);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Debug, msg);
    }

    /// Alias of [`debug`](Self::debug)
    #[inline]
    #[track_caller]
    pub fn print(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Debug, msg);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Info, msg);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Warn, msg);
    }

    /// Alias of [`warn`](Self::warn)
    #[inline]
    #[track_caller]
    pub fn warning(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Warn, msg);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Error, msg);
    }

    /// Logs, flushes the output and exits the process with status 1.
    #[inline]
    #[track_caller]
    pub fn fatal(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Fatal, msg);
    }

    /// Logs, flushes the output and panics with the formatted line.
    #[inline]
    #[track_caller]
    pub fn panic(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Panic, msg);
    }

    /// ```
    /// # use rust_pooled_logger::{Logger, MemorySink};
    /// let sink = MemorySink::new();
    /// let logger = Logger::builder().output(sink.clone()).build();
    /// logger.tracef(format_args!("not at {}", "debug"));
    /// logger.debugf(format_args!("{} + {} = {}", 1, 2, 1 + 2));
    /// assert!(sink.contents_string().contains("1 + 2 = 3"));
    /// assert!(!sink.contents_string().contains("not at"));
    /// ```
    #[inline]
    #[track_caller]
    pub fn tracef(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, args);
    }

    #[inline]
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    #[inline]
    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    #[inline]
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    #[inline]
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    #[inline]
    #[track_caller]
    pub fn warningf(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    #[inline]
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }

    #[inline]
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, args);
    }

    #[inline]
    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Panic, args);
    }
}

fn concat(head: &[u8], tail: &[u8]) -> Arc<[u8]> {
    let mut bytes = Vec::with_capacity(head.len() + tail.len());
    bytes.extend_from_slice(head);
    bytes.extend_from_slice(tail);
    Arc::from(bytes)
}

/// Resolve file, line, directory and function for the entry.
///
/// With a qualified function name the directory is its module path;
/// otherwise the directory of the source file is used and the function
/// stays empty.
fn fill_caller(entry: &mut LogEntry, function: &str, location: &Location<'_>) {
    let file = location.file();
    entry.file.push_str(file);
    entry.caller_line = location.line();

    if function.is_empty() {
        if let Some(parent) = Path::new(file).parent().and_then(Path::to_str) {
            entry.caller_dir.push_str(parent);
        }
        return;
    }

    entry.caller_name.push_str(function);
    split_package_into(function, &mut entry.caller_dir, &mut entry.caller_func);
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Logger {
    fn clone(&self) -> Self {
        let format = match self.format.as_full() {
            Some(full) => full.clone_format(),
            None => Arc::clone(&self.format),
        };

        Self {
            level: self.level,
            out: self.out.clone(),
            format,
            prefix: Arc::clone(&self.prefix),
            suffix: Arc::clone(&self.suffix),
            enable_caller: self.enable_caller,
            enable_trace: self.enable_trace,
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("output", &self.out.as_ref().map(|out| out.name()))
            .field("prefix", &String::from_utf8_lossy(&self.prefix))
            .field("suffix", &String::from_utf8_lossy(&self.suffix))
            .field("enable_caller", &self.enable_caller)
            .field("enable_trace", &self.enable_trace)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Without any [`output`](Self::output) the logger writes to stdout; call
/// [`no_output`](Self::no_output) for a logger that discards everything.
pub struct LoggerBuilder {
    level: LogLevel,
    outputs: Option<Vec<Arc<dyn Sink>>>,
    format: Option<Arc<dyn Format>>,
    prefix: Vec<u8>,
    suffix: Vec<u8>,
    enable_caller: bool,
    enable_trace: bool,
    disable_parsing: Option<bool>,
    disable_caller_segment: Option<bool>,
}

impl LoggerBuilder {
    /// Builder starting from the [`Logger::new`] defaults
    pub fn new() -> Self {
        Self {
            level: LogLevel::Debug,
            outputs: None,
            format: None,
            prefix: Vec::new(),
            suffix: Vec::new(),
            enable_caller: true,
            enable_trace: true,
            disable_parsing: None,
            disable_caller_segment: None,
        }
    }

    /// Set the minimum level (default `Debug`)
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Add a sink. Several sinks receive every line.
    #[must_use = "builder methods return a new value"]
    pub fn output<S: Sink + 'static>(self, sink: S) -> Self {
        self.shared_output(Arc::new(sink))
    }

    /// Add a sink that is already shared, e.g. a rotator from
    /// [`hourly_output`](crate::appenders::hourly_output)
    #[must_use = "builder methods return a new value"]
    pub fn shared_output(mut self, sink: Arc<dyn Sink>) -> Self {
        self.outputs.get_or_insert_with(Vec::new).push(sink);
        self
    }

    /// Build without any sink; `sync` and `close` then return
    /// [`LoggerError::NoOutput`]
    #[must_use = "builder methods return a new value"]
    pub fn no_output(mut self) -> Self {
        self.outputs = Some(Vec::new());
        self
    }

    /// Use `format` instead of the colored text [`Formatter`]
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Format + 'static>(mut self, format: F) -> Self {
        self.format = Some(Arc::new(format));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl AsRef<[u8]>) -> Self {
        self.prefix = prefix.as_ref().to_vec();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn suffix(mut self, suffix: impl AsRef<[u8]>) -> Self {
        self.suffix = suffix.as_ref().to_vec();
        self
    }

    /// Capture the calling location (default on)
    #[must_use = "builder methods return a new value"]
    pub fn caller(mut self, enable: bool) -> Self {
        self.enable_caller = enable;
        self
    }

    /// Attach thread and trace ids (default on)
    #[must_use = "builder methods return a new value"]
    pub fn trace(mut self, enable: bool) -> Self {
        self.enable_trace = enable;
        self
    }

    /// Forwarded to the formatter at build time; see
    /// [`Logger::parsing_and_escaping`].
    #[must_use = "builder methods return a new value"]
    pub fn parsing_and_escaping(mut self, disable: bool) -> Self {
        self.disable_parsing = Some(disable);
        self
    }

    /// Forwarded to the formatter at build time; see [`Logger::caller`].
    #[must_use = "builder methods return a new value"]
    pub fn hide_caller(mut self, disable: bool) -> Self {
        self.disable_caller_segment = Some(disable);
        self
    }

    /// Build the Logger
    ///
    /// # Panics
    ///
    /// If formatter toggles were requested for a formatter without
    /// [`FormatFull`] support.
    pub fn build(self) -> Logger {
        let mut logger = Logger::new();
        logger.level = self.level;
        logger.enable_caller = self.enable_caller;
        logger.enable_trace = self.enable_trace;
        logger.prefix = Arc::from(self.prefix);
        logger.suffix = Arc::from(self.suffix);

        if let Some(format) = self.format {
            logger.format = format;
        }
        if let Some(disable) = self.disable_parsing {
            logger.parsing_and_escaping(disable);
        }
        if let Some(disable) = self.disable_caller_segment {
            logger.caller(disable);
        }
        if let Some(outputs) = self.outputs {
            logger.set_output(outputs);
        }

        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::JsonFormatter;
    use crate::core::sink::MemorySink;

    fn memory_logger(level: LogLevel) -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .level(level)
            .output(sink.clone())
            .formatter(Formatter::plain())
            .build();
        (logger, sink)
    }

    #[test]
    fn test_defaults() {
        let logger = Logger::new();
        assert_eq!(logger.level(), LogLevel::Debug);
        assert_eq!(logger.output().map(|o| o.name()), Some("stdout"));
        assert!(logger.prefix_msg().is_empty());
    }

    #[test]
    fn test_level_gate() {
        let (logger, sink) = memory_logger(LogLevel::Error);
        logger.warn("filtered");
        assert!(sink.is_empty());
        logger.error("kept");
        assert!(sink.contents_string().contains("[error] kept"));
    }

    #[test]
    fn test_concrete_line() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .level(LogLevel::Info)
            .output(sink.clone())
            .formatter(Formatter::plain())
            .prefix("[APP]")
            .build();

        let line = line!() + 1;
        logger.info("ready");
        let out = sink.contents_string();
        assert!(out.starts_with(&format!("[APP] ({}.", std::process::id())), "{}", out);
        assert!(out.contains("[info] ready [ "));
        assert!(out.contains(&format!("logger.rs:{} ", line)), "{}", out);
        assert!(out.ends_with("]\n"));

        let len = sink.len();
        logger.debug("skip");
        assert_eq!(sink.len(), len);
    }

    #[test]
    fn test_formatted_variants() {
        let (logger, sink) = memory_logger(LogLevel::Trace);
        logger.infof(format_args!("user {} logged in", 42));
        logger.printf(format_args!("debug alias"));
        logger.warning("disk at 90%");
        logger.warningf(format_args!("retry {} of {}", 2, 3));
        let out = sink.contents_string();
        assert!(out.contains("[info] user 42 logged in"));
        assert!(out.contains("[debug] debug alias"));
        assert!(out.contains("[warn] disk at 90%"));
        assert!(out.contains("[warn] retry 2 of 3"));
    }

    #[test]
    fn test_log_from_uses_function_name() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        logger.log_from(LogLevel::Warn, "app::net::serve", format_args!("slow"));
        assert!(sink.contents_string().contains(" [ app/net/logger.rs:"));
        assert!(sink.contents_string().contains(" serve ]"));
    }

    #[test]
    fn test_caller_and_trace_disabled() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .output(sink.clone())
            .formatter(Formatter::plain())
            .caller(false)
            .trace(false)
            .hide_caller(true)
            .build();
        logger.info("bare");
        let out = sink.contents_string();
        assert!(out.ends_with("[info] bare\n"), "{}", out);
        assert!(out.contains(".0) "));
    }

    #[test]
    fn test_trace_id_attached() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        std::thread::spawn(move || {
            let _guard = trace::TraceGuard::new("req-7");
            logger.info("traced");
        })
        .join()
        .unwrap();
        assert!(sink.contents_string().contains(" req-7 ]"));
    }

    #[test]
    fn test_prefix_suffix_append() {
        let (mut logger, sink) = memory_logger(LogLevel::Info);
        logger.set_prefix_msg("[A]").append_prefix_msg("[B]");
        logger.set_suffix_msg(" #").append_suffix_msg("1");
        assert_eq!(logger.prefix_msg(), b"[A][B]");
        logger.info("x");
        let out = sink.contents_string();
        assert!(out.starts_with("[A][B] ("));
        assert!(out.ends_with("] #1\n"));
    }

    #[test]
    fn test_set_output_variants() {
        let (mut logger, first) = memory_logger(LogLevel::Info);
        logger.set_output(Vec::new());
        assert!(logger.output().is_none());
        logger.info("dropped");
        assert!(matches!(logger.sync(), Err(LoggerError::NoOutput)));

        let second = MemorySink::new();
        logger.set_output(vec![Arc::new(first.clone()), Arc::new(second.clone())]);
        logger.info("twice");
        assert_eq!(first.contents(), second.contents());
        assert!(!first.contents_string().contains("dropped"));
    }

    #[test]
    fn test_multiline_toggle() {
        let (mut logger, sink) = memory_logger(LogLevel::Info);
        logger.info("a\nb");
        assert_eq!(sink.contents_string().lines().count(), 2);

        sink.clear();
        logger.parsing_and_escaping(true);
        logger.info("a\nb");
        assert_eq!(sink.contents_string().matches("[info]").count(), 1);
    }

    #[test]
    fn test_clone_independence() {
        let (mut original, sink) = memory_logger(LogLevel::Info);
        original.set_prefix_msg("[P]");

        let mut child = original.clone();
        child.set_level(LogLevel::Trace).set_prefix_msg("[C]");
        child.caller(true);

        assert_eq!(original.level(), LogLevel::Info);
        assert_eq!(original.prefix_msg(), b"[P]");

        original.info("from original");
        child.info("from child");
        let out = sink.contents_string();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("logger.rs:"));
        assert!(!lines[1].contains("logger.rs:"));
        assert!(lines[1].starts_with("[C] "));
    }

    #[test]
    #[should_panic(expected = "formatter does not support runtime configuration")]
    fn test_toggle_on_minimal_formatter_panics() {
        let mut logger = Logger::builder().formatter(JsonFormatter).no_output().build();
        logger.caller(true);
    }

    #[test]
    fn test_clone_shares_minimal_formatter() {
        let logger = Logger::builder().formatter(JsonFormatter).no_output().build();
        let child = logger.clone();
        assert!(Arc::ptr_eq(logger.formatter(), child.formatter()));
    }

    #[test]
    fn test_panic_level_flushes_then_panics() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic("boom");
        }));
        let payload = result.unwrap_err();
        let message = payload.downcast_ref::<String>().unwrap();
        assert!(message.contains("[panic] boom"));
        assert!(sink.contents_string().contains("[panic] boom"));
    }

    #[test]
    fn test_start_msg() {
        let (logger, sink) = memory_logger(LogLevel::Info);
        logger.start_msg();
        assert!(sink.contents_string().contains(START_MSG));
    }
}

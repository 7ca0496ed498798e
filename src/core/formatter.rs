//! Rendering of log entries into output bytes
//!
//! [`Format`] is the minimal contract: turn an entry into bytes appended to
//! a caller-supplied buffer. [`FormatFull`] adds the runtime toggles and
//! cloning the logger relies on; formatters that do not provide it cannot be
//! reconfigured through the logger.
//!
//! The text layout produced by [`Formatter`] is
//! `[prefix ](pid.gid) TIMESTAMP [level] message [ dir/file:line func traceid ]suffix\n`.

use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use colored::Color;
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// `2025-01-08 10:30:45.123+08:00`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f%:z";

const COLOR_END: &[u8] = b"\x1b[0m";

pub trait Format: Send + Sync {
    /// Append the rendering of `entry` to `out`. Never fails.
    fn format(&self, entry: &LogEntry, out: &mut Vec<u8>);

    /// Runtime-configurable view of this formatter, if it has one
    fn as_full(&self) -> Option<&dyn FormatFull> {
        None
    }
}

pub trait FormatFull: Format {
    /// `true` renders the message as a single line even if it contains
    /// newlines; `false` splits it into one formatted line per `\n`.
    fn parsing_and_escaping(&self, disable: bool);

    /// `true` omits the caller segment.
    fn caller(&self, disable: bool);

    /// Independent copy with the same settings
    fn clone_format(&self) -> Arc<dyn Format>;
}

/// Default text formatter with ANSI colored levels
#[derive(Debug)]
pub struct Formatter {
    disable_parsing_and_escaping: AtomicBool,
    disable_caller: AtomicBool,
    use_colors: bool,
}

impl Formatter {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            disable_parsing_and_escaping: AtomicBool::new(false),
            disable_caller: AtomicBool::new(false),
            use_colors,
        }
    }

    /// Formatter without escape sequences, suited to files
    pub fn plain() -> Self {
        Self::with_colors(false)
    }

    #[must_use]
    pub fn disable_parsing_and_escaping(self, disable: bool) -> Self {
        self.disable_parsing_and_escaping.store(disable, Ordering::Relaxed);
        self
    }

    #[must_use]
    pub fn disable_caller(self, disable: bool) -> Self {
        self.disable_caller.store(disable, Ordering::Relaxed);
        self
    }

    pub fn is_parsing_disabled(&self) -> bool {
        self.disable_parsing_and_escaping.load(Ordering::Relaxed)
    }

    pub fn is_caller_disabled(&self) -> bool {
        self.disable_caller.load(Ordering::Relaxed)
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    fn color(&self, out: &mut Vec<u8>, color: Color) {
        if self.use_colors {
            let _ = write!(out, "\x1b[{}m", color.to_fg_str());
        }
    }

    fn color_end(&self, out: &mut Vec<u8>) {
        if self.use_colors {
            out.extend_from_slice(COLOR_END);
        }
    }

    fn format_line(&self, entry: &LogEntry, message: &str, out: &mut Vec<u8>) {
        if !entry.prefix.is_empty() {
            out.extend_from_slice(&entry.prefix);
            out.push(b' ');
        }

        let _ = write!(
            out,
            "({}.{}) {}",
            entry.pid,
            entry.gid,
            entry.time.format(TIMESTAMP_FORMAT)
        );

        self.color(out, entry.level.color_code());
        let _ = write!(out, " [{}] ", entry.level);
        self.color_end(out);

        out.extend_from_slice(message.trim().as_bytes());

        let show_caller = !self.is_caller_disabled();
        if show_caller || !entry.trace_id.is_empty() {
            self.color(out, Color::Cyan);
            out.extend_from_slice(b" [ ");

            if show_caller {
                if !entry.caller_dir.is_empty() {
                    out.extend_from_slice(entry.caller_dir.as_bytes());
                    out.push(b'/');
                }
                out.extend_from_slice(base_name(&entry.file).as_bytes());
                let _ = write!(out, ":{} ", entry.caller_line);
                if !entry.caller_func.is_empty() {
                    out.extend_from_slice(entry.caller_func.as_bytes());
                    out.push(b' ');
                }
            }

            if !entry.trace_id.is_empty() {
                out.extend_from_slice(entry.trace_id.as_bytes());
                out.push(b' ');
            }

            out.push(b']');
            self.color_end(out);
        }

        out.extend_from_slice(&entry.suffix);
        out.push(b'\n');
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for Formatter {
    fn format(&self, entry: &LogEntry, out: &mut Vec<u8>) {
        if self.is_parsing_disabled() {
            self.format_line(entry, &entry.message, out);
            return;
        }

        for line in entry.message.split('\n') {
            self.format_line(entry, line, out);
        }
    }

    fn as_full(&self) -> Option<&dyn FormatFull> {
        Some(self)
    }
}

impl FormatFull for Formatter {
    fn parsing_and_escaping(&self, disable: bool) {
        self.disable_parsing_and_escaping.store(disable, Ordering::Relaxed);
    }

    fn caller(&self, disable: bool) {
        self.disable_caller.store(disable, Ordering::Relaxed);
    }

    fn clone_format(&self) -> Arc<dyn Format> {
        Arc::new(Formatter {
            disable_parsing_and_escaping: AtomicBool::new(self.is_parsing_disabled()),
            disable_caller: AtomicBool::new(self.is_caller_disabled()),
            use_colors: self.use_colors,
        })
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    time: String,
    level: LogLevel,
    pid: u32,
    gid: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    trace_id: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    file: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    line: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    func: &'a str,
}

fn is_zero(line: &u32) -> bool {
    *line == 0
}

/// One JSON object per entry, newline terminated.
///
/// Has no runtime toggles, so it does not implement [`FormatFull`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatter;

impl Format for JsonFormatter {
    fn format(&self, entry: &LogEntry, out: &mut Vec<u8>) {
        let line = JsonLine {
            time: entry.time.to_rfc3339(),
            level: entry.level,
            pid: entry.pid,
            gid: entry.gid,
            trace_id: &entry.trace_id,
            message: &entry.message,
            file: &entry.file,
            line: entry.caller_line,
            func: &entry.caller_name,
        };
        let start = out.len();
        if serde_json::to_writer(&mut *out, &line).is_err() {
            out.truncate(start);
            return;
        }
        out.push(b'\n');
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Split a fully qualified function name into a package path and a bare
/// function name.
///
/// Rust paths split on the last `::` and the package part uses `/`
/// separators: `app::net::serve` gives `("app/net", "serve")`. Closure
/// suffixes are dropped first. Go-style names split on the first `.` after
/// the last `/`: `github.com/acme/log.Run` gives `("acme/log", "Run")`; a
/// leading `github.com/` is trimmed.
pub fn split_package_name(name: &str) -> (String, String) {
    let mut dir = String::new();
    let mut func = String::new();
    split_package_into(name, &mut dir, &mut func);
    (dir, func)
}

/// Allocation-free form of [`split_package_name`] appending into pooled
/// entry fields.
pub(crate) fn split_package_into(name: &str, dir: &mut String, func: &mut String) {
    let mut name = name;
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }

    if let Some(idx) = name.rfind("::") {
        for (i, segment) in name[..idx].split("::").enumerate() {
            if i > 0 {
                dir.push('/');
            }
            dir.push_str(segment);
        }
        func.push_str(&name[idx + 2..]);
        return;
    }

    let (pkg, bare) = match name.rfind('/') {
        Some(slash) if slash > 0 => match name[slash..].find('.') {
            Some(dot) => (&name[..slash + dot], &name[slash + dot + 1..]),
            None => (name, ""),
        },
        _ => match name.find('.') {
            Some(dot) if dot > 0 => (&name[..dot], &name[dot + 1..]),
            _ => (name, ""),
        },
    };

    dir.push_str(pkg.strip_prefix("github.com/").unwrap_or(pkg));
    func.push_str(bare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn sample_entry() -> LogEntry {
        let mut entry = LogEntry::new();
        entry.gid = 3;
        entry.time = Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        entry.level = LogLevel::Info;
        entry.message.push_str("server ready");
        entry.file.push_str("src/net/server.rs");
        entry.caller_line = 42;
        entry.caller_dir.push_str("app/net");
        entry.caller_func.push_str("serve");
        entry
    }

    fn render(formatter: &dyn Format, entry: &LogEntry) -> String {
        let mut out = Vec::new();
        formatter.format(entry, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_layout() {
        let entry = sample_entry();
        let line = render(&Formatter::plain(), &entry);
        let expected_prefix = format!("({}.3) 2025-01-08 10:30:45.000", entry.pid);
        assert!(line.starts_with(&expected_prefix), "{}", line);
        assert!(line.contains(" [info] server ready [ app/net/server.rs:42 serve ]"));
        assert!(line.ends_with("]\n"));
    }

    #[test]
    fn test_prefix_suffix_and_trace() {
        let mut entry = sample_entry();
        entry.prefix.extend_from_slice(b"[APP]");
        entry.suffix.extend_from_slice(b" <eol>");
        entry.trace_id.push_str("abcdef0123456789");
        let line = render(&Formatter::plain(), &entry);
        assert!(line.starts_with("[APP] ("));
        assert!(line.contains("serve abcdef0123456789 ] <eol>\n"));
    }

    #[test]
    fn test_caller_disabled_without_trace() {
        let entry = sample_entry();
        let formatter = Formatter::plain().disable_caller(true);
        let line = render(&formatter, &entry);
        assert!(line.ends_with("[info] server ready\n"), "{}", line);
    }

    #[test]
    fn test_caller_disabled_with_trace() {
        let mut entry = sample_entry();
        entry.trace_id.push_str("t-1");
        let formatter = Formatter::plain().disable_caller(true);
        let line = render(&formatter, &entry);
        assert!(line.ends_with("server ready [ t-1 ]\n"), "{}", line);
    }

    #[test]
    fn test_message_trimmed() {
        let mut entry = sample_entry();
        entry.message.clear();
        entry.message.push_str("  padded \t");
        let line = render(&Formatter::plain().disable_caller(true), &entry);
        assert!(line.ends_with("[info] padded\n"));
    }

    #[test]
    fn test_multiline_split() {
        let mut entry = sample_entry();
        entry.message.clear();
        entry.message.push_str("first\nsecond\nthird");
        entry.trace_id.push_str("tid");
        let output = render(&Formatter::plain(), &entry);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, word) in lines.iter().zip(["first", "second", "third"]) {
            assert!(line.contains(&format!("[info] {} [ app/net/server.rs:42 serve tid ]", word)));
        }
    }

    #[test]
    fn test_multiline_disabled_single_line() {
        let mut entry = sample_entry();
        entry.message.clear();
        entry.message.push_str("first\nsecond");
        let formatter = Formatter::plain().disable_parsing_and_escaping(true);
        let output = render(&formatter, &entry);
        assert_eq!(output.matches("[info]").count(), 1);
    }

    #[test]
    fn test_colors() {
        let mut entry = sample_entry();
        let line = render(&Formatter::new(), &entry);
        assert!(line.contains("\x1b[32m [info] \x1b[0m"));
        assert!(line.contains("\x1b[36m [ "));

        entry.level = LogLevel::Warn;
        assert!(render(&Formatter::new(), &entry).contains("\x1b[33m [warn] "));
        entry.level = LogLevel::Panic;
        assert!(render(&Formatter::new(), &entry).contains("\x1b[31m [panic] "));
    }

    #[test]
    fn test_clone_format_is_independent() {
        let original = Formatter::plain();
        let cloned = original.clone_format();
        cloned.as_full().unwrap().caller(true);
        assert!(!original.is_caller_disabled());

        let entry = sample_entry();
        assert!(!render(cloned.as_ref(), &entry).contains("server.rs"));
        assert!(render(&original, &entry).contains("server.rs"));
    }

    #[test]
    fn test_json_formatter() {
        let mut entry = sample_entry();
        entry.level = LogLevel::Warn;
        entry.caller_name.push_str("app::net::serve");
        let output = render(&JsonFormatter, &entry);
        assert!(output.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["level"], "warning");
        assert_eq!(value["message"], "server ready");
        assert_eq!(value["line"], 42);
        assert_eq!(value["func"], "app::net::serve");
        assert!(value.get("trace_id").is_none());
        assert!(JsonFormatter.as_full().is_none());
    }

    #[test]
    fn test_split_rust_paths() {
        assert_eq!(
            split_package_name("app::net::serve"),
            ("app/net".to_string(), "serve".to_string())
        );
        assert_eq!(
            split_package_name("app::main::{{closure}}::{{closure}}"),
            ("app".to_string(), "main".to_string())
        );
        assert_eq!(split_package_name("app"), ("app".to_string(), String::new()));
    }

    #[test]
    fn test_split_go_style_paths() {
        assert_eq!(
            split_package_name("github.com/acme/log.Run"),
            ("acme/log".to_string(), "Run".to_string())
        );
        assert_eq!(
            split_package_name("github.com/acme/log.(*Logger).Info"),
            ("acme/log".to_string(), "(*Logger).Info".to_string())
        );
        assert_eq!(
            split_package_name("main.main"),
            ("main".to_string(), "main".to_string())
        );
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("src/core/logger.rs"), "logger.rs");
        assert_eq!(base_name("C:\\src\\main.rs"), "main.rs");
        assert_eq!(base_name("lib.rs"), "lib.rs");
    }
}

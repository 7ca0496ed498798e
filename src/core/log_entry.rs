//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::sync::OnceLock;

/// Identifier of the current process, read once.
pub fn pid() -> u32 {
    static PID: OnceLock<u32> = OnceLock::new();
    *PID.get_or_init(std::process::id)
}

/// One log record, carried end-to-end from the logging call to the formatter.
///
/// Entries are pooled: the string and byte fields keep their capacity across
/// [`reset`](LogEntry::reset) so steady-state logging does not allocate.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub pid: u32,
    pub gid: u64,
    pub trace_id: String,
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    pub file: String,
    /// Fully qualified name of the calling function or module
    pub caller_name: String,
    pub caller_line: u32,
    pub caller_dir: String,
    pub caller_func: String,
    pub prefix: Vec<u8>,
    pub suffix: Vec<u8>,
}

impl LogEntry {
    /// Fresh entry with only the process id populated.
    pub fn new() -> Self {
        Self {
            pid: pid(),
            gid: 0,
            trace_id: String::new(),
            time: Local::now(),
            level: LogLevel::default(),
            message: String::new(),
            file: String::new(),
            caller_name: String::new(),
            caller_line: 0,
            caller_dir: String::new(),
            caller_func: String::new(),
            prefix: Vec::new(),
            suffix: Vec::new(),
        }
    }

    /// Clear the entry for reuse.
    ///
    /// `pid` is never touched. `time`, `level` and `caller_line` are left
    /// as they are because every logging call overwrites them.
    pub fn reset(&mut self) {
        self.gid = 0;
        self.trace_id.clear();
        self.message.clear();
        self.file.clear();
        self.caller_name.clear();
        self.caller_dir.clear();
        self.caller_func.clear();
        self.prefix.clear();
        self.suffix.clear();
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::new()
    }
}

//! Hourly rotating file sink
//!
//! Lines go to `{base}{YYYYMMDDHH}.log`, a new file every wall-clock hour.
//! When the live file reaches `max_size` within the same hour it is renamed
//! to `{base}{YYYYMMDDHH}.{NNN}.log` and a fresh live file is opened. A
//! symlink `{base}.log` follows the live file, and a background thread
//! keeps at most `max_files` of these files, deleting the oldest by name.

use crate::core::error::{LoggerError, Result};
use crate::core::Sink;
use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 800 MiB
pub const DEFAULT_MAX_SIZE: u64 = 800 * 1024 * 1024;
pub const DEFAULT_MAX_FILES: usize = 12;
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

const HOUR_FORMAT: &str = "%Y%m%d%H";
const HOUR_DIGITS: usize = 10;
const MAX_ARCHIVES_PER_HOUR: u32 = 999;

/// Configuration for [`HourlyRotator`]
///
/// # Examples
///
/// ```
/// use rust_pooled_logger::appenders::RotatorConfig;
/// use std::time::Duration;
///
/// let config = RotatorConfig::new("/var/log/app/server")
///     .with_max_size(64 * 1024 * 1024)
///     .with_max_files(48)
///     .with_cleanup_interval(Duration::from_secs(60));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotatorConfig {
    /// Path prefix; the hour bucket and `.log` are appended to it
    pub base: PathBuf,
    #[serde(default = "default_max_size")]
    pub max_size: u64,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: Duration,
}

fn default_max_size() -> u64 {
    DEFAULT_MAX_SIZE
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

fn default_cleanup_interval() -> Duration {
    DEFAULT_CLEANUP_INTERVAL
}

impl RotatorConfig {
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            max_size: DEFAULT_MAX_SIZE,
            max_files: DEFAULT_MAX_FILES,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base.file_name().is_none() {
            return Err(LoggerError::config(
                "hourly rotator",
                format!("base '{}' has no file name part", self.base.display()),
            ));
        }
        if self.max_size == 0 {
            return Err(LoggerError::config("hourly rotator", "max_size must be positive"));
        }
        if self.max_files == 0 {
            return Err(LoggerError::config("hourly rotator", "max_files must be positive"));
        }
        if self.cleanup_interval.is_zero() {
            return Err(LoggerError::config(
                "hourly rotator",
                "cleanup_interval must be positive",
            ));
        }
        Ok(())
    }

    fn dir(&self) -> &Path {
        match self.base.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn stem(&self) -> String {
        self.base
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `{base}{hour}.log`
    pub fn hour_path(&self, hour: &str) -> PathBuf {
        self.dir().join(format!("{}{}.log", self.stem(), hour))
    }

    /// `{base}{hour}.{index:03}.log`
    pub fn archive_path(&self, hour: &str, index: u32) -> PathBuf {
        self.dir()
            .join(format!("{}{}.{:03}.log", self.stem(), hour, index))
    }

    /// `{base}.log`
    pub fn symlink_path(&self) -> PathBuf {
        self.dir().join(format!("{}.log", self.stem()))
    }

    /// Whether `name` is a live or archived file produced for this base
    pub fn is_rotated_name(&self, name: &str) -> bool {
        let Some(rest) = name.strip_prefix(self.stem().as_str()) else {
            return false;
        };
        let Some(rest) = rest.strip_suffix(".log") else {
            return false;
        };
        let bytes = rest.as_bytes();
        let all_digits = |b: &[u8]| b.iter().all(u8::is_ascii_digit);
        match bytes.len() {
            HOUR_DIGITS => all_digits(bytes),
            14 => {
                all_digits(&bytes[..HOUR_DIGITS])
                    && bytes[HOUR_DIGITS] == b'.'
                    && all_digits(&bytes[HOUR_DIGITS + 1..])
            }
            _ => false,
        }
    }
}

struct RotatorState {
    file: Option<File>,
    hour: String,
    size: u64,
    closed: bool,
}

/// File sink rotating by wall-clock hour and by size.
///
/// Every write holds one mutex for the whole check-rotate-write sequence,
/// so concurrent writers never observe a half-rotated file.
pub struct HourlyRotator {
    config: RotatorConfig,
    state: Mutex<RotatorState>,
    stop_cleanup: Mutex<Option<Sender<()>>>,
    cleanup_handle: Mutex<Option<JoinHandle<()>>>,
}

impl HourlyRotator {
    /// Create a rotator and start its cleanup thread. No file is opened
    /// until the first write.
    pub fn new(config: RotatorConfig) -> Result<Self> {
        config.validate()?;

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let worker_config = config.clone();
        let handle = thread::Builder::new()
            .name("log-cleanup".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(worker_config.cleanup_interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = cleanup_files(&worker_config) {
                            eprintln!("[LOGGER ERROR] Log cleanup failed: {}", e);
                        }
                    }
                    _ => break,
                }
            })
            .map_err(|e| LoggerError::io_operation("spawning cleanup thread", "log-cleanup", e))?;

        Ok(Self {
            config,
            state: Mutex::new(RotatorState {
                file: None,
                hour: String::new(),
                size: 0,
                closed: false,
            }),
            stop_cleanup: Mutex::new(Some(stop_tx)),
            cleanup_handle: Mutex::new(Some(handle)),
        })
    }

    /// Process-wide rotator for `config.base`.
    ///
    /// Repeated calls for the same base return the same instance as long as
    /// it has not been closed; the configuration of later calls is ignored.
    pub fn shared(config: RotatorConfig) -> Result<Arc<Self>> {
        static ROTATORS: OnceLock<Mutex<HashMap<PathBuf, Arc<HourlyRotator>>>> = OnceLock::new();
        let mut rotators = ROTATORS.get_or_init(|| Mutex::new(HashMap::new())).lock();

        if let Some(existing) = rotators.get(&config.base) {
            if !existing.is_closed() {
                return Ok(Arc::clone(existing));
            }
        }

        let rotator = Arc::new(Self::new(config)?);
        rotators.insert(rotator.config.base.clone(), Arc::clone(&rotator));
        Ok(rotator)
    }

    pub fn config(&self) -> &RotatorConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Path of the live file, if one is open
    pub fn current_path(&self) -> Option<PathBuf> {
        let state = self.state.lock();
        state
            .file
            .as_ref()
            .map(|_| self.config.hour_path(&state.hour))
    }

    /// Write `buf` as if the wall clock read `now`.
    pub fn write_at(&self, now: DateTime<Local>, buf: &[u8]) -> Result<usize> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(LoggerError::WriterClosed);
        }

        let hour = now.format(HOUR_FORMAT).to_string();
        if state.file.is_none() || state.hour != hour || state.size >= self.config.max_size {
            self.rotate(&mut state, hour)?;
        }

        let file = state.file.as_mut().ok_or(LoggerError::WriterClosed)?;
        file.write_all(buf)?;
        state.size += buf.len() as u64;
        Ok(buf.len())
    }

    fn rotate(&self, state: &mut RotatorState, hour: String) -> Result<()> {
        let same_hour = state.file.is_some() && state.hour == hour;
        let live = self.config.hour_path(&hour);

        if let Some(mut file) = state.file.take() {
            let _ = file.flush();
        }

        if same_hour {
            self.archive(&hour, &live)?;
        }

        if let Some(parent) = live.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::file_rotation(live.display().to_string(), format!("create dir: {}", e))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&live)
            .map_err(|e| LoggerError::file_rotation(live.display().to_string(), e.to_string()))?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);

        state.file = Some(file);
        state.size = size;
        state.hour = hour;

        self.update_symlink(&live);
        Ok(())
    }

    fn archive(&self, hour: &str, live: &Path) -> Result<()> {
        let target = (1..=MAX_ARCHIVES_PER_HOUR)
            .map(|index| self.config.archive_path(hour, index))
            .find(|path| !path.exists())
            .ok_or_else(|| {
                LoggerError::file_rotation(
                    live.display().to_string(),
                    format!("more than {} archives in one hour", MAX_ARCHIVES_PER_HOUR),
                )
            })?;

        fs::rename(live, &target).map_err(|e| {
            LoggerError::file_rotation(
                live.display().to_string(),
                format!("archive to '{}': {}", target.display(), e),
            )
        })
    }

    #[cfg(unix)]
    fn update_symlink(&self, live: &Path) {
        let link = self.config.symlink_path();
        let Some(target) = live.file_name() else {
            return;
        };

        if fs::symlink_metadata(&link).is_ok() {
            if let Err(e) = fs::remove_file(&link) {
                eprintln!("[LOGGER WARN] Failed to remove symlink {}: {}", link.display(), e);
                return;
            }
        }
        if let Err(e) = std::os::unix::fs::symlink(target, &link) {
            eprintln!("[LOGGER WARN] Failed to create symlink {}: {}", link.display(), e);
        }
    }

    #[cfg(not(unix))]
    fn update_symlink(&self, _live: &Path) {}

    /// Delete all but the newest `max_files` rotated files now, returning
    /// how many were removed.
    pub fn cleanup_old_files(&self) -> Result<usize> {
        cleanup_files(&self.config)
    }

    /// Release the file and stop the cleanup thread. Further writes fail
    /// with [`LoggerError::WriterClosed`].
    pub fn close(&self) -> Result<()> {
        let result = {
            let mut state = self.state.lock();
            state.closed = true;
            match state.file.take() {
                Some(file) => file.sync_data().map_err(LoggerError::from),
                None => Ok(()),
            }
        };

        drop(self.stop_cleanup.lock().take());
        if let Some(handle) = self.cleanup_handle.lock().take() {
            if handle.join().is_err() {
                eprintln!("[LOGGER ERROR] Log cleanup thread panicked");
            }
        }

        result
    }
}

/// Sort descending by name and delete everything past `max_files`.
fn cleanup_files(config: &RotatorConfig) -> Result<usize> {
    let dir = config.dir();
    let entries = fs::read_dir(dir).map_err(|e| {
        LoggerError::io_operation("listing log directory", dir.display().to_string(), e)
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| config.is_rotated_name(name))
        .collect();

    if names.len() <= config.max_files {
        return Ok(0);
    }

    names.sort_unstable_by(|a, b| b.cmp(a));

    let mut removed = 0;
    for name in &names[config.max_files..] {
        let path = dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                removed += 1;
                eprintln!("[LOGGER WARN] Removed old log file {}", path.display());
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to remove old log file {}: {}", path.display(), e);
            }
        }
    }
    Ok(removed)
}

impl Sink for HourlyRotator {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.write_at(Local::now(), buf)
    }

    fn sync(&self) -> Result<()> {
        if let Some(file) = self.state.lock().file.as_ref() {
            file.sync_data()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        HourlyRotator::close(self)
    }

    fn name(&self) -> &str {
        "hourly"
    }
}

impl Drop for HourlyRotator {
    fn drop(&mut self) {
        if let Err(e) = HourlyRotator::close(self) {
            eprintln!("[LOGGER ERROR] Failed to close hourly log: {}", e);
        }
    }
}

/// Shared hourly rotator for `base` with default size and retention.
pub fn hourly_output(base: impl Into<PathBuf>) -> Result<Arc<HourlyRotator>> {
    HourlyRotator::shared(RotatorConfig::new(base))
}

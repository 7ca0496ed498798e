//! Serializable logger configuration
//!
//! ```
//! use rust_pooled_logger::core::config::LoggerConfig;
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "level": "warning",
//!     "prefix": "[API]",
//!     "outputs": [{ "type": "stderr" }]
//! }"#).unwrap();
//!
//! let logger = config.build().unwrap();
//! assert_eq!(logger.level(), rust_pooled_logger::LogLevel::Warn);
//! ```

use super::error::{LoggerError, Result};
use super::formatter::{Format, Formatter, JsonFormatter};
use super::log_level::LogLevel;
use super::logger::Logger;
use super::sink::Sink;
use crate::appenders::{
    AsyncWriter, ConsoleSink, FileSink, HourlyRotator, RotatorConfig, DEFAULT_MAX_FILES,
    DEFAULT_MAX_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputConfig {
    Stdout,
    Stderr,
    File {
        path: PathBuf,
    },
    Hourly {
        base: PathBuf,
        #[serde(default = "default_max_size")]
        max_size: u64,
        #[serde(default = "default_max_files")]
        max_files: usize,
    },
}

fn default_max_size() -> u64 {
    DEFAULT_MAX_SIZE
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

impl OutputConfig {
    fn open(&self) -> Result<Arc<dyn Sink>> {
        let sink: Arc<dyn Sink> = match self {
            OutputConfig::Stdout => Arc::new(ConsoleSink::stdout()),
            OutputConfig::Stderr => Arc::new(ConsoleSink::stderr()),
            OutputConfig::File { path } => Arc::new(FileSink::open(path)?),
            OutputConfig::Hourly {
                base,
                max_size,
                max_files,
            } => {
                let config = RotatorConfig::new(base)
                    .with_max_size(*max_size)
                    .with_max_files(*max_files);
                HourlyRotator::shared(config)?
            }
        };
        Ok(sink)
    }
}

/// Everything needed to build a [`Logger`]; unset fields take the
/// defaults of [`Logger::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub prefix: String,
    pub suffix: String,
    pub caller: bool,
    pub trace: bool,
    pub disable_parsing_and_escaping: bool,
    pub hide_caller: bool,
    pub colors: bool,
    pub formatter: FormatterKind,
    pub outputs: Vec<OutputConfig>,
    /// Wrap every output in an [`AsyncWriter`] with this queue capacity
    pub async_capacity: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            prefix: String::new(),
            suffix: String::new(),
            caller: true,
            trace: true,
            disable_parsing_and_escaping: true,
            hide_caller: false,
            colors: true,
            formatter: FormatterKind::Text,
            outputs: vec![OutputConfig::Stdout],
            async_capacity: None,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoggerError::config("logger config", e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LoggerError::config("logger config", e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.async_capacity == Some(0) {
            return Err(LoggerError::config("logger config", "async_capacity must be positive"));
        }
        for output in &self.outputs {
            if let OutputConfig::Hourly {
                base,
                max_size,
                max_files,
            } = output
            {
                RotatorConfig::new(base)
                    .with_max_size(*max_size)
                    .with_max_files(*max_files)
                    .validate()?;
            }
        }
        Ok(())
    }

    /// Open every output and assemble the logger.
    pub fn build(&self) -> Result<Logger> {
        self.validate()?;

        let mut sinks = Vec::with_capacity(self.outputs.len());
        for output in &self.outputs {
            let sink = output.open()?;
            sinks.push(match self.async_capacity {
                Some(capacity) => Arc::new(AsyncWriter::with_capacity(sink, capacity)?) as Arc<dyn Sink>,
                None => sink,
            });
        }

        let format: Arc<dyn Format> = match self.formatter {
            FormatterKind::Text => Arc::new(
                Formatter::with_colors(self.colors)
                    .disable_parsing_and_escaping(self.disable_parsing_and_escaping)
                    .disable_caller(self.hide_caller),
            ),
            FormatterKind::Json => Arc::new(JsonFormatter),
        };

        let mut logger = Logger::new();
        logger
            .set_level(self.level)
            .set_formatter(format)
            .set_prefix_msg(&self.prefix)
            .set_suffix_msg(&self.suffix)
            .enable_caller(self.caller)
            .enable_trace(self.trace)
            .set_output(sinks);
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_logger_new() {
        let logger = LoggerConfig::default().build().unwrap();
        assert_eq!(logger.level(), LogLevel::Debug);
        assert_eq!(logger.output().map(|o| o.name()), Some("stdout"));
    }

    #[test]
    fn test_parse_outputs() {
        let config = LoggerConfig::from_json(
            r#"{
                "level": "info",
                "outputs": [
                    { "type": "stdout" },
                    { "type": "file", "path": "/tmp/app.log" },
                    { "type": "hourly", "base": "/tmp/app", "max_files": 3 }
                ],
                "async_capacity": 64
            }"#,
        )
        .unwrap();

        assert_eq!(config.level, LogLevel::Info);
        assert!(config.caller);
        assert_eq!(
            config.outputs[2],
            OutputConfig::Hourly {
                base: PathBuf::from("/tmp/app"),
                max_size: DEFAULT_MAX_SIZE,
                max_files: 3,
            }
        );
        assert_eq!(config.async_capacity, Some(64));
    }

    #[test]
    fn test_invalid_values() {
        assert!(LoggerConfig::from_json(r#"{ "level": "loud" }"#).is_err());

        let config = LoggerConfig {
            async_capacity: Some(0),
            ..LoggerConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));

        let config = LoggerConfig {
            outputs: vec![OutputConfig::Hourly {
                base: PathBuf::from("/tmp/app"),
                max_size: 1,
                max_files: 0,
            }],
            ..LoggerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_file_output_with_async() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("configured.log");
        let config = LoggerConfig {
            level: LogLevel::Info,
            prefix: "[CFG]".to_string(),
            colors: false,
            outputs: vec![OutputConfig::File { path: path.clone() }],
            async_capacity: Some(16),
            ..LoggerConfig::default()
        };

        let logger = config.build().unwrap();
        assert_eq!(logger.output().map(|o| o.name()), Some("async"));
        logger.info("configured");
        logger.debug("below threshold");
        logger.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[CFG] ("));
        assert!(content.contains("[info] configured"));
        assert!(!content.contains("below threshold"));
        assert!(!content.contains("\x1b["));
    }

    #[test]
    fn test_round_trip_json() {
        let config = LoggerConfig {
            formatter: FormatterKind::Json,
            outputs: vec![OutputConfig::Stderr],
            ..LoggerConfig::default()
        };
        let parsed = LoggerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}

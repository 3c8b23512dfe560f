//! Logger configuration
//!
//! Plain serde structs with defaults; loading them (file, env, flags) is
//! up to the application. Keys follow the `log:*` naming used by
//! [`LoggerConfig::manual`].

use super::error::{LoggerError, Result};
use super::log_level::VerbosityLevel;
use super::output_format::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// File sink settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkConfig {
    pub enable: bool,
    pub output: PathBuf,
    /// Megabytes before the file is rotated
    #[serde(rename = "maxsize")]
    pub max_size: u64,
    /// Days a rotated file is kept
    #[serde(rename = "maxage")]
    pub max_age: u64,
    pub compress: bool,
    /// Write JSON to the file even when the console prints plain text
    pub json: bool,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            enable: false,
            output: PathBuf::from("./logs/app.log"),
            max_size: 100,
            max_age: 28,
            compress: false,
            json: false,
        }
    }
}

impl FileSinkConfig {
    #[must_use]
    pub fn enabled(output: impl Into<PathBuf>) -> Self {
        Self {
            enable: true,
            output: output.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes;
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, days: u64) -> Self {
        self.max_age = days;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use]
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }
}

/// Top-level logger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: String,
    pub format: String,
    #[serde(rename = "hideconsole")]
    pub hide_console: bool,
    #[serde(rename = "disablecolor")]
    pub disable_color: bool,
    pub file: FileSinkConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: VerbosityLevel::Verbose.as_str().to_string(),
            format: OutputFormat::PlainText.as_str().to_string(),
            hide_console: false,
            disable_color: false,
            file: FileSinkConfig::default(),
        }
    }
}

impl LoggerConfig {
    pub fn verbosity(&self) -> VerbosityLevel {
        VerbosityLevel::parse(&self.level)
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::parse(&self.format)
    }

    /// Report values that would silently fall back.
    ///
    /// An unknown level still applies (as a threshold that emits nothing) and
    /// an unknown format falls back to plain text; this only surfaces them.
    pub fn validate(&self) -> Result<()> {
        if self.level.parse::<VerbosityLevel>().is_err() {
            return Err(LoggerError::config(
                "log:level",
                format!("unknown level '{}', nothing will be logged", self.level),
            ));
        }
        if self.format.parse::<OutputFormat>().is_err() {
            return Err(LoggerError::config(
                "log:format",
                format!("unknown format '{}', using plain text", self.format),
            ));
        }
        Ok(())
    }

    /// Human-readable description of every option, keyed by `log:*` name.
    pub fn manual() -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            (
                "log:level",
                "logging level, valid value is\n\t- trace\n\t- verbose\n\t- info\n\t- warning\n\t- error",
            ),
            (
                "log:format",
                "logging output format, valid value is\n\t- default\n\t- json",
            ),
            ("log:hideconsole", "Don't print log to console"),
            ("log:disablecolor", "Don't use color in log"),
            ("log:file:enable", "Enable writing log to file"),
            ("log:file:output", "File log output location"),
            ("log:file:maxsize", "Max log file size (in megabytes) before rotation"),
            ("log:file:maxage", "Max log file age (in days) before removal"),
            ("log:file:compress", "If true, rotated files are compressed"),
            ("log:file:json", "If true, always write in json format"),
        ])
    }

    /// Merge [`LoggerConfig::manual`] into an application's own manual.
    pub fn extend_manual(manual: &mut BTreeMap<String, String>) {
        for (key, text) in Self::manual() {
            manual.insert(key.to_string(), text.to_string());
        }
    }
}

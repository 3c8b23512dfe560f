//! Log level and verbosity definitions
//!
//! Two separate axes: [`LogLevel`] classifies a single message,
//! [`VerbosityLevel`] is the threshold a logger filters with.

use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of an individual message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 1,
    Debug = 2,
    Notice = 3,
    Info = 4,
    Warning = 5,
    Success = 6,
    Error = 7,
}

impl LogLevel {
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Notice,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Success,
        LogLevel::Error,
    ];

    /// Canonical display name, e.g. `WARNING`.
    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Notice => "NOTICE",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Success => "SUCCESS",
            LogLevel::Error => "ERROR",
        }
    }

    /// Four character code printed in plain-text lines, e.g. `WARN`.
    pub const fn code(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRCE",
            LogLevel::Debug => "DBUG",
            LogLevel::Notice => "NTCE",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Success => "SUCS",
            LogLevel::Error => "EROR",
        }
    }

    /// Color of the level code in plain-text lines.
    pub fn code_color(self) -> Color {
        match self {
            LogLevel::Trace => Color::BrightWhite,
            LogLevel::Debug => Color::BrightBlue,
            LogLevel::Notice => Color::BrightCyan,
            LogLevel::Info => Color::BrightMagenta,
            LogLevel::Warning => Color::Yellow,
            LogLevel::Success => Color::Green,
            LogLevel::Error => Color::Red,
        }
    }

    /// Color of the message body in plain-text lines.
    pub fn message_color(self) -> Color {
        match self {
            LogLevel::Trace | LogLevel::Debug => Color::White,
            other => other.code_color(),
        }
    }
}

/// Name lookup over a raw discriminant; unknown values yield `""`.
pub fn level_name(raw: u8) -> &'static str {
    LogLevel::try_from(raw).map(LogLevel::name).unwrap_or("")
}

/// Code lookup over a raw discriminant; unknown values yield `""`.
pub fn level_code(raw: u8) -> &'static str {
    LogLevel::try_from(raw).map(LogLevel::code).unwrap_or("")
}

impl TryFrom<u8> for LogLevel {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        LogLevel::ALL
            .into_iter()
            .find(|level| *level as u8 == raw)
            .ok_or(raw)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "NOTICE" => Ok(LogLevel::Notice),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "SUCCESS" => Ok(LogLevel::Success),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Filter threshold controlling how much a logger emits.
///
/// `Invalid` is what [`VerbosityLevel::parse`] returns for unrecognized
/// input; a logger configured with it emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum VerbosityLevel {
    Invalid,
    Trace,
    #[default]
    Verbose,
    Info,
    Warning,
    Error,
}

impl VerbosityLevel {
    /// Case-insensitive parse that never fails.
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or(VerbosityLevel::Invalid)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            VerbosityLevel::Invalid => "invalid",
            VerbosityLevel::Trace => "trace",
            VerbosityLevel::Verbose => "verbose",
            VerbosityLevel::Info => "info",
            VerbosityLevel::Warning => "warning",
            VerbosityLevel::Error => "error",
        }
    }

    /// Whether a message at `level` passes this threshold.
    ///
    /// `Verbose` and `Info` pass the same set; Debug is only emitted at
    /// `Trace`.
    pub const fn allows(self, level: LogLevel) -> bool {
        use LogLevel as L;
        match self {
            VerbosityLevel::Trace => true,
            VerbosityLevel::Verbose | VerbosityLevel::Info => matches!(
                level,
                L::Notice | L::Info | L::Warning | L::Success | L::Error
            ),
            VerbosityLevel::Warning => matches!(level, L::Warning | L::Error),
            VerbosityLevel::Error => matches!(level, L::Error),
            VerbosityLevel::Invalid => false,
        }
    }
}

impl fmt::Display for VerbosityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(VerbosityLevel::Trace),
            "verbose" => Ok(VerbosityLevel::Verbose),
            "info" => Ok(VerbosityLevel::Info),
            "warning" => Ok(VerbosityLevel::Warning),
            "error" => Ok(VerbosityLevel::Error),
            _ => Err(format!("Invalid verbosity level: '{}'", s)),
        }
    }
}

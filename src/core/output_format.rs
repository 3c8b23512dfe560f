//! Output format configuration
//!
//! - PlainText: one colorized human-readable line per record (default)
//! - Json: one flat JSON object per record; colors are never applied

use super::record::LogRecord;
use super::render::{render_json, render_plain};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Example: `[3:04:05 PM][INFO][billing][jobs::run][42] invoice sent`
    #[default]
    PlainText,

    /// Example: `{"caller":"src/jobs.rs:42","level":"info","logid":"...","message":"invoice sent","time":"..."}`
    Json,
}

impl OutputFormat {
    /// Case-insensitive parse of `default` / `json`; anything else is PlainText.
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OutputFormat::PlainText => "default",
            OutputFormat::Json => "json",
        }
    }

    /// Render a record in this format. `None` means the record was dropped.
    pub fn render(self, record: &LogRecord, namespace: &str, color: bool) -> Option<String> {
        match self {
            OutputFormat::PlainText => Some(render_plain(record, namespace, color)),
            OutputFormat::Json => render_json(record),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "text" | "plain" => Ok(OutputFormat::PlainText),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: '{}'", s)),
        }
    }
}

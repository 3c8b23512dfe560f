//! Core logger types and traits

pub mod caller;
pub mod config;
pub mod error;
pub mod format;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod record;
pub mod render;
pub mod sink;
pub mod timestamp;

pub use caller::CallerInfo;
pub use config::{FileSinkConfig, LoggerConfig};
pub use error::{LoggerError, Result};
pub use format::{sprintf, Arg};
pub use log_level::{level_code, level_name, LogLevel, VerbosityLevel};
pub use logger::{LogObserver, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use record::{LogRecord, MessageInput, Payload};
pub use render::{render_json, render_json_value, render_plain};
pub use sink::Sink;
pub use timestamp::TimestampFormat;

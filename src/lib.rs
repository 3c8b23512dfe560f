//! # Service Logger
//!
//! Leveled, structured logging for services: seven severities, printf-style
//! templates, plain-text or JSON lines, an optional rotating log file and a
//! callback that sees every emitted record.
//!
//! ## Features
//!
//! - **Caller aware**: every line carries the file and line of the call
//! - **Two renderings**: colored plain text for terminals, flat JSON for collectors
//! - **File output**: size and age based rotation with optional gzip
//! - **Bridges**: `io::Write` and the `log` crate facade feed the same pipeline
//!
//! ```
//! use service_logger::prelude::*;
//!
//! let logger = Logger::new();
//! logger.init("billing", "1.4.0");
//! logger.info("invoice %s issued for %.2f", &["INV-7".into(), 42.5.into()]);
//! ```
//!
//! ## Methods or macros
//!
//! The methods (`logger.info(..)`) record file and line only, so the
//! function field of a plain-text line stays empty: `[INFO][billing][][19]`.
//! The macros (`info!(logger, ..)`) also record the enclosing function and
//! fill that field with its last two path segments:
//!
//! ```
//! use service_logger::prelude::*;
//! use service_logger::info;
//!
//! fn issue_invoice(logger: &Logger) {
//!     // rendered as `[INFO][billing][rust_out::issue_invoice][..] invoice issued`
//!     info!(logger, "invoice issued");
//! }
//! # issue_invoice(&Logger::new());
//! ```

pub mod bridge;
pub mod core;
pub mod http;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::bridge::{LogBridge, SystemWriter};
    pub use crate::core::{
        Arg, CallerInfo, FileSinkConfig, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, MessageInput, OutputFormat, Result, Sink, VerbosityLevel,
    };
    pub use crate::http::RequestSummary;
    pub use crate::sinks::{ConsoleSink, MemorySink, RotatingFileSink, RotationPolicy};
}

pub use bridge::{LogBridge, SystemWriter};
pub use core::{
    Arg, CallerInfo, FileSinkConfig, LogLevel, LogObserver, LogRecord, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, MessageInput, OutputFormat, Payload, Result, Sink,
    TimestampFormat, VerbosityLevel,
};
pub use http::RequestSummary;
pub use sinks::{ConsoleSink, MemorySink, RotatingFileSink, RotationPolicy};

//! Adapters that feed other logging surfaces into a [`Logger`].
//!
//! - [`SystemWriter`] / `impl Write for &Logger`: anything that writes text
//!   lines (a child process pipe, a library that takes `impl Write`).
//! - [`LogBridge`]: the `log` crate facade, so `log::info!` from dependencies
//!   lands in the same output.

use crate::core::{CallerInfo, LogLevel, Logger};
use std::io;
use std::sync::Arc;

impl io::Write for &Logger {
    #[track_caller]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_lines(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Logger::flush(self);
        Ok(())
    }
}

/// Owned `io::Write` handle onto a shared logger.
///
/// Each non-empty line written becomes one Debug record with the line as its
/// verbatim message.
#[derive(Clone)]
pub struct SystemWriter {
    logger: Arc<Logger>,
}

impl SystemWriter {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl io::Write for SystemWriter {
    #[track_caller]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.logger.write_lines(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.logger.flush();
        Ok(())
    }
}

/// `log::Log` implementation backed by a [`Logger`].
pub struct LogBridge {
    logger: Arc<Logger>,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Register as the global `log` logger.
    ///
    /// Fails if another global logger was already set.
    pub fn install(logger: Arc<Logger>) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(logger)))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

pub fn map_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warning,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.log_level().allows(map_level(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let caller = CallerInfo::new(
            record.file().unwrap_or_default(),
            record.line().unwrap_or_default(),
            record.module_path().unwrap_or_default(),
        );
        // The facade already formatted the message; keep it verbatim.
        self.logger.log_with_caller(
            map_level(record.level()),
            caller,
            "%s",
            &[record.args().to_string().into()],
        );
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

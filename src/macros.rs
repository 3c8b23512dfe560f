//! Logging macros that record the enclosing function.
//!
//! The methods on [`Logger`](crate::Logger) capture file and line only. The
//! macros below also resolve the function path at compile time, so the
//! plain-text line shows `[module::function]` instead of `[]`.
//!
//! Arguments after the message are substituted into its `%` verbs; anything
//! convertible into [`Arg`](crate::core::Arg) is accepted.
//!
//! # Examples
//!
//! ```
//! use service_logger::prelude::*;
//! use service_logger::{info, warning};
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port %d", port);
//!
//! warning!(logger, "%s retried %d times", "upload", 3);
//! ```

/// Log at an explicit level.
///
/// ```
/// # use service_logger::prelude::*;
/// # let logger = Logger::new();
/// use service_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: %d", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $input:expr $(, $arg:expr)* $(,)?) => {
        $logger.log_with_caller(
            $level,
            $crate::caller!(),
            $input,
            &[$($crate::core::Arg::from($arg)),*],
        )
    };
}

/// Log a trace-level message.
///
/// ```
/// # use service_logger::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_log_level(VerbosityLevel::Trace);
/// use service_logger::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: %v", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Notice, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log a success-level message.
#[macro_export]
macro_rules! success {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Success, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use service_logger::prelude::*;
/// # let logger = Logger::new();
/// use service_logger::error;
/// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.yaml missing");
/// error!(logger, err);
/// error!(logger, "Failed to connect to %s:%d", "db", 5432);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

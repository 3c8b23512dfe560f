//! Main logger implementation
//!
//! Every call runs the whole pipeline on the caller's thread: filter, build,
//! render, write. There is no queue and no background worker.

use super::{
    caller::CallerInfo,
    config::{FileSinkConfig, LoggerConfig},
    format::Arg,
    log_level::{LogLevel, VerbosityLevel},
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    record::{LogRecord, MessageInput},
    render::{render_json, render_plain},
    sink::Sink,
};
use crate::sinks::{ConsoleSink, RotatingFileSink, RotationPolicy};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Callback invoked with every record that passes the filter, together with
/// its rendered text (plain line or JSON, depending on the output format).
///
/// Runs synchronously on the logging thread and must return promptly.
pub type LogObserver = Arc<dyn Fn(&LogRecord, &str) + Send + Sync>;

#[derive(Debug, Clone)]
struct Settings {
    namespace: String,
    version: String,
    initialized: bool,
    verbosity: VerbosityLevel,
    format: OutputFormat,
    print_to_console: bool,
    color_disabled: bool,
    file_config: FileSinkConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            version: String::new(),
            initialized: false,
            verbosity: VerbosityLevel::Verbose,
            format: OutputFormat::PlainText,
            print_to_console: true,
            color_disabled: false,
            file_config: FileSinkConfig::default(),
        }
    }
}

impl Settings {
    /// JSON output never carries colors, whatever the color preference.
    fn color(&self) -> bool {
        !self.color_disabled && self.format != OutputFormat::Json
    }
}

/// Leveled logger with a console leg, an optional file leg and an observer.
///
/// The leveled methods capture the caller's file and line through
/// `#[track_caller]` but cannot see the calling function, so plain-text lines
/// logged through them show an empty function field (`[]`). Use the crate
/// macros ([`info!`](crate::info) and friends) where that field matters.
pub struct Logger {
    settings: RwLock<Settings>,
    observer: RwLock<Option<LogObserver>>,
    console: Mutex<Box<dyn Sink>>,
    file: Mutex<Option<Box<dyn Sink>>>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger with defaults: verbose, plain text, console on, colors on, no file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: RwLock::new(Settings::default()),
            observer: RwLock::new(None),
            console: Mutex::new(Box::new(ConsoleSink::new())),
            file: Mutex::new(None),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Build a logger from a config and initialize it.
    #[track_caller]
    pub fn from_config(namespace: &str, version: &str, config: &LoggerConfig) -> Self {
        let logger = Self::new();
        logger.apply_config(config);
        logger.init(namespace, version);
        logger
    }

    /// Name the service and switch the color subsystem on.
    ///
    /// Colors are forced on for the process; whether a line is actually
    /// colored is decided per logger by [`Logger::disable_color`] and the
    /// output format.
    pub fn init(&self, namespace: &str, version: &str) {
        colored::control::set_override(true);
        let mut settings = self.settings.write();
        settings.namespace = namespace.to_string();
        settings.version = version.to_string();
        settings.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.settings.read().initialized
    }

    pub fn service_name(&self) -> String {
        self.settings.read().namespace.clone()
    }

    pub fn service_version(&self) -> String {
        self.settings.read().version.clone()
    }

    /// Apply every setting of `config`, including the file sink.
    ///
    /// Values that fall back are reported at Error level under the settings
    /// in effect before the call, then applied anyway.
    #[track_caller]
    pub fn apply_config(&self, config: &LoggerConfig) {
        if let Err(e) = config.validate() {
            self.error(e, &[]);
        }
        {
            let mut settings = self.settings.write();
            settings.verbosity = config.verbosity();
            settings.format = config.output_format();
            settings.print_to_console = !config.hide_console;
            settings.color_disabled = config.disable_color;
        }
        self.set_log_file(config.file.clone());
    }

    pub fn set_log_level(&self, level: VerbosityLevel) {
        self.settings.write().verbosity = level;
    }

    pub fn log_level(&self) -> VerbosityLevel {
        self.settings.read().verbosity
    }

    pub fn set_output_format(&self, format: OutputFormat) {
        self.settings.write().format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.settings.read().format
    }

    pub fn set_print_to_console(&self, enabled: bool) {
        self.settings.write().print_to_console = enabled;
    }

    pub fn print_to_console(&self) -> bool {
        self.settings.read().print_to_console
    }

    /// Record the color preference. JSON output stays colorless regardless.
    pub fn disable_color(&self, disabled: bool) {
        self.settings.write().color_disabled = disabled;
    }

    /// Whether plain-text lines are rendered with colors right now.
    pub fn color_enabled(&self) -> bool {
        self.settings.read().color()
    }

    /// Configure the file leg.
    ///
    /// A disabled config removes the active file sink. Failure to create the
    /// directory or open the file is logged at Error level through this
    /// logger; the console leg keeps working and file writes are skipped.
    #[track_caller]
    pub fn set_log_file(&self, config: FileSinkConfig) {
        self.settings.write().file_config = config.clone();

        if !config.enable {
            *self.file.lock() = None;
            return;
        }

        let opened = RotatingFileSink::with_policy(&config.output, RotationPolicy::from_config(&config));
        match opened {
            Ok(sink) => *self.file.lock() = Some(Box::new(sink)),
            Err(e) => {
                *self.file.lock() = None;
                self.error(e, &[]);
            }
        }
    }

    pub fn log_file(&self) -> FileSinkConfig {
        self.settings.read().file_config.clone()
    }

    /// Use a custom sink as the file leg and enable it.
    pub fn set_file_sink(&self, sink: Box<dyn Sink>, json: bool) {
        {
            let mut settings = self.settings.write();
            settings.file_config.enable = true;
            settings.file_config.json = json;
        }
        *self.file.lock() = Some(sink);
    }

    /// Replace the console destination (standard output by default).
    pub fn set_console_sink(&self, sink: Box<dyn Sink>) {
        *self.console.lock() = sink;
    }

    pub fn set_on_logger_handler<F>(&self, observer: F)
    where
        F: Fn(&LogRecord, &str) + Send + Sync + 'static,
    {
        *self.observer.write() = Some(Arc::new(observer));
    }

    pub fn clear_on_logger_handler(&self) {
        *self.observer.write() = None;
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Plain-text line for `record` under the current namespace and color
    /// settings.
    pub fn render_line(&self, record: &LogRecord) -> String {
        let settings = self.settings.read();
        render_plain(record, &settings.namespace, settings.color())
    }

    /// Log at `level` from the caller's file and line; the function is left
    /// unresolved. [`log!`](crate::log) records it as well.
    #[track_caller]
    pub fn log(&self, level: LogLevel, input: impl Into<MessageInput>, args: &[Arg]) {
        self.log_with_caller(level, CallerInfo::capture(), input, args);
    }

    pub fn log_with_caller(
        &self,
        level: LogLevel,
        caller: CallerInfo,
        input: impl Into<MessageInput>,
        args: &[Arg],
    ) {
        if !self.settings.read().verbosity.allows(level) {
            self.metrics.record_filtered();
            return;
        }

        let record = LogRecord::build(level, caller, input.into(), args);
        self.dispatch(&record);
    }

    /// Route a record that already passed the filter.
    fn dispatch(&self, record: &LogRecord) {
        self.metrics.record_emitted();

        let settings = self.settings.read().clone();
        let rendered = settings.format.render(record, &settings.namespace, settings.color());
        if rendered.is_none() {
            self.metrics.record_json_dropped();
        }

        let observer = self.observer.read().clone();
        if let Some(observer) = observer {
            let text = rendered.as_deref().unwrap_or("");
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| observer(record, text))) {
                eprintln!("[LOGGER CRITICAL] Log observer panicked: {}", panic_message(&*panic));
            }
        }

        let Some(line) = rendered else {
            return;
        };

        if settings.print_to_console {
            let mut console = self.console.lock();
            self.write_to(&mut **console, &line);
        }

        if settings.file_config.enable {
            let file_line = if settings.format == OutputFormat::PlainText && settings.file_config.json {
                match render_json(record) {
                    Some(json) => json,
                    None => {
                        self.metrics.record_json_dropped();
                        return;
                    }
                }
            } else {
                line
            };

            let mut file = self.file.lock();
            if let Some(sink) = file.as_mut() {
                self.write_to(&mut **sink, &file_line);
            }
        }
    }

    /// Write one line to a sink with panic isolation; failures go to stderr.
    fn write_to(&self, sink: &mut dyn Sink, line: &str) {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');

        match catch_unwind(AssertUnwindSafe(|| sink.write(&bytes))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.metrics.record_sink_error();
                eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
            }
            Err(panic) => {
                self.metrics.record_sink_error();
                eprintln!(
                    "[LOGGER CRITICAL] Sink '{}' panicked: {}",
                    sink.name(),
                    panic_message(&*panic)
                );
            }
        }
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, input: impl Into<MessageInput>, args: &[Arg]) {
        self.log(LogLevel::Trace, input, args);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, input: impl Into<MessageInput>, args: &[Arg]) {
        self.log(LogLevel::Debug, input, args);
    }

    #[inline]
    #[track_caller]
    pub fn notice(&self, input: impl Into<MessageInput>, args: &[Arg]) {
        self.log(LogLevel::Notice, input, args);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, input: impl Into<MessageInput>, args: &[Arg]) {
        self.log(LogLevel::Info, input, args);
    }

    #[inline]
    #[track_caller]
    pub fn warning(&self, input: impl Into<MessageInput>, args: &[Arg]) {
        self.log(LogLevel::Warning, input, args);
    }

    #[inline]
    #[track_caller]
    pub fn success(&self, input: impl Into<MessageInput>, args: &[Arg]) {
        self.log(LogLevel::Success, input, args);
    }

    /// Log at Error level and hand the logger back for chaining.
    #[inline]
    #[track_caller]
    pub fn error(&self, input: impl Into<MessageInput>, args: &[Arg]) -> &Self {
        self.log(LogLevel::Error, input, args);
        self
    }

    /// printf-compatible entry point for code that expects one; logs at Debug.
    #[track_caller]
    pub fn printf(&self, template: &str, args: &[Arg]) {
        self.log(LogLevel::Debug, template, args);
    }

    /// Emit every non-empty line of `bytes` verbatim at Debug level and
    /// report the whole buffer as consumed.
    #[track_caller]
    pub fn write_lines(&self, bytes: &[u8]) -> usize {
        let caller = CallerInfo::capture();
        for line in String::from_utf8_lossy(bytes).lines() {
            if !line.is_empty() {
                self.log_with_caller(LogLevel::Debug, caller.clone(), "%s", &[line.into()]);
            }
        }
        bytes.len()
    }

    pub fn flush(&self) {
        if let Err(e) = self.console.lock().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush console: {}", e);
        }
        if let Some(sink) = self.file.lock().as_mut() {
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Failed to flush '{}': {}", sink.name(), e);
            }
        }
    }

    /// Terminate the process with exit status 0.
    pub fn quit(&self) -> ! {
        std::process::exit(0)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use service_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .namespace("billing", "1.4.0")
///     .level(VerbosityLevel::Info)
///     .output_format(OutputFormat::Json)
///     .build();
///
/// assert_eq!(logger.service_name(), "billing");
/// assert!(!logger.color_enabled());
/// ```
pub struct LoggerBuilder {
    namespace: Option<(String, String)>,
    level: VerbosityLevel,
    format: OutputFormat,
    print_to_console: bool,
    color_disabled: bool,
    console: Option<Box<dyn Sink>>,
    file_config: Option<FileSinkConfig>,
    observer: Option<LogObserver>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            namespace: None,
            level: VerbosityLevel::Verbose,
            format: OutputFormat::PlainText,
            print_to_console: true,
            color_disabled: false,
            console: None,
            file_config: None,
            observer: None,
        }
    }

    /// Initialize the logger with this namespace and version on build.
    #[must_use = "builder methods return a new value"]
    pub fn namespace(mut self, namespace: impl Into<String>, version: impl Into<String>) -> Self {
        self.namespace = Some((namespace.into(), version.into()));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: VerbosityLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn print_to_console(mut self, enabled: bool) -> Self {
        self.print_to_console = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_color(mut self, disabled: bool) -> Self {
        self.color_disabled = disabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.console = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_file(mut self, config: FileSinkConfig) -> Self {
        self.file_config = Some(config);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_log<F>(mut self, observer: F) -> Self
    where
        F: Fn(&LogRecord, &str) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    #[track_caller]
    pub fn build(self) -> Logger {
        let logger = Logger::new();
        {
            let mut settings = logger.settings.write();
            settings.verbosity = self.level;
            settings.format = self.format;
            settings.print_to_console = self.print_to_console;
            settings.color_disabled = self.color_disabled;
        }
        if let Some(console) = self.console {
            logger.set_console_sink(console);
        }
        *logger.observer.write() = self.observer;
        if let Some(config) = self.file_config {
            logger.set_log_file(config);
        }
        if let Some((namespace, version)) = self.namespace {
            logger.init(&namespace, &version);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn capture(level: VerbosityLevel) -> (Logger, MemorySink) {
        let console = MemorySink::new();
        let logger = Logger::builder()
            .namespace("svc", "1.0.0")
            .level(level)
            .disable_color(true)
            .console_sink(console.clone())
            .build();
        (logger, console)
    }

    #[test]
    fn test_defaults() {
        let logger = Logger::new();
        assert_eq!(logger.log_level(), VerbosityLevel::Verbose);
        assert_eq!(logger.output_format(), OutputFormat::PlainText);
        assert!(logger.print_to_console());
        assert!(logger.color_enabled());
        assert!(!logger.log_file().enable);
        assert!(!logger.is_initialized());
    }

    #[test]
    fn test_init_sets_identity() {
        let logger = Logger::new();
        logger.init("orders", "2.3.1");
        assert!(logger.is_initialized());
        assert_eq!(logger.service_name(), "orders");
        assert_eq!(logger.service_version(), "2.3.1");
    }

    #[test]
    fn test_verbose_threshold_drops_trace_and_debug() {
        let (logger, console) = capture(VerbosityLevel::Verbose);
        logger.trace("t", &[]);
        logger.debug("d", &[]);
        logger.notice("n", &[]);
        logger.info("i", &[]);
        assert_eq!(console.lines().len(), 2);
        assert_eq!(logger.metrics().filtered(), 2);
        assert_eq!(logger.metrics().emitted(), 2);
    }

    #[test]
    fn test_line_reports_call_site() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        let line = line!() + 1;
        logger.info("where am i", &[]);
        let output = console.contents();
        assert!(output.contains(&format!("[{}] where am i", line)), "{}", output);
        assert!(output.contains("[INFO][svc]"));
    }

    #[test]
    fn test_function_field_empty_for_methods_filled_by_macros() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        logger.info("method", &[]);
        crate::info!(logger, "macro");

        let lines = console.lines();
        assert!(lines[0].contains("[INFO][svc][]["), "{}", lines[0]);
        assert!(
            lines[1].contains("[INFO][svc][tests::test_function_field_empty_for_methods_filled_by_macros]["),
            "{}",
            lines[1]
        );
    }

    #[test]
    fn test_json_format_forces_colors_off() {
        let logger = Logger::new();
        logger.disable_color(false);
        logger.set_output_format(OutputFormat::Json);
        assert!(!logger.color_enabled());
        logger.disable_color(false);
        assert!(!logger.color_enabled());
        logger.set_output_format(OutputFormat::PlainText);
        assert!(logger.color_enabled());
    }

    #[test]
    fn test_json_mode_writes_json_to_console() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        logger.set_output_format(OutputFormat::Json);
        logger.warning(json!({"order": 7}), &[]);
        let parsed: Value = serde_json::from_str(&console.lines()[0]).unwrap();
        assert_eq!(parsed["order"], json!(7));
        assert_eq!(parsed["level"], json!("warning"));
    }

    #[test]
    fn test_file_leg_can_be_json_while_console_is_text() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        let file = MemorySink::new();
        logger.set_file_sink(Box::new(file.clone()), true);
        logger.info("%s joined", &["ana".into()]);

        assert!(console.contents().ends_with("] ana joined\n"));
        let parsed: Value = serde_json::from_str(&file.lines()[0]).unwrap();
        assert_eq!(parsed["message"], json!("ana joined"));
    }

    #[test]
    fn test_file_leg_plain_mirrors_console() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        let file = MemorySink::new();
        logger.set_file_sink(Box::new(file.clone()), false);
        logger.success("done", &[]);
        assert_eq!(console.contents(), file.contents());
    }

    #[test]
    fn test_hidden_console_still_writes_file() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        let file = MemorySink::new();
        logger.set_file_sink(Box::new(file.clone()), false);
        logger.set_print_to_console(false);
        logger.notice("quiet", &[]);
        assert!(console.contents().is_empty());
        assert_eq!(file.lines().len(), 1);
    }

    #[test]
    fn test_observer_receives_record_and_text() {
        let (logger, _console) = capture(VerbosityLevel::Trace);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        logger.set_on_logger_handler(move |record, text| {
            sink.lock().push((record.level, text.to_string()));
        });

        logger.debug("plain", &[]);
        logger.set_output_format(OutputFormat::Json);
        logger.error("json", &[]);

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, LogLevel::Debug);
        assert!(seen[0].1.ends_with("] plain"));
        assert_eq!(seen[1].0, LogLevel::Error);
        assert!(seen[1].1.starts_with('{'));
    }

    #[test]
    fn test_observer_not_called_for_filtered_records() {
        let (logger, _console) = capture(VerbosityLevel::Error);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        logger.set_on_logger_handler(move |_, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        logger.warning("no", &[]);
        logger.error("yes", &[]);
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        logger.clear_on_logger_handler();
        logger.error("again", &[]);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_panicking_observer_does_not_stop_output() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        logger.set_on_logger_handler(|_, _| panic!("observer bug"));
        logger.info("still here", &[]);
        assert_eq!(console.lines().len(), 1);
    }

    #[test]
    fn test_error_chains() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        logger.error("first", &[]).error("second", &[]);
        assert_eq!(console.lines().len(), 2);
    }

    #[test]
    fn test_write_lines_emits_debug_per_line() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        let consumed = logger.write_lines(b"alpha 100%\n\nbeta\n");
        assert_eq!(consumed, 17);
        let lines = console.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[DBUG]"));
        assert!(lines[0].ends_with(" alpha 100%"));
        assert!(lines[1].ends_with(" beta"));
    }

    #[test]
    fn test_invalid_verbosity_emits_nothing() {
        let (logger, console) = capture(VerbosityLevel::parse("loud"));
        logger.error("x", &[]);
        assert!(console.contents().is_empty());
    }

    #[test]
    fn test_opaque_payload_dropped_in_json_mode_only() {
        let (logger, console) = capture(VerbosityLevel::Trace);
        logger.set_output_format(OutputFormat::Json);
        logger.info(MessageInput::Opaque("Socket(4)".into()), &[]);
        assert!(console.contents().is_empty());
        assert_eq!(logger.metrics().json_dropped(), 1);

        logger.set_output_format(OutputFormat::PlainText);
        logger.info(MessageInput::Opaque("Socket(4)".into()), &[]);
        assert!(console.contents().ends_with(" Socket(4)\n"));
    }
}

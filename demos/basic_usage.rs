//! Basic logger usage example
//!
//! Demonstrates the seven levels, printf-style arguments and verbosity
//! thresholds on the console.
//!
//! Run with: cargo run --example basic_usage

use service_logger::prelude::*;
use service_logger::{info, warning};

fn main() {
    println!("=== Service Logger - Basic Usage Example ===\n");

    let logger = Logger::new();
    logger.init("basic-usage", env!("CARGO_PKG_VERSION"));
    logger.set_log_level(VerbosityLevel::Trace);

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message", &[]);
    logger.debug("This is a debug message", &[]);
    logger.notice("This is a notice message", &[]);
    logger.info("This is an info message", &[]);
    logger.warning("This is a warning message", &[]);
    logger.success("This is a success message", &[]);
    logger.error("This is an error message", &[]);

    println!("\n2. Arguments and the calling function:");
    info!(logger, "Listening on %s:%d", "0.0.0.0", 8080);
    warning!(logger, "Cache hit ratio %.1f%%", 87.25);

    println!("\n3. Default verbosity hides trace and debug:");
    logger.set_log_level(VerbosityLevel::Verbose);
    logger.trace("Trace message (hidden)", &[]);
    logger.debug("Debug message (hidden)", &[]);
    logger.notice("Notice message (visible)", &[]);
    logger.error("Error message (visible)", &[]);

    println!("\n4. Without colors:");
    logger.disable_color(true);
    logger.success("Plain success", &[]);

    println!("\n=== Example completed successfully! ===");
}

//! File logging example
//!
//! Demonstrates console and rotating file output side by side, with the file
//! written as JSON while the console stays plain text.
//!
//! Run with: cargo run --example file_logging

use service_logger::prelude::*;

fn main() {
    println!("=== Service Logger - File Logging Example ===\n");

    let logger = Logger::new();
    logger.init("file-logging", env!("CARGO_PKG_VERSION"));
    logger.set_log_file(
        FileSinkConfig::enabled("logs/application.log")
            .with_max_size(10)
            .with_max_age(7)
            .with_compression(true)
            .with_json(true),
    );

    println!("1. Logging to both console and file:");
    logger.info("Application started", &[]);
    logger.notice("Loading configuration...", &[]);
    logger.success("Configuration loaded", &[]);
    logger.warning("Using default settings for some options", &[]);
    logger.error("Failed to load optional plugin", &[]);

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        logger.info("Processing item %d/5", &[i.into()]);
        if i == 3 {
            logger.warning("Item 3 took longer than expected", &[]);
        }
    }

    println!("\n3. Console off, file only:");
    logger.set_print_to_console(false);
    logger.info("This line only lands in the file", &[]);
    logger.set_print_to_console(true);

    logger.info("All operations completed", &[]);
    logger.flush();

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/application.log' for the JSON log output");
}

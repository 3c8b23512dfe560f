//! JSON output example
//!
//! Demonstrates JSON lines, structured payloads, the log observer, request
//! logging and the `log` crate bridge.
//!
//! Run with: cargo run --example json_output

use serde_json::json;
use service_logger::prelude::*;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    println!("=== Service Logger - JSON Output Example ===\n");

    let config: LoggerConfig = serde_json::from_value(json!({
        "level": "trace",
        "format": "json",
    }))
    .unwrap_or_default();
    let logger = Arc::new(Logger::from_config("json-output", "1.0.0", &config));

    logger.set_on_logger_handler(|record, _text| {
        if record.level == LogLevel::Error {
            eprintln!("observer saw error record {}", record.id);
        }
    });

    println!("1. Text and structured payloads:");
    logger.info("user %s signed in", &["ana".into()]);
    logger.success(json!({"order": 1042, "total": 99.5, "currency": "EUR"}), &[]);
    logger.error(
        std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out after %ds"),
        &[30.into()],
    );

    println!("\n2. Request summaries:");
    logger.request(
        &RequestSummary::new("GET", "/orders", 200)
            .with_query("page=2")
            .with_client_ip("192.168.1.20")
            .with_latency(Duration::from_micros(1830)),
    );
    logger.request(
        &RequestSummary::new("DELETE", "/orders/7", 403)
            .with_client_ip("192.168.1.20")
            .with_error("forbidden"),
    );

    println!("\n3. Other logging surfaces:");
    if let Err(e) = LogBridge::install(Arc::clone(&logger)) {
        logger.warning("log bridge not installed: %v", &[e.to_string().into()]);
    }
    log::warn!("emitted through the log facade");

    let mut writer = SystemWriter::new(Arc::clone(&logger));
    let _ = writeln!(writer, "line written through io::Write");

    println!("\n=== Example completed successfully! ===");
}

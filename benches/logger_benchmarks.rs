//! Criterion benchmarks for service_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;
use service_logger::core::{render_json, render_plain, sprintf};
use service_logger::prelude::*;
use std::sync::Arc;
use std::thread;

/// Discards everything so the numbers measure the pipeline, not the terminal.
struct NullSink;

impl Sink for NullSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        black_box(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn quiet_logger(level: VerbosityLevel, format: OutputFormat) -> Logger {
    Logger::builder()
        .namespace("bench", "1.0.0")
        .level(level)
        .output_format(format)
        .console_sink(NullSink)
        .build()
}

fn sample_record() -> LogRecord {
    LogRecord::build(
        LogLevel::Info,
        CallerInfo::new("src/server.rs", 120, "bench::server::handle"),
        "request %s took %dms".into(),
        &["/orders".into(), 42.into()],
    )
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let plain = quiet_logger(VerbosityLevel::Trace, OutputFormat::PlainText);
    group.bench_function("plain_text", |b| {
        b.iter(|| {
            plain.info(black_box("Info message"), &[]);
        });
    });

    group.bench_function("plain_text_with_args", |b| {
        b.iter(|| {
            plain.info(black_box("user %s logged in from %s"), &["ana".into(), "10.0.0.1".into()]);
        });
    });

    let json_logger = quiet_logger(VerbosityLevel::Trace, OutputFormat::Json);
    group.bench_function("json", |b| {
        b.iter(|| {
            json_logger.info(black_box("Info message"), &[]);
        });
    });

    group.bench_function("json_fields", |b| {
        b.iter(|| {
            json_logger.info(json!({"user": "ana", "attempt": 3}), &[]);
        });
    });

    group.finish();
}

fn bench_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered");
    group.throughput(Throughput::Elements(1));

    let logger = quiet_logger(VerbosityLevel::Error, OutputFormat::PlainText);
    group.bench_function("below_threshold", |b| {
        b.iter(|| {
            logger.debug(black_box("Debug message"), &[]);
        });
    });

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    let record = sample_record();

    group.bench_function("plain", |b| {
        b.iter(|| black_box(render_plain(&record, "bench", false)));
    });

    group.bench_function("plain_colored", |b| {
        b.iter(|| black_box(render_plain(&record, "bench", true)));
    });

    group.bench_function("json", |b| {
        b.iter(|| black_box(render_json(&record)));
    });

    group.bench_function("sprintf", |b| {
        b.iter(|| {
            black_box(sprintf(
                "[HTTP] %3d | %13v | %15s | %s %#v",
                &[200.into(), "1.2ms".into(), "10.0.0.1".into(), "GET".into(), "/".into()],
            ))
        });
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_function(format!("{}_threads", threads), |b| {
            let logger = Arc::new(quiet_logger(VerbosityLevel::Trace, OutputFormat::PlainText));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for i in 0..100 {
                                logger.info("message %d", &[i.into()]);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_logging,
    bench_filtered,
    bench_rendering,
    bench_concurrent
);
criterion_main!(benches);

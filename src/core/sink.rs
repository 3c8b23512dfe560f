//! Sink trait for log output destinations
//!
//! A sink only moves bytes. Filtering and rendering happen before a sink
//! ever sees a record.

use super::error::Result;

pub trait Sink: Send + Sync {
    /// Write one fully rendered chunk, newline included.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

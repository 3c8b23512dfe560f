//! Console sink implementation

use crate::core::{Result, Sink};
use std::io::Write;

/// Writes rendered records to standard output.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_sink_writes() {
        let mut sink = ConsoleSink::new();
        assert!(sink.write(b"console sink test line\n").is_ok());
        assert!(sink.flush().is_ok());
        assert_eq!(sink.name(), "console");
    }
}

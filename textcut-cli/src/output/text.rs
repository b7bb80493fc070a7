//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde_json::Value;
use std::io::Write;
use textcut_core::Record;

/// Plain text formatter - outputs the computed fragment of each record
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_record(&mut self, record: &Record, field: &str) -> Result<()> {
        if let Some(Value::String(fragment)) = record.get(field) {
            writeln!(self.writer, "{}", fragment)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

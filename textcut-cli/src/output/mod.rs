//! Output formatting module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use textcut_core::Record;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output a single record
    ///
    /// `field` names the computed fragment field of this record.
    fn format_record(&mut self, record: &Record, field: &str) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod jsonl;
pub mod text;

pub use json::JsonFormatter;
pub use jsonl::JsonLinesFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of output records
    #[default]
    Json,
    /// One JSON output record per line
    Jsonl,
    /// The computed fragment only, one per line
    Text,
}

impl OutputFormat {
    /// All formats, in display order
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Jsonl, OutputFormat::Text];

    /// Format name as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Text => "text",
        }
    }

    /// One-line description for listings
    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON array of output records",
            OutputFormat::Jsonl => "one JSON output record per line",
            OutputFormat::Text => "computed chunk or match only, one per line",
        }
    }

    /// Build a formatter writing to `writer`
    pub fn formatter<'w, W>(self, writer: W, pretty: bool) -> Box<dyn OutputFormatter + 'w>
    where
        W: Write + Send + Sync + 'w,
    {
        match self {
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty)),
            OutputFormat::Jsonl => Box::new(JsonLinesFormatter::new(writer)),
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        }
    }
}

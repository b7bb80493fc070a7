//! Turning input sources into records

use super::{FileReader, Source};
use crate::error::CliError;
use anyhow::Result;
use serde_json::Value;
use textcut_core::Record;

/// How the content of a source is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// Pick by file extension (content sniffing for stdin)
    Auto,
    /// A JSON array of objects, or a single object
    Json,
    /// One JSON object per line
    Jsonl,
    /// The whole source becomes the text of one record
    Text,
}

impl InputFormat {
    /// Resolve `Auto` for a concrete source
    pub fn detect(self, source: &Source, content: &str) -> InputFormat {
        if self != InputFormat::Auto {
            return self;
        }

        match source {
            Source::File(path) => match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => InputFormat::Json,
                Some("jsonl") | Some("ndjson") => InputFormat::Jsonl,
                _ => InputFormat::Text,
            },
            Source::Stdin => match content.trim_start().chars().next() {
                Some('[') => InputFormat::Json,
                Some('{') if serde_json::from_str::<Value>(content).is_ok() => InputFormat::Json,
                Some('{') => InputFormat::Jsonl,
                _ => InputFormat::Text,
            },
        }
    }
}

/// Read and parse every record of a source
///
/// Plain text sources produce one record holding the content under
/// `text_field` and the source name under `source`.
pub fn read_records(source: &Source, format: InputFormat, text_field: &str) -> Result<Vec<Record>> {
    let content = FileReader::read_source(source)?;

    let records = match format.detect(source, &content) {
        InputFormat::Json => parse_json(&content, source)?,
        InputFormat::Jsonl => parse_jsonl(&content, source)?,
        InputFormat::Text | InputFormat::Auto => vec![text_record(content, source, text_field)],
    };

    log::debug!("read {} records from {}", records.len(), source);
    Ok(records)
}

fn parse_json(content: &str, source: &Source) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| CliError::InvalidInput(format!("{source}: {e}")))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| into_record(item, || format!("{source}: element {i}")))
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        _ => Err(CliError::InvalidInput(format!(
            "{source}: expected a JSON array of objects or a single object"
        ))
        .into()),
    }
}

fn parse_jsonl(content: &str, source: &Source) -> Result<Vec<Record>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let value: Value = serde_json::from_str(line)
                .map_err(|e| CliError::InvalidInput(format!("{source}: line {}: {e}", i + 1)))?;
            into_record(value, || format!("{source}: line {}", i + 1))
        })
        .collect()
}

fn into_record(value: Value, location: impl FnOnce() -> String) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::InvalidInput(format!("{} is not a JSON object", location())).into()),
    }
}

fn text_record(content: String, source: &Source, text_field: &str) -> Record {
    let mut record = Record::new();
    record.insert(text_field.to_string(), Value::String(content));
    record.insert("source".to_string(), Value::String(source.to_string()));
    record
}

//! Text splitting and regex extraction with record fan-out
//!
//! Given a text value this crate either splits it into fragments (fixed
//! length, paragraphs, sentences, words, or a separator pattern) or extracts
//! every substring matching a pattern. Applied to records, every fragment
//! becomes a copy of the source record with a `chunk` or `match` field added.
//!
//! # Example
//!
//! ```rust
//! use textcut_core::{Config, SplitMethod};
//!
//! let config = Config::split(SplitMethod::Sentence);
//! let sentences = textcut_core::process("Hi there. How are you?", &config).unwrap();
//! assert_eq!(sentences, vec!["Hi there.", " How are you?"]);
//!
//! let vowels = textcut_core::process("hola mundo", &Config::extract("[aeiou]")).unwrap();
//! assert_eq!(vowels, vec!["o", "a", "u", "o"]);
//! ```
//!
//! Records are plain JSON objects:
//!
//! ```rust
//! use serde_json::json;
//! use textcut_core::{BatchProcessor, Config, Record};
//!
//! let Some(record) = json!({ "id": 1, "text": "abcdef" }).as_object().cloned() else {
//!     unreachable!()
//! };
//! let config = Config::builder().length(4).build().unwrap();
//! let output = BatchProcessor::new().process(&[record], &config).unwrap();
//!
//! assert_eq!(output.records.len(), 2);
//! assert_eq!(output.records[1]["chunk"], "ef");
//! assert_eq!(output.records[1]["id"], 1);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod record;
pub mod segmenter;

pub use config::{
    Config, ConfigBuilder, MatchMode, Operation, Params, SplitMethod, DEFAULT_EXTRACT_PATTERN,
    DEFAULT_LENGTH, DEFAULT_SPLIT_PATTERN, DEFAULT_TEXT_FIELD,
};
pub use error::{BatchError, Result, SegmentError};
pub use record::{
    fan_out, text_of, BatchOutput, BatchProcessor, ErrorPolicy, Record, RecordError,
    DEFAULT_PARALLEL_THRESHOLD,
};
pub use segmenter::{Fragment, Segmenter};

/// Split or extract `text` with a one-off configuration
pub fn process(text: &str, config: &Config) -> Result<Vec<String>> {
    Ok(Segmenter::new(config.clone())?.process(text))
}

/// Fan out `records` with a shared configuration, aborting on the first error
pub fn process_records(
    records: &[Record],
    config: &Config,
) -> std::result::Result<Vec<Record>, BatchError> {
    BatchProcessor::new()
        .process(records, config)
        .map(|output| output.records)
}

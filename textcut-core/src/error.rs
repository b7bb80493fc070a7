//! Error types for segmentation and batch processing

use thiserror::Error;

/// Errors raised while configuring or running a segmentation
#[derive(Debug, Clone, Error)]
pub enum SegmentError {
    /// The text field is absent, not a string, or empty
    ///
    /// Batch processing treats this as "skip the record", never as a failure.
    #[error("text field '{field}' is missing, empty, or not a string")]
    MissingField {
        /// Name of the field that was looked up
        field: String,
    },

    /// A user-supplied regular expression failed to compile
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as supplied
        pattern: String,
        /// Compilation error from the regex engine
        #[source]
        source: regex::Error,
    },

    /// Non-positive chunk length for the `length` split method
    #[error("chunk length must be at least 1, got {0}")]
    InvalidLength(i64),

    /// Malformed or unknown configuration values
    #[error("configuration error: {0}")]
    Config(String),
}

impl SegmentError {
    /// Whether the record should be skipped rather than reported
    pub fn is_skip(&self) -> bool {
        matches!(self, SegmentError::MissingField { .. })
    }
}

/// A record-level failure that aborted a batch
#[derive(Debug, Error)]
#[error("record {index}: {source}")]
pub struct BatchError {
    /// Position of the failing record in the input list
    pub index: usize,
    /// The underlying failure
    #[source]
    pub source: SegmentError,
}

/// Result type for segmentation operations
pub type Result<T> = std::result::Result<T, SegmentError>;

//! Record fan-out and batch processing
//!
//! A batch is an ordered list of JSON-like records. Each record with text is
//! segmented and expanded into one output record per fragment; everything is
//! flattened into a single list that keeps input order, then fragment order.

use crate::config::{Config, Operation};
use crate::error::{BatchError, Result, SegmentError};
use crate::segmenter::Segmenter;
use serde_json::{Map, Value};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An ordered mapping from field name to value
pub type Record = Map<String, Value>;

/// Default minimum batch size for parallel processing
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Look up the source text of a record
///
/// Absent, non-string and empty values are all reported as
/// [`SegmentError::MissingField`].
pub fn text_of<'r>(record: &'r Record, field: &str) -> Result<&'r str> {
    match record.get(field) {
        Some(Value::String(text)) if !text.is_empty() => Ok(text),
        _ => Err(SegmentError::MissingField {
            field: field.to_string(),
        }),
    }
}

/// Copy `record` once per fragment, adding the operation's output field
///
/// An existing field with the same name is overwritten in place.
pub fn fan_out<'a, I>(record: &Record, operation: Operation, fragments: I) -> Vec<Record>
where
    I: IntoIterator<Item = &'a str>,
{
    let field = operation.output_field();

    fragments
        .into_iter()
        .map(|fragment| {
            let mut out = record.clone();
            out.insert(field.to_string(), Value::String(fragment.to_string()));
            out
        })
        .collect()
}

/// How a batch reacts to a record that fails to process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing record and return no output
    #[default]
    Abort,
    /// Record the failure and keep going
    Continue,
}

/// A failure recorded under [`ErrorPolicy::Continue`]
#[derive(Debug, Clone)]
pub struct RecordError {
    /// Position of the record in the input list
    pub index: usize,
    /// What went wrong
    pub error: SegmentError,
}

/// Flattened result of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    /// Output records in input order, then fragment order
    pub records: Vec<Record>,
    /// Input index of each output record, parallel to `records`
    pub origins: Vec<usize>,
    /// Per-record failures (only under [`ErrorPolicy::Continue`])
    pub errors: Vec<RecordError>,
    /// Records without text
    pub skipped: usize,
}

/// Drives segmentation over a list of records
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    policy: ErrorPolicy,
    parallel_threshold: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProcessor {
    /// Create a processor that aborts on the first error
    pub fn new() -> Self {
        Self {
            policy: ErrorPolicy::Abort,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Set the error policy
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the minimum number of records before work is spread across threads
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Process every record with one shared configuration
    ///
    /// The configuration is compiled once, and only when at least one record
    /// carries text, so a bad pattern over a batch without text yields an
    /// empty output rather than an error.
    pub fn process(
        &self,
        records: &[Record],
        config: &Config,
    ) -> std::result::Result<BatchOutput, BatchError> {
        let first_with_text = records
            .iter()
            .position(|record| text_of(record, &config.text_field).is_ok());

        let Some(first_index) = first_with_text else {
            log::debug!("no record carries field '{}'", config.text_field);
            return Ok(BatchOutput {
                skipped: records.len(),
                ..Default::default()
            });
        };

        match Segmenter::new(config.clone()) {
            Ok(segmenter) => self.run(records, |_, record| segmenter.process_record(record)),
            Err(error) => match self.policy {
                ErrorPolicy::Abort => Err(BatchError {
                    index: first_index,
                    source: error,
                }),
                ErrorPolicy::Continue => self.run(records, |_, record| {
                    text_of(record, &config.text_field)?;
                    Err(error.clone())
                }),
            },
        }
    }

    /// Process every record with its own configuration
    ///
    /// `resolve` is called once per record. The text check runs before the
    /// configuration is compiled.
    pub fn process_with<F>(
        &self,
        records: &[Record],
        resolve: F,
    ) -> std::result::Result<BatchOutput, BatchError>
    where
        F: Fn(usize, &Record) -> Result<Config> + Sync,
    {
        self.run(records, |index, record| {
            let config = resolve(index, record)?;
            text_of(record, &config.text_field)?;
            Segmenter::new(config)?.process_record(record)
        })
    }

    fn run<F>(&self, records: &[Record], op: F) -> std::result::Result<BatchOutput, BatchError>
    where
        F: Fn(usize, &Record) -> Result<Vec<Record>> + Sync,
    {
        if self.use_parallel(records.len()) {
            return self.run_parallel(records, op);
        }

        self.collect(
            records
                .iter()
                .enumerate()
                .map(|(index, record)| (index, op(index, record))),
        )
    }

    fn use_parallel(&self, len: usize) -> bool {
        cfg!(feature = "parallel") && len >= self.parallel_threshold
    }

    #[cfg(feature = "parallel")]
    fn run_parallel<F>(
        &self,
        records: &[Record],
        op: F,
    ) -> std::result::Result<BatchOutput, BatchError>
    where
        F: Fn(usize, &Record) -> Result<Vec<Record>> + Sync,
    {
        log::debug!("processing {} records in parallel", records.len());
        let outcomes: Vec<_> = records
            .par_iter()
            .enumerate()
            .map(|(index, record)| op(index, record))
            .collect();
        self.collect(outcomes.into_iter().enumerate())
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel<F>(
        &self,
        records: &[Record],
        op: F,
    ) -> std::result::Result<BatchOutput, BatchError>
    where
        F: Fn(usize, &Record) -> Result<Vec<Record>> + Sync,
    {
        self.collect(
            records
                .iter()
                .enumerate()
                .map(|(index, record)| (index, op(index, record))),
        )
    }

    fn collect<I>(&self, outcomes: I) -> std::result::Result<BatchOutput, BatchError>
    where
        I: Iterator<Item = (usize, Result<Vec<Record>>)>,
    {
        let mut output = BatchOutput::default();

        for (index, outcome) in outcomes {
            match outcome {
                Ok(records) => {
                    output.origins.extend(std::iter::repeat(index).take(records.len()));
                    output.records.extend(records);
                }
                Err(error) if error.is_skip() => {
                    log::debug!("skipping record {index}: {error}");
                    output.skipped += 1;
                }
                Err(error) => match self.policy {
                    ErrorPolicy::Abort => {
                        return Err(BatchError {
                            index,
                            source: error,
                        })
                    }
                    ErrorPolicy::Continue => {
                        log::warn!("record {index} failed: {error}");
                        output.errors.push(RecordError { index, error });
                    }
                },
            }
        }

        Ok(output)
    }
}

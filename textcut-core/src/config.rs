//! Segmentation configuration
//!
//! [`Config`] is the validated value object the segmenter runs on. Hosts that
//! receive loosely typed parameters (CLI flags, TOML files, per-record JSON
//! objects) collect them into [`Params`] and call [`Params::resolve`], which is
//! the single place where parameter shapes are checked.

use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default name of the field holding the source text
pub const DEFAULT_TEXT_FIELD: &str = "text";

/// Default extraction pattern (vowels, including accented Spanish vowels)
pub const DEFAULT_EXTRACT_PATTERN: &str = "[aeiouáéíóúüAEIOUÁÉÍÓÚÜ]";

/// Default chunk length in characters for the `length` method
pub const DEFAULT_LENGTH: usize = 100;

/// Default pattern for the `regex` split method
pub const DEFAULT_SPLIT_PATTERN: &str = "\\n\\n+";

/// What to do with the text of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Divide the text into fragments
    #[default]
    Split,
    /// Collect every substring matching a pattern
    Extract,
}

impl Operation {
    /// Name of the field added to each output record
    pub fn output_field(&self) -> &'static str {
        match self {
            Operation::Split => "chunk",
            Operation::Extract => "match",
        }
    }

    /// Parameter value for this operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Split => "split",
            Operation::Extract => "extract",
        }
    }
}

impl FromStr for Operation {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "split" => Ok(Operation::Split),
            "extract" => Ok(Operation::Extract),
            other => Err(SegmentError::Config(format!("unknown operation '{other}'"))),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boundary strategy for the split operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    /// Fixed number of characters per chunk
    #[default]
    Length,
    /// Blank-line separated paragraphs
    Paragraph,
    /// Runs of text ending in `.`, `!` or `?`
    Sentence,
    /// Whitespace separated words
    Word,
    /// A user-supplied separator pattern
    Regex,
}

impl SplitMethod {
    /// All methods, in display order
    pub const ALL: [SplitMethod; 5] = [
        SplitMethod::Length,
        SplitMethod::Paragraph,
        SplitMethod::Sentence,
        SplitMethod::Word,
        SplitMethod::Regex,
    ];

    /// Parameter value for this method
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMethod::Length => "length",
            SplitMethod::Paragraph => "paragraph",
            SplitMethod::Sentence => "sentence",
            SplitMethod::Word => "word",
            SplitMethod::Regex => "regex",
        }
    }

    /// One-line description for listings
    pub fn description(&self) -> &'static str {
        match self {
            SplitMethod::Length => "fixed number of characters per chunk",
            SplitMethod::Paragraph => "split on one or more blank lines",
            SplitMethod::Sentence => "text up to and including . ! or ? runs",
            SplitMethod::Word => "split on whitespace runs",
            SplitMethod::Regex => "split on a user-supplied pattern",
        }
    }
}

impl FromStr for SplitMethod {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self> {
        SplitMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| SegmentError::Config(format!("unknown split method '{s}'")))
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many pattern matches an operation consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every non-overlapping match, left to right
    #[default]
    All,
    /// Only the leftmost match
    First,
}

impl FromStr for MatchMode {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(MatchMode::All),
            "first" => Ok(MatchMode::First),
            other => Err(SegmentError::Config(format!("unknown match mode '{other}'"))),
        }
    }
}

/// Validated configuration for one segmentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Field of the input record holding the text
    pub text_field: String,
    /// Split or extract
    pub operation: Operation,
    /// Strategy used when `operation` is split
    pub split_method: SplitMethod,
    /// Characters per chunk for [`SplitMethod::Length`]
    pub length: usize,
    /// Pattern for [`Operation::Extract`]
    pub regex: String,
    /// Separator pattern for [`SplitMethod::Regex`]
    pub split_regex: String,
    /// Case sensitivity override; `None` means case-insensitive for extract
    /// and case-sensitive for regex splitting
    pub case_insensitive: Option<bool>,
    /// Whether patterns apply globally or to the first match only
    pub match_mode: MatchMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text_field: DEFAULT_TEXT_FIELD.to_string(),
            operation: Operation::Split,
            split_method: SplitMethod::Length,
            length: DEFAULT_LENGTH,
            regex: DEFAULT_EXTRACT_PATTERN.to_string(),
            split_regex: DEFAULT_SPLIT_PATTERN.to_string(),
            case_insensitive: None,
            match_mode: MatchMode::All,
        }
    }
}

impl Config {
    /// Split configuration with the given method and default parameters
    pub fn split(method: SplitMethod) -> Self {
        Self {
            split_method: method,
            ..Default::default()
        }
    }

    /// Extract configuration with the given pattern
    pub fn extract(pattern: impl Into<String>) -> Self {
        Self {
            operation: Operation::Extract,
            regex: pattern.into(),
            ..Default::default()
        }
    }

    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The pattern this configuration compiles, if any
    pub fn active_pattern(&self) -> Option<&str> {
        match (self.operation, self.split_method) {
            (Operation::Extract, _) => Some(&self.regex),
            (Operation::Split, SplitMethod::Regex) => Some(&self.split_regex),
            (Operation::Split, _) => None,
        }
    }

    /// Effective case sensitivity for the active pattern
    pub fn ignores_case(&self) -> bool {
        self.case_insensitive
            .unwrap_or(self.operation == Operation::Extract)
    }

    /// Check the parameters that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        if self.text_field.is_empty() {
            return Err(SegmentError::Config(
                "text field name cannot be empty".to_string(),
            ));
        }

        if self.uses_length() && self.length == 0 {
            return Err(SegmentError::InvalidLength(0));
        }

        Ok(())
    }

    /// Whether `length` takes part in segmentation
    fn uses_length(&self) -> bool {
        self.operation == Operation::Split && self.split_method == SplitMethod::Length
    }
}

/// Builder for [`Config`]
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
    raw_length: Option<i64>,
}

impl ConfigBuilder {
    /// Set the text field name
    pub fn text_field(mut self, field: impl Into<String>) -> Self {
        self.config.text_field = field.into();
        self
    }

    /// Set the operation
    pub fn operation(mut self, operation: Operation) -> Self {
        self.config.operation = operation;
        self
    }

    /// Set the split method
    pub fn split_method(mut self, method: SplitMethod) -> Self {
        self.config.split_method = method;
        self
    }

    /// Set the chunk length
    ///
    /// Values below 1 are rejected by [`build`](Self::build) when the length
    /// method is selected and ignored otherwise.
    pub fn length(mut self, length: i64) -> Self {
        self.raw_length = Some(length);
        self
    }

    /// Set the extraction pattern
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.config.regex = pattern.into();
        self
    }

    /// Set the split separator pattern
    pub fn split_regex(mut self, pattern: impl Into<String>) -> Self {
        self.config.split_regex = pattern.into();
        self
    }

    /// Override case sensitivity
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.config.case_insensitive = Some(enabled);
        self
    }

    /// Set the match mode
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.config.match_mode = mode;
        self
    }

    /// Build the configuration
    pub fn build(mut self) -> Result<Config> {
        if let Some(raw) = self.raw_length {
            match usize::try_from(raw).ok().filter(|length| *length > 0) {
                Some(length) => self.config.length = length,
                None if self.config.uses_length() => {
                    return Err(SegmentError::InvalidLength(raw));
                }
                None => log::debug!("ignoring length {raw} outside the length method"),
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

/// Raw parameter set using host parameter names
///
/// Every field is optional so sets can be layered with [`Params::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Params {
    /// Field of the input record holding the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_field: Option<String>,
    /// `split` or `extract`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// `length`, `paragraph`, `sentence`, `word` or `regex`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_method: Option<String>,
    /// Extraction pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Characters per chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    /// Split separator pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_regex: Option<String>,
    /// Case sensitivity override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
    /// `all` or `first`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<String>,
}

impl Params {
    /// Parse a parameter object, e.g. a per-record override
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Params::deserialize(value)
            .map_err(|e| SegmentError::Config(format!("invalid parameters: {e}")))
    }

    /// Layer `over` on top of `self`; fields set in `over` win
    pub fn merge(&self, over: &Params) -> Params {
        Params {
            text_field: over.text_field.clone().or_else(|| self.text_field.clone()),
            operation: over.operation.clone().or_else(|| self.operation.clone()),
            split_method: over
                .split_method
                .clone()
                .or_else(|| self.split_method.clone()),
            regex: over.regex.clone().or_else(|| self.regex.clone()),
            length: over.length.or(self.length),
            split_regex: over
                .split_regex
                .clone()
                .or_else(|| self.split_regex.clone()),
            case_insensitive: over.case_insensitive.or(self.case_insensitive),
            match_mode: over.match_mode.clone().or_else(|| self.match_mode.clone()),
        }
    }

    /// Validate into a [`Config`], filling unset values with defaults
    pub fn resolve(&self) -> Result<Config> {
        let mut builder = Config::builder();

        if let Some(field) = &self.text_field {
            builder = builder.text_field(field.as_str());
        }
        if let Some(operation) = &self.operation {
            builder = builder.operation(operation.parse()?);
        }
        if let Some(method) = &self.split_method {
            builder = builder.split_method(method.parse()?);
        }
        if let Some(pattern) = &self.regex {
            builder = builder.regex(pattern.as_str());
        }
        if let Some(length) = self.length {
            builder = builder.length(length);
        }
        if let Some(pattern) = &self.split_regex {
            builder = builder.split_regex(pattern.as_str());
        }
        if let Some(enabled) = self.case_insensitive {
            builder = builder.case_insensitive(enabled);
        }
        if let Some(mode) = &self.match_mode {
            builder = builder.match_mode(mode.parse()?);
        }

        builder.build()
    }
}

//! Split and extract strategies
//!
//! A [`Segmenter`] is built once from a [`Config`] and compiles any
//! user-supplied pattern at construction. Patterns run on the `regex` crate,
//! whose matching time is linear in the input.

use crate::config::{Config, MatchMode, Operation, SplitMethod};
use crate::error::{Result, SegmentError};
use crate::record::{fan_out, text_of, Record};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();
static SENTENCE: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn paragraph_break() -> &'static Regex {
    PARAGRAPH_BREAK.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"))
}

fn sentence() -> &'static Regex {
    SENTENCE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// A fragment of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'t> {
    /// The fragment content, borrowed from the source
    pub text: &'t str,
    /// Byte offset of the fragment in the source
    pub start: usize,
}

impl<'t> Fragment<'t> {
    fn new(text: &'t str, start: usize) -> Self {
        Self { text, start }
    }

    /// Byte offset one past the end of the fragment
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

#[derive(Debug)]
enum Strategy {
    Extract(Regex),
    Length(usize),
    Paragraph,
    Sentence,
    Word,
    Pattern(Regex),
}

/// Compiled, reusable segmenter for one configuration
#[derive(Debug)]
pub struct Segmenter {
    config: Config,
    strategy: Strategy,
}

impl Segmenter {
    /// Validate the configuration and compile its pattern
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let strategy = match config.operation {
            Operation::Extract => {
                Strategy::Extract(compile(&config.regex, config.ignores_case())?)
            }
            Operation::Split => match config.split_method {
                SplitMethod::Length => Strategy::Length(config.length),
                SplitMethod::Paragraph => Strategy::Paragraph,
                SplitMethod::Sentence => Strategy::Sentence,
                SplitMethod::Word => Strategy::Word,
                SplitMethod::Regex => {
                    Strategy::Pattern(compile(&config.split_regex, config.ignores_case())?)
                }
            },
        };

        Ok(Self { config, strategy })
    }

    /// The configuration this segmenter was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Produce the fragments of `text` in source order
    ///
    /// Split operations never return empty fragments. Extract returns every
    /// match as-is, including empty ones.
    pub fn segment<'t>(&self, text: &'t str) -> Vec<Fragment<'t>> {
        let limit = match self.config.match_mode {
            MatchMode::All => usize::MAX,
            MatchMode::First => 1,
        };

        let fragments = match &self.strategy {
            Strategy::Extract(re) => {
                return re
                    .find_iter(text)
                    .take(limit)
                    .map(|m| Fragment::new(m.as_str(), m.start()))
                    .collect();
            }
            Strategy::Length(length) => split_length(text, *length),
            Strategy::Paragraph => split_on(paragraph_break(), text),
            Strategy::Sentence => sentences(text),
            Strategy::Word => split_on(whitespace(), text),
            Strategy::Pattern(re) => split_with_captures(re, text, limit),
        };

        fragments
            .into_iter()
            .filter(|fragment| !fragment.text.is_empty())
            .collect()
    }

    /// Produce the fragments of `text` as owned strings
    pub fn process(&self, text: &str) -> Vec<String> {
        self.segment(text)
            .into_iter()
            .map(|fragment| fragment.text.to_string())
            .collect()
    }

    /// Fan one record out into one output record per fragment
    ///
    /// Returns [`SegmentError::MissingField`] when the record carries no text;
    /// callers that follow the skip policy check [`SegmentError::is_skip`].
    pub fn process_record(&self, record: &Record) -> Result<Vec<Record>> {
        let text = text_of(record, &self.config.text_field)?;
        let fragments = self.segment(text);
        Ok(fan_out(
            record,
            self.config.operation,
            fragments.iter().map(|fragment| fragment.text),
        ))
    }
}

/// Compile a user-supplied pattern
pub fn compile(pattern: &str, case_insensitive: bool) -> Result<Regex> {
    log::debug!("compiling pattern {pattern:?} (case_insensitive={case_insensitive})");

    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| SegmentError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Consecutive runs of `length` characters; the last run holds the remainder
fn split_length(text: &str, length: usize) -> Vec<Fragment<'_>> {
    let mut chunks = Vec::with_capacity(text.len() / length.max(1) + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == length {
            chunks.push(Fragment::new(&text[start..idx], start));
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(Fragment::new(&text[start..], start));
    }

    chunks
}

fn split_on<'t>(re: &Regex, text: &'t str) -> Vec<Fragment<'t>> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for m in re.find_iter(text) {
        pieces.push(Fragment::new(&text[last..m.start()], last));
        last = m.end();
    }
    pieces.push(Fragment::new(&text[last..], last));

    pieces
}

/// Every `[^.!?]+[.!?]+` run; the whole text when there is none
///
/// Text after the final terminator is not returned.
fn sentences(text: &str) -> Vec<Fragment<'_>> {
    let found: Vec<_> = sentence()
        .find_iter(text)
        .map(|m| Fragment::new(m.as_str(), m.start()))
        .collect();

    if found.is_empty() {
        vec![Fragment::new(text, 0)]
    } else {
        found
    }
}

/// Split on at most `limit` matches, splicing participating capture groups
/// between the surrounding pieces
fn split_with_captures<'t>(re: &Regex, text: &'t str, limit: usize) -> Vec<Fragment<'t>> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for caps in re.captures_iter(text).take(limit) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        pieces.push(Fragment::new(&text[last..whole.start()], last));
        for group in caps.iter().skip(1).flatten() {
            pieces.push(Fragment::new(group.as_str(), group.start()));
        }
        last = whole.end();
    }
    pieces.push(Fragment::new(&text[last..], last));

    pieces
}

//! Process command implementation

use crate::config::{CliConfig, OnError};
use crate::error::CliError;
use crate::input::{read_records, resolve_sources, InputFormat};
use crate::output::{OutputFormat, OutputFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use textcut_core::{
    BatchOutput, BatchProcessor, Config, Operation, Params, Record, DEFAULT_TEXT_FIELD,
};

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files or patterns (supports glob, `-` for stdin)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: json)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// How to read the input sources
    #[arg(long, value_enum, default_value = "auto")]
    pub input_format: InputFormat,

    /// Record field holding the text
    #[arg(long, value_name = "NAME")]
    pub text_field: Option<String>,

    /// Split the text or extract matches
    #[arg(long, value_parser = ["split", "extract"])]
    pub operation: Option<String>,

    /// Split strategy
    #[arg(short = 'm', long, value_parser = ["length", "paragraph", "sentence", "word", "regex"])]
    pub split_method: Option<String>,

    /// Pattern for the extract operation
    #[arg(short, long, value_name = "PATTERN")]
    pub regex: Option<String>,

    /// Characters per chunk for the length method
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub length: Option<i64>,

    /// Separator pattern for the regex method
    #[arg(long, value_name = "PATTERN")]
    pub split_regex: Option<String>,

    /// Override pattern case sensitivity
    #[arg(long, value_name = "BOOL")]
    pub case_insensitive: Option<bool>,

    /// Apply patterns to every match or the first one only
    #[arg(long, value_parser = ["all", "first"])]
    pub match_mode: Option<String>,

    /// Record field holding per-record parameter overrides
    #[arg(long, value_name = "NAME")]
    pub params_field: Option<String>,

    /// What to do with a record that fails
    #[arg(long, value_enum)]
    pub on_error: Option<OnError>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Suppress progress and log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        // Initialize logging based on verbosity
        self.init_logging()?;

        log::info!("Starting text processing");
        log::debug!("Arguments: {:?}", self);

        let file_config = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };

        let params = file_config.params.merge(&self.params());
        let params_field = self
            .params_field
            .clone()
            .or(file_config.processing.params_field.clone());
        let on_error = self.on_error.unwrap_or(file_config.processing.on_error);

        // Without per-record overrides a bad parameter fails before any input is read
        let shared = match &params_field {
            Some(_) => None,
            None => Some(params.resolve().map_err(CliError::from)?),
        };

        let text_field = params.text_field.as_deref().unwrap_or(DEFAULT_TEXT_FIELD);
        let records = self.load_records(text_field)?;

        let plan = match shared {
            Some(config) => Plan::Shared(config),
            None => Plan::PerRecord(
                records
                    .iter()
                    .map(|record| resolve_record_config(&params, params_field.as_deref(), record))
                    .collect(),
            ),
        };

        let processor = BatchProcessor::new()
            .policy(on_error.into())
            .parallel_threshold(file_config.processing.parallel_threshold);

        let result = match &plan {
            Plan::Shared(config) => processor.process(&records, config),
            Plan::PerRecord(configs) => {
                processor.process_with(&records, |index, _| configs[index].clone())
            }
        };
        let output = result.map_err(CliError::from)?;

        log::info!(
            "Processed {} records into {} output records ({} skipped)",
            records.len(),
            output.records.len(),
            output.skipped
        );

        let format = self.format.unwrap_or(file_config.output.format);
        let pretty = self.pretty || file_config.output.pretty;
        self.write_output(&output, &plan, format, pretty)?;

        if !output.errors.is_empty() && !self.quiet {
            eprintln!(
                "{} of {} records failed and were left out",
                output.errors.len(),
                records.len()
            );
        }

        Ok(())
    }

    /// Parameters given on the command line
    fn params(&self) -> Params {
        Params {
            text_field: self.text_field.clone(),
            operation: self.operation.clone(),
            split_method: self.split_method.clone(),
            regex: self.regex.clone(),
            length: self.length,
            split_regex: self.split_regex.clone(),
            case_insensitive: self.case_insensitive,
            match_mode: self.match_mode.clone(),
        }
    }

    /// Read all sources into one record list, in source order
    fn load_records(&self, text_field: &str) -> Result<Vec<Record>> {
        let sources = resolve_sources(&self.input)?;
        log::info!("Found {} input sources", sources.len());

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_sources(sources.len() as u64);

        let mut records = Vec::new();
        for source in &sources {
            records.extend(read_records(source, self.input_format, text_field)?);
            progress.source_completed(&source.to_string());
        }
        progress.finish();

        Ok(records)
    }

    fn write_output(
        &self,
        output: &BatchOutput,
        plan: &Plan,
        format: OutputFormat,
        pretty: bool,
    ) -> Result<()> {
        let mut formatter: Box<dyn OutputFormatter> = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                format.formatter(BufWriter::new(file), pretty)
            }
            None => format.formatter(io::stdout(), pretty),
        };

        for (record, origin) in output.records.iter().zip(&output.origins) {
            formatter.format_record(record, plan.output_field(*origin))?;
        }
        formatter.finish()
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .init();
        }

        Ok(())
    }
}

/// Where each record's configuration comes from
enum Plan {
    /// One configuration for every record
    Shared(Config),
    /// One configuration per input record, by index
    PerRecord(Vec<textcut_core::Result<Config>>),
}

impl Plan {
    /// Fragment field of the output records produced from input `origin`
    fn output_field(&self, origin: usize) -> &'static str {
        let operation = match self {
            Plan::Shared(config) => config.operation,
            Plan::PerRecord(configs) => match configs.get(origin) {
                Some(Ok(config)) => config.operation,
                _ => Operation::default(),
            },
        };
        operation.output_field()
    }
}

/// Layer a record's own parameter object over the run parameters
fn resolve_record_config(
    params: &Params,
    field: Option<&str>,
    record: &Record,
) -> textcut_core::Result<Config> {
    let Some(field) = field else {
        return params.resolve();
    };

    match record.get(field) {
        Some(value) if value.is_object() => params.merge(&Params::from_value(value)?).resolve(),
        Some(value) if !value.is_null() => Err(textcut_core::SegmentError::Config(format!(
            "field '{field}' must hold an object of parameters"
        ))),
        _ => params.resolve(),
    }
}

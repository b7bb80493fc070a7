//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use textcut_core::{DEFAULT_EXTRACT_PATTERN, DEFAULT_LENGTH, DEFAULT_PARALLEL_THRESHOLD};

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        let template = generate_template();

        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the [params] section to pick an operation and method");
        println!("2. Use it for processing:");
        println!(
            "   textcut process -i records.json -c {}",
            self.output.display()
        );

        Ok(())
    }
}

/// Template content; every value matches the built-in default
fn generate_template() -> String {
    format!(
        r#"# textcut configuration
#
# Command-line flags override these values, and a record's own parameter
# object (see processing.params_field) overrides both.

[params]
# Record field holding the text
textField = "text"

# "split" or "extract"
operation = "split"

# length | paragraph | sentence | word | regex
splitMethod = "length"

# Characters per chunk for the length method
length = {DEFAULT_LENGTH}

# Separator for the regex method (case-sensitive unless caseInsensitive is set)
# splitRegex = "\\n\\n+"

# Pattern for the extract operation (case-insensitive unless caseInsensitive is set)
# regex = "{DEFAULT_EXTRACT_PATTERN}"

# "all" or "first"
matchMode = "all"

[output]
# json | jsonl | text
format = "json"
pretty = false

[processing]
# "abort" stops at the first failing record, "continue" leaves it out
on_error = "abort"

# Record field holding per-record parameter overrides
# params_field = "options"

# Minimum number of records before work is spread across threads
parallel_threshold = {DEFAULT_PARALLEL_THRESHOLD}
"#
    )
}

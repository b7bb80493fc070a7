//! CLI command implementations

use crate::output::OutputFormat;
use clap::Subcommand;
use textcut_core::SplitMethod;

pub mod generate_config;
pub mod process;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split record text into chunks or extract pattern matches
    Process(process::ProcessArgs),

    /// Write a configuration file template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List available split methods
    Methods,

    /// List available output formats
    Formats,
}

impl ListCommands {
    /// Print the requested listing to stdout
    pub fn execute(&self) {
        print!("{}", self.render());
    }

    fn render(&self) -> String {
        let rows: Vec<(&str, &str)> = match self {
            ListCommands::Methods => SplitMethod::ALL
                .iter()
                .map(|method| (method.as_str(), method.description()))
                .collect(),
            ListCommands::Formats => OutputFormat::ALL
                .iter()
                .map(|format| (format.as_str(), format.description()))
                .collect(),
        };

        let title = match self {
            ListCommands::Methods => "Available split methods:",
            ListCommands::Formats => "Available output formats:",
        };

        let mut out = format!("{title}\n");
        for (name, description) in rows {
            out.push_str(&format!("  {name:<10} - {description}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_debug_format() {
        let list_cmd = Commands::List {
            subcommand: ListCommands::Methods,
        };

        let debug_str = format!("{:?}", list_cmd);
        assert!(debug_str.contains("List"));
        assert!(debug_str.contains("Methods"));
    }

    #[test]
    fn test_list_methods() {
        let listing = ListCommands::Methods.render();
        assert!(listing.starts_with("Available split methods:"));
        for method in SplitMethod::ALL {
            assert!(listing.contains(method.as_str()));
        }
    }

    #[test]
    fn test_list_formats() {
        let listing = ListCommands::Formats.render();
        assert!(listing.starts_with("Available output formats:"));
        assert!(listing.contains("jsonl"));
        assert_eq!(listing.lines().count(), OutputFormat::ALL.len() + 1);
    }
}

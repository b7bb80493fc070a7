//! Input source resolution using glob

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use std::fmt;
use std::path::PathBuf;

/// Where a batch of records comes from
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    /// Standard input, requested with `-`
    Stdin,
    /// A file on disk
    File(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve file patterns to input sources
///
/// Files are sorted and deduplicated; `-` stands for stdin and is kept first.
pub fn resolve_sources(patterns: &[String]) -> Result<Vec<Source>> {
    let mut files = Vec::new();
    let mut stdin = false;

    for pattern in patterns {
        if pattern == "-" {
            stdin = true;
            continue;
        }

        let paths = glob(pattern).map_err(|_| CliError::InvalidPattern(pattern.clone()))?;

        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {}", pattern))?;

            if path.is_file() {
                files.push(path);
            }
        }
    }

    if files.is_empty() && !stdin {
        return Err(CliError::FileNotFound(patterns.join(", ")).into());
    }

    // Remove duplicates and sort
    files.sort();
    files.dedup();

    let mut sources = Vec::with_capacity(files.len() + 1);
    if stdin {
        sources.push(Source::Stdin);
    }
    sources.extend(files.into_iter().map(Source::File));

    Ok(sources)
}

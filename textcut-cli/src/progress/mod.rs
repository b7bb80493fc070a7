//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for multi-source runs
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Initialize progress bar for reading sources
    ///
    /// A single source gets no bar.
    pub fn init_sources(&mut self, total_sources: u64) {
        if self.quiet || total_sources < 2 {
            return;
        }

        let pb = ProgressBar::new(total_sources);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sources {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Update progress for a completed source
    pub fn source_completed(&self, name: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("Read: {}", name));
            pb.inc(1);
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Whether a bar is being drawn
    pub fn is_active(&self) -> bool {
        self.progress_bar.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_has_no_bar() {
        let mut reporter = ProgressReporter::new(true);
        reporter.init_sources(10);
        assert!(!reporter.is_active());
        reporter.source_completed("a.json");
        reporter.finish();
    }

    #[test]
    fn test_single_source_has_no_bar() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_sources(1);
        assert!(!reporter.is_active());
    }

    #[test]
    fn test_multi_source_bar() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_sources(3);
        assert!(reporter.is_active());
        reporter.source_completed("a.json");
        reporter.finish();
    }
}

//! Suite result reporting
//!
//! # Output Formats
//!
//! - **Console**: one pass/fail line per scenario plus a summary
//! - **JSON**: machine-readable, for CI
//!
//! Reports go to stdout or a file; logs go to stderr, so the two never mix.
//!
//! # Example
//!
//! ```no_run
//! use hostelbite_e2e::reporter::{OutputFormat, Reporter};
//! use hostelbite_e2e::scenario::SuiteResults;
//!
//! # fn example(results: SuiteResults) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&results)?;
//!
//! Reporter::new(OutputFormat::Json).write_to_file(&results, "e2e-results.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;

use anyhow::Result;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::scenario::SuiteResults;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Output format for suite results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Console,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// Reporter for suite results
#[derive(Debug, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print results to stdout
    pub fn report(&self, results: &SuiteResults) -> Result<()> {
        let output = self.format_results(results)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    /// Write results to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, results: &SuiteResults, path: P) -> Result<()> {
        let output = self.format_results(results)?;
        fs::write(path, output)?;
        Ok(())
    }

    pub fn format_results(&self, results: &SuiteResults) -> Result<String> {
        match self.format {
            OutputFormat::Console => ConsoleReporter::format(results),
            OutputFormat::Json => JsonReporter::format(results, false),
            OutputFormat::JsonPretty => JsonReporter::format(results, true),
        }
    }
}

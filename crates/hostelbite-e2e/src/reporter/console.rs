//! Console reporter
//!
//! Prints `✅ <name> passed` / `❌ <name> failed: <error>` per scenario.

use anyhow::Result;
use std::fmt::Write;

use crate::scenario::{ScenarioOutcome, SuiteResults};

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn format(results: &SuiteResults) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "Suite:     {}", results.suite_name)?;
        writeln!(output, "Base URL:  {}", results.base_url)?;
        writeln!(output, "Started:   {}", results.started_at)?;
        writeln!(output)?;

        for outcome in &results.outcomes {
            Self::format_outcome(&mut output, outcome)?;
        }

        let failed = results.failures().count();
        writeln!(output)?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(
            output,
            "{} passed, {} failed in {}ms",
            results.outcomes.len() - failed,
            failed,
            results.total_duration_ms
        )?;
        let status = if results.passed { "PASSED" } else { "FAILED" };
        writeln!(output, "Overall Status: {}", status)?;
        writeln!(output)?;
        Ok(output)
    }

    fn format_outcome(output: &mut String, outcome: &ScenarioOutcome) -> Result<()> {
        if outcome.passed {
            writeln!(
                output,
                "✅ {} passed ({}ms)",
                outcome.name, outcome.duration_ms
            )?;
        } else {
            writeln!(
                output,
                "❌ {} failed: {}",
                outcome.name,
                outcome.error.as_deref().unwrap_or("unknown error")
            )?;
        }
        Ok(())
    }
}

use crate::scenario::SuiteResults;
use anyhow::Result;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    pub fn format(results: &SuiteResults, pretty: bool) -> Result<String> {
        let mut output = if pretty {
            serde_json::to_string_pretty(results)?
        } else {
            serde_json::to_string(results)?
        };
        output.push('\n');
        Ok(output)
    }
}

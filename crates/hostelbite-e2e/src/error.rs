//! Error types for the storefront harness
//!
//! Every error is fatal to the scenario that raised it. Nothing in the
//! harness retries or recovers locally; errors propagate with `?` up to the
//! scenario runner, which records them and reports the scenario as failed.

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the harness
pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// The browser process could not be launched
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// An operation was attempted after the session was stopped
    #[error("Session is not active")]
    SessionClosed,

    /// Navigation to a URL failed
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A required element did not appear within the lookup grace period
    #[error("Element not found: {locator} (after {elapsed:?})")]
    ElementNotFound { locator: String, elapsed: Duration },

    /// A bounded wait elapsed before its condition held
    #[error("Timed out after {elapsed:?} waiting for {condition} (last observed: {last_observed})")]
    WaitTimeout {
        condition: String,
        last_observed: String,
        elapsed: Duration,
    },

    /// A final scenario check failed
    #[error("Assertion failed: {check} (expected {expected}, observed {observed})")]
    Assertion {
        check: String,
        expected: String,
        observed: String,
    },

    /// A page script could not be evaluated or returned an unexpected shape
    #[error("Script error: {0}")]
    Script(String),

    /// Low-level DevTools protocol failure
    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
}

impl HarnessError {
    /// Short machine-readable tag for reports
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::Launch(_) => "launch",
            HarnessError::SessionClosed => "session_closed",
            HarnessError::Navigation { .. } => "navigation",
            HarnessError::ElementNotFound { .. } => "element_not_found",
            HarnessError::WaitTimeout { .. } => "wait_timeout",
            HarnessError::Assertion { .. } => "assertion",
            HarnessError::Script(_) => "script",
            HarnessError::Browser(_) => "browser",
        }
    }

    /// Build an assertion failure from an expected/observed pair
    pub fn assertion(
        check: impl Into<String>,
        expected: impl Into<String>,
        observed: impl Into<String>,
    ) -> Self {
        HarnessError::Assertion {
            check: check.into(),
            expected: expected.into(),
            observed: observed.into(),
        }
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        HarnessError::Script(err.to_string())
    }
}

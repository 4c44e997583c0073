//! Bounded waits
//!
//! A wait repeatedly probes the page until a condition holds or the timeout
//! elapses. Probes report either the value they were waiting for or a short
//! description of what they saw instead, which ends up in the timeout error.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::locator::Locator;

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    /// The condition holds
    Ready(T),
    /// Not yet; carries the observed state
    Pending(String),
}

/// Timing policy shared by every wait in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Default bound for explicit waits
    pub timeout: Duration,
    /// Delay between probes
    pub poll_interval: Duration,
    /// Bound for plain element lookups
    pub implicit_wait: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(12),
            poll_interval: Duration::from_millis(500),
            implicit_wait: Duration::from_secs(1),
        }
    }
}

impl From<&HarnessConfig> for WaitPolicy {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            timeout: config.wait_timeout,
            poll_interval: config.poll_interval,
            implicit_wait: config.implicit_wait,
        }
    }
}

impl WaitPolicy {
    /// Probe until ready or until `timeout` elapses
    ///
    /// The probe always runs at least once, so a zero timeout still checks
    /// the current state. Probe errors abort the wait immediately.
    pub async fn poll<T, F, Fut>(&self, description: &str, timeout: Duration, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Probe<T>>>,
    {
        let start = Instant::now();
        let interval = self.poll_interval.max(Duration::from_millis(1));

        loop {
            let last_observed = match probe().await? {
                Probe::Ready(value) => return Ok(value),
                Probe::Pending(observed) => observed,
            };

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(HarnessError::WaitTimeout {
                    condition: description.to_string(),
                    last_observed,
                    elapsed,
                });
            }

            trace!("{} not met yet: {}", description, last_observed);
            tokio::time::sleep(interval.min(timeout - elapsed)).await;
        }
    }
}

/// Page conditions a session knows how to wait for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Current URL contains the fragment
    UrlContains(String),
    /// First matching element is rendered and visible
    Visible(Locator),
    /// First matching element is visible and enabled
    Clickable(Locator),
    /// First matching input has an empty value
    ValueEmpty(Locator),
    /// At least `n` elements match
    CountAtLeast(Locator, usize),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::UrlContains(fragment) => write!(f, "url contains '{}'", fragment),
            Condition::Visible(locator) => write!(f, "{} to be visible", locator),
            Condition::Clickable(locator) => write!(f, "{} to be clickable", locator),
            Condition::ValueEmpty(locator) => write!(f, "{} to be empty", locator),
            Condition::CountAtLeast(locator, n) => write!(f, "at least {} of {}", n, locator),
        }
    }
}

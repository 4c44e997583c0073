//! Scenario registration and execution
//!
//! A scenario is a named async function over a [`Session`]. The runner gives
//! every scenario the same lifecycle:
//!
//! ```text
//! setup     resolve config, launch a fresh browser
//! run       the journey; the first error aborts the remaining steps
//! teardown  stop the browser (or hold it open for inspection)
//! ```
//!
//! Scenarios never share a session. When a suite runs several at once, each
//! one launches its own browser; nothing is coordinated between them.

use futures::future::LocalBoxFuture;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};

use crate::config::{ConfigResolver, EnvSource, HarnessConfig, ProcessEnv};
use crate::error::{HarnessError, Result};
use crate::session::Session;

/// Body of a scenario
pub type ScenarioFn = for<'a> fn(&'a Session) -> LocalBoxFuture<'a, Result<()>>;

/// A named, independently runnable user journey
#[derive(Clone, Copy)]
pub struct ScenarioDef {
    /// Registry name, e.g. `checkout`
    pub name: &'static str,
    /// One-line summary shown by `list`
    pub description: &'static str,
    /// The journey itself
    pub run: ScenarioFn,
}

impl std::fmt::Debug for ScenarioDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioDef")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Result of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Whether the journey completed without error
    pub passed: bool,
    /// Wall time including browser launch and teardown
    pub duration_ms: u64,
    /// Error message when the scenario failed
    pub error: Option<String>,
    /// Error category when the scenario failed
    pub error_kind: Option<String>,
}

impl ScenarioOutcome {
    fn from_result(name: &str, result: &Result<()>, duration_ms: u64) -> Self {
        match result {
            Ok(()) => Self {
                name: name.to_string(),
                passed: true,
                duration_ms,
                error: None,
                error_kind: None,
            },
            Err(e) => Self {
                name: name.to_string(),
                passed: false,
                duration_ms,
                error: Some(e.to_string()),
                error_kind: Some(e.kind().to_string()),
            },
        }
    }
}

/// Results of a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Name of the suite
    pub suite_name: String,
    /// Storefront origin under test
    pub base_url: String,
    /// Timestamp when the suite started
    pub started_at: String,
    /// Total wall time
    pub total_duration_ms: u64,
    /// Whether every scenario passed
    pub passed: bool,
    /// Per-scenario outcomes, in registration order
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteResults {
    /// Outcomes that failed
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// Process exit code: 0 when everything passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// Runs scenarios with setup/teardown around each
pub struct ScenarioRunner<E = ProcessEnv> {
    resolver: ConfigResolver<E>,
    parallel: usize,
}

impl ScenarioRunner<ProcessEnv> {
    /// Runner resolving configuration from the process environment
    pub fn from_process_env() -> Self {
        Self::new(ConfigResolver::from_process_env())
    }
}

impl<E: EnvSource> ScenarioRunner<E> {
    pub fn new(resolver: ConfigResolver<E>) -> Self {
        Self {
            resolver,
            parallel: 1,
        }
    }

    /// Allow up to `n` scenarios (and browsers) at once
    pub fn with_parallelism(mut self, n: usize) -> Self {
        self.parallel = n.max(1);
        self
    }

    /// Configuration the next session will be started with
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::resolve(&self.resolver)
    }

    /// Run one scenario in a fresh session
    #[instrument(skip(self, scenario), fields(scenario = scenario.name))]
    pub async fn run_one(&self, scenario: &ScenarioDef) -> ScenarioOutcome {
        let start = Instant::now();
        info!("Running {}...", scenario.name);

        let result = self.run_in_session(scenario).await;
        let outcome =
            ScenarioOutcome::from_result(scenario.name, &result, start.elapsed().as_millis() as u64);

        match &result {
            Ok(()) => info!("✅ {} passed", scenario.name),
            Err(e) => error!("❌ {} failed: {}", scenario.name, e),
        }
        outcome
    }

    async fn run_in_session(&self, scenario: &ScenarioDef) -> Result<()> {
        let config = self.config();
        let keep_open = config.keep_open;
        let mut session = Session::start(config).await?;

        let result = (scenario.run)(&session).await;

        if keep_open {
            info!("Browser left open for inspection; press Ctrl+C to close it");
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
            }
        }

        if let Err(e) = session.stop().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        result
    }

    /// Run every scenario, up to the configured parallelism at a time
    #[instrument(skip(self, scenarios), fields(suite = %suite_name, count = scenarios.len()))]
    pub async fn run_suite(&self, suite_name: &str, scenarios: &[ScenarioDef]) -> SuiteResults {
        let start = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();
        let base_url = self.config().base_url;

        info!(
            "Starting suite '{}' with {} scenarios against {}",
            suite_name,
            scenarios.len(),
            base_url
        );

        // Use semaphore to limit concurrent browsers
        let semaphore = Arc::new(Semaphore::new(self.parallel));
        let runs: Vec<_> = scenarios
            .iter()
            .enumerate()
            .map(|(index, scenario)| {
                let sem = semaphore.clone();
                async move {
                    let _permit = sem.acquire().await;
                    (index, self.run_one(scenario).await)
                }
            })
            .collect();

        let mut outcomes: Vec<(usize, ScenarioOutcome)> = stream::iter(runs)
            .buffer_unordered(self.parallel)
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);
        let outcomes: Vec<ScenarioOutcome> = outcomes.into_iter().map(|(_, o)| o).collect();

        let passed = outcomes.iter().all(|o| o.passed);
        let results = SuiteResults {
            suite_name: suite_name.to_string(),
            base_url,
            started_at,
            total_duration_ms: start.elapsed().as_millis() as u64,
            passed,
            outcomes,
        };

        if passed {
            info!(
                "Suite '{}' completed successfully in {}ms",
                suite_name, results.total_duration_ms
            );
        } else {
            warn!(
                "Suite '{}' completed with {} failures",
                suite_name,
                results.failures().count()
            );
        }

        results
    }
}

/// Convenience for scenario bodies: turn a `false` check into an assertion error
pub fn ensure(condition: bool, check: &str, expected: &str, observed: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::assertion(check, expected, observed))
    }
}

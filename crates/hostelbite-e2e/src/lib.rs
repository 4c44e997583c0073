//! End-to-end harness for the HostelBite storefront
//!
//! Drives a real Chromium browser through storefront journeys (register,
//! login, add to cart, checkout, search and filter) and asserts on what the
//! page shows: URLs, visible headings, element counts.
//!
//! # Layers
//!
//! - [`config`]: settings resolved from overrides, environment and defaults
//! - [`session`]: one browser and page per scenario, with bounded waits
//! - [`actions`]: storefront steps such as login or place order
//! - [`scenarios`]: the registered journeys
//! - [`scenario`]: setup, run and teardown around each journey
//! - [`reporter`]: console and JSON output
//!
//! # Example
//!
//! ```no_run
//! use hostelbite_e2e::{scenarios, OutputFormat, Reporter, ScenarioRunner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let runner = ScenarioRunner::from_process_env().with_parallelism(2);
//! let results = runner.run_suite("storefront", scenarios::ALL).await;
//!
//! Reporter::new(OutputFormat::Console).report(&results)?;
//! std::process::exit(results.exit_code());
//! # }
//! ```
//!
//! # Configuration
//!
//! Each key is looked up as an override (`--set baseUrl=...` or an overrides
//! file), then as an environment variable (`baseUrl` becomes `BASE_URL`),
//! then falls back to its default. Blank values are skipped.
//!
//! ```toml
//! baseUrl = "http://localhost:5173"
//! headless = true
//! waitTimeoutMs = 12000
//! slowMoMs = 400
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod locator;
pub mod reporter;
pub mod scenario;
pub mod scenarios;
pub mod session;
pub mod wait;

// Re-export main types for convenience
pub use actions::Storefront;
pub use config::{ConfigResolver, HarnessConfig, OverridesFile};
pub use error::{HarnessError, Result};
pub use locator::Locator;
pub use reporter::{OutputFormat, Reporter};
pub use scenario::{ScenarioDef, ScenarioOutcome, ScenarioRunner, SuiteResults};
pub use session::Session;
pub use wait::{Condition, WaitPolicy};

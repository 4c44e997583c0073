//! Configuration resolution for harness sessions
//!
//! Every setting is a named string resolved in a fixed order:
//!
//! 1. an explicit per-run override (`--set key=value` or an overrides file)
//! 2. an environment variable derived from the key (`baseUrl` → `BASE_URL`)
//! 3. the built-in default
//!
//! Blank values at any level are treated as absent. Resolution never fails.
//!
//! # Example
//!
//! ```no_run
//! use hostelbite_e2e::config::{ConfigResolver, HarnessConfig};
//!
//! let resolver = ConfigResolver::from_process_env()
//!     .with_override("baseUrl", "http://staging.local:5173");
//! let config = HarnessConfig::resolve(&resolver);
//! assert_eq!(config.base_url, "http://staging.local:5173");
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5173";
pub const DEFAULT_SEED_EMAIL: &str = "seed-shop@hostelbite.demo";
pub const DEFAULT_SEED_PASSWORD: &str = "SeedPass123!";

/// Browser window and viewport size (width, height)
pub const WINDOW_SIZE: (u32, u32) = (1440, 900);

/// Source of environment-style values
pub trait EnvSource {
    /// Look up a variable by its already-derived name
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Derive the environment variable name for a setting key
///
/// An underscore is inserted wherever a lowercase ASCII letter is followed
/// by an uppercase one, then the result is upper-cased:
/// `baseUrl` → `BASE_URL`, `seedPassword` → `SEED_PASSWORD`.
pub fn env_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.chars() {
        if prev_lower && c.is_ascii_uppercase() {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_uppercase());
    }
    out
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolves named settings from overrides, the environment, and defaults
#[derive(Debug, Clone)]
pub struct ConfigResolver<E = ProcessEnv> {
    overrides: BTreeMap<String, String>,
    env: E,
}

impl ConfigResolver<ProcessEnv> {
    /// Resolver backed by the real process environment
    pub fn from_process_env() -> Self {
        Self::with_env(ProcessEnv)
    }
}

impl Default for ConfigResolver<ProcessEnv> {
    fn default() -> Self {
        Self::from_process_env()
    }
}

impl<E: EnvSource> ConfigResolver<E> {
    /// Resolver backed by a custom environment source
    pub fn with_env(env: E) -> Self {
        Self {
            overrides: BTreeMap::new(),
            env,
        }
    }

    /// Add (or replace) a per-run override
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_override(key, value);
        self
    }

    /// Add (or replace) a per-run override in place
    pub fn set_override(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(key.into(), value.into());
    }

    /// Merge a batch of overrides; later entries win
    pub fn extend_overrides<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in entries {
            self.set_override(key, value);
        }
    }

    /// Current overrides, keyed by setting name
    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    /// Resolve `key`, falling back to `default`
    ///
    /// # Arguments
    ///
    /// * `key` - camelCase setting name, e.g. `baseUrl`
    /// * `default` - value used when neither an override nor the environment
    ///   provides a non-blank value
    pub fn resolve(&self, key: &str, default: &str) -> String {
        non_blank(self.overrides.get(key).cloned())
            .or_else(|| non_blank(self.env.var(&env_key(key))))
            .unwrap_or_else(|| default.to_string())
    }

    /// Resolve a boolean-like setting (`true`, `1`, `yes`, `on`)
    pub fn resolve_bool(&self, key: &str, default: bool) -> bool {
        parse_bool(&self.resolve(key, if default { "true" } else { "false" }))
    }

    /// Resolve a millisecond setting; unparseable values fall back to `default`
    pub fn resolve_millis(&self, key: &str, default: Duration) -> Duration {
        let raw = self.resolve(key, &default.as_millis().to_string());
        match raw.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!("Ignoring non-numeric {} = {:?}, using {:?}", key, raw, default);
                default
            }
        }
    }
}

/// Interpret a boolean-like string
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Flat TOML table of per-run overrides
///
/// ```toml
/// baseUrl = "http://staging.local:5173"
/// headless = true
/// waitTimeoutMs = 20000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverridesFile {
    pub values: BTreeMap<String, toml::Value>,
}

impl OverridesFile {
    /// Load overrides from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a flat table
    /// of scalar values
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read overrides file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse overrides from a TOML string
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let file: OverridesFile =
            toml::from_str(s).context("Failed to parse TOML overrides")?;
        for (key, value) in &file.values {
            if matches!(value, toml::Value::Table(_) | toml::Value::Array(_)) {
                anyhow::bail!("Override '{}' must be a scalar value", key);
            }
        }
        Ok(file)
    }

    /// Overrides as resolver entries
    pub fn entries(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

/// Settings for one browser session, resolved once at session start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Storefront origin without a trailing slash
    pub base_url: String,
    /// Email of the pre-provisioned seed user
    pub seed_email: String,
    /// Password of the pre-provisioned seed user
    pub seed_password: String,
    /// Run Chromium without a window
    pub headless: bool,
    /// Bounded explicit wait (default: 12s)
    pub wait_timeout: Duration,
    /// Polling period for explicit waits (default: 500ms)
    pub poll_interval: Duration,
    /// Grace period for element lookups (default: 1s)
    pub implicit_wait: Duration,
    /// Optional demo pacing between steps; zero disables it
    pub slow_mo: Duration,
    /// Leave the browser open after the scenario finishes
    pub keep_open: bool,
    /// Explicit Chrome executable
    pub chrome_path: Option<PathBuf>,
}

impl HarnessConfig {
    /// Resolve every harness setting from `resolver`
    pub fn resolve<E: EnvSource>(resolver: &ConfigResolver<E>) -> Self {
        let chrome_path = resolver.resolve("chromePath", "");
        Self {
            base_url: resolver
                .resolve("baseUrl", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            seed_email: resolver.resolve("seedEmail", DEFAULT_SEED_EMAIL),
            seed_password: resolver.resolve("seedPassword", DEFAULT_SEED_PASSWORD),
            headless: resolver.resolve_bool("headless", false),
            wait_timeout: resolver.resolve_millis("waitTimeoutMs", Duration::from_secs(12)),
            poll_interval: resolver.resolve_millis("pollIntervalMs", Duration::from_millis(500)),
            implicit_wait: resolver.resolve_millis("implicitWaitMs", Duration::from_secs(1)),
            slow_mo: resolver.resolve_millis("slowMoMs", Duration::ZERO),
            keep_open: resolver.resolve_bool("keepOpen", false),
            chrome_path: if chrome_path.is_empty() {
                None
            } else {
                Some(PathBuf::from(chrome_path))
            },
        }
    }

    /// Absolute URL for a storefront path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::resolve(&ConfigResolver::with_env(HashMap::new()))
    }
}

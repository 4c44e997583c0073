//! Browser session helpers
#![allow(dead_code)]

use hostelbite_e2e::config::ConfigResolver;
use hostelbite_e2e::{HarnessConfig, HarnessError, Session};
use std::collections::HashMap;

/// Check if browser tests should be skipped
pub fn should_skip() -> bool {
    std::env::var("SKIP_BROWSER_TESTS").is_ok()
}

/// Macro to skip test if browser tests are disabled
#[macro_export]
macro_rules! skip_if_no_chrome {
    () => {
        if browser::should_skip() {
            eprintln!("Skipping test: SKIP_BROWSER_TESTS is set");
            return;
        }
    };
}

/// Headless settings with short waits, isolated from the process environment
pub fn test_config(base_url: &str) -> HarnessConfig {
    let resolver = ConfigResolver::with_env(HashMap::new())
        .with_override("baseUrl", base_url)
        .with_override("headless", "true")
        .with_override("waitTimeoutMs", "4000")
        .with_override("pollIntervalMs", "100")
        .with_override("implicitWaitMs", "500");
    HarnessConfig::resolve(&resolver)
}

/// Start a session, or `None` when Chrome is not installed
pub async fn require_session(config: HarnessConfig) -> Option<Session> {
    match Session::start(config).await {
        Ok(session) => Some(session),
        Err(HarnessError::Launch(reason)) if reason.contains("Could not auto detect") => {
            eprintln!("Skipping: Chrome not installed ({})", reason);
            None
        }
        Err(e) => panic!("Unexpected browser error: {}", e),
    }
}

//! Browser session lifecycle and page primitives
//!
//! A [`Session`] owns exactly one Chromium process and one page. It is
//! created at scenario start and stopped at scenario end; sessions are never
//! shared between scenarios.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────────┐
//! │   Scenario   │ ──▶ │  Storefront  │ ──▶ │       Session        │
//! │  (journey)   │     │ (page steps) │     │ Browser + Page + CDP │
//! └──────────────┘     └──────────────┘     └──────────────────────┘
//! ```
//!
//! Every query runs through `Runtime.evaluate`, one command at a time. Waits
//! poll a [`Condition`] on the session's [`WaitPolicy`] instead of sleeping.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::{HarnessConfig, WINDOW_SIZE};
use crate::error::{HarnessError, Result};
use crate::locator::{js_string, Locator};
use crate::wait::{Condition, Probe, WaitPolicy};

/// Client-side storage keys the storefront uses for auth and cart state
pub const STORAGE_KEYS: [&str; 3] = ["hostelbite_token", "hostelbite_user", "hostelbite_cart"];

/// Snapshot of the first element matching a locator
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ElementState {
    /// Number of matching elements
    pub count: usize,
    /// First match is rendered with a non-empty box
    pub visible: bool,
    /// First match is not disabled
    pub enabled: bool,
    /// `value` of the first match, for form controls
    pub value: Option<String>,
    /// Trimmed rendered text of the first match
    pub text: Option<String>,
}

impl ElementState {
    /// Short human-readable description for timeout messages
    pub fn describe(&self) -> String {
        if self.count == 0 {
            return "no element matched".to_string();
        }
        format!(
            "{} matched, first is {}{}",
            self.count,
            if self.visible { "visible" } else { "hidden" },
            if self.enabled { "" } else { " and disabled" }
        )
    }
}

/// Treat a DevTools failure as "not yet": evaluation fails while a
/// navigation swaps the document. Every other error ends the wait.
fn page_not_ready<T>(err: HarnessError) -> Result<Probe<T>> {
    match err {
        HarnessError::Browser(e) => Ok(Probe::Pending(format!("page not ready: {}", e))),
        other => Err(other),
    }
}

/// A thrown page exception is a scripting bug, not a protocol failure
fn script_error(err: CdpError) -> HarnessError {
    match err {
        CdpError::JavascriptException(details) => HarnessError::Script(
            details
                .exception
                .as_ref()
                .and_then(|ex| ex.description.clone())
                .unwrap_or_else(|| details.text.clone()),
        ),
        other => HarnessError::Browser(other),
    }
}

#[derive(Deserialize)]
struct Wrapped<T> {
    v: T,
}

/// Find Chrome for Testing installed by Puppeteer
pub fn find_chrome_for_testing() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let puppeteer_cache = std::path::Path::new(&home).join(".cache/puppeteer/chrome");

    let entries = std::fs::read_dir(&puppeteer_cache).ok()?;
    let mut versions: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .collect();
    versions.sort_by_key(|v| std::cmp::Reverse(v.path()));

    const CANDIDATES: [&str; 3] = [
        "chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
        "chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
        "chrome-linux64/chrome",
    ];

    versions.iter().find_map(|version_dir| {
        CANDIDATES
            .iter()
            .map(|candidate| version_dir.path().join(candidate))
            .find(|path| path.exists())
    })
}

/// One browser instance plus its wait policy
pub struct Session {
    config: HarnessConfig,
    policy: WaitPolicy,
    browser: Option<Browser>,
    page: Option<Page>,
    handler: Option<tokio::task::JoinHandle<()>>,
    user_data_dir: PathBuf,
}

impl Session {
    /// Launch a browser for `config` and open a blank page
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Launch`] if Chromium cannot be found or
    /// started, or a browser error if the first page cannot be opened.
    #[instrument(skip(config), fields(base_url = %config.base_url, headless = config.headless))]
    pub async fn start(config: HarnessConfig) -> Result<Self> {
        let user_data_dir = std::env::temp_dir().join(format!(
            "hostelbite-e2e-{}-{}",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));

        let browser_config = Self::browser_config(&config, &user_data_dir)?;

        info!("Launching browser");
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| HarnessError::Launch(e.to_string()))?;

        // Spawn handler to process browser events
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        let mut session = Self {
            policy: WaitPolicy::from(&config),
            config,
            browser: Some(browser),
            page: None,
            handler: Some(handle),
            user_data_dir,
        };

        let opened = session.browser()?.new_page("about:blank").await;
        let page = match opened {
            Ok(page) => page,
            Err(e) => {
                let _ = session.stop().await;
                return Err(e.into());
            }
        };
        session.page = Some(page);

        info!("Browser launched successfully");
        Ok(session)
    }

    fn browser_config(config: &HarnessConfig, user_data_dir: &Path) -> Result<BrowserConfig> {
        let (width, height) = WINDOW_SIZE;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            })
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .user_data_dir(user_data_dir)
            .request_timeout(config.wait_timeout.max(Duration::from_secs(30)));

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = config.chrome_path.clone().or_else(find_chrome_for_testing) {
            debug!("Using Chrome executable: {}", path.display());
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(HarnessError::Launch)
    }

    /// Resolved settings for this session
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Wait policy installed at start
    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Whether the browser is still running
    pub fn is_active(&self) -> bool {
        self.browser.is_some()
    }

    fn browser(&self) -> Result<&Browser> {
        self.browser.as_ref().ok_or(HarnessError::SessionClosed)
    }

    /// Chromium profile directory; removed when the session ends
    pub fn user_data_dir(&self) -> &Path {
        &self.user_data_dir
    }

    /// The session's page
    pub fn page(&self) -> Result<&Page> {
        self.page.as_ref().ok_or(HarnessError::SessionClosed)
    }

    /// Close the browser if one is running; a no-op otherwise
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<()> {
        self.page = None;
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        info!("Closing browser");
        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("Failed waiting for browser exit: {}", e);
        }
        if let Some(handle) = self.handler.take() {
            handle.abort();
        }
        let _ = std::fs::remove_dir_all(&self.user_data_dir);

        closed.map(|_| ()).map_err(HarnessError::from)
    }

    /// Evaluate an expression and deserialize its JSON value
    ///
    /// `undefined` and `null` both arrive as JSON `null`.
    pub async fn eval<T: DeserializeOwned>(&self, expression: &str) -> Result<T> {
        let script = format!("JSON.stringify({{ v: ({}) ?? null }})", expression);
        let raw: String = self
            .page()?
            .evaluate(script)
            .await
            .map_err(script_error)?
            .into_value()?;
        let wrapped: Wrapped<T> = serde_json::from_str(&raw)?;
        Ok(wrapped.v)
    }

    /// Navigate to a storefront path (or absolute URL) and wait for the load
    #[instrument(skip(self))]
    pub async fn navigate(&self, path: &str) -> Result<()> {
        let url = self.config.url(path);
        debug!("Navigating to: {}", url);
        self.page()?
            .goto(url.as_str())
            .await
            .map_err(|e| HarnessError::Navigation {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// `location.href` of the page
    pub async fn current_url(&self) -> Result<String> {
        self.eval("window.location.href").await
    }

    /// Reset auth and cart state
    ///
    /// Cookies are cleared first, then the login page is loaded, and only
    /// then are the storage keys removed: `localStorage` for the origin is
    /// unreachable until a page of that origin has loaded.
    #[instrument(skip(self))]
    pub async fn clear_session(&self) -> Result<()> {
        info!("Clearing session state");
        self.page()?
            .execute(ClearBrowserCookiesParams::default())
            .await?;

        self.navigate("/auth/login").await?;

        let keys = serde_json::to_string(&STORAGE_KEYS)?;
        self.eval::<bool>(&format!(
            "(() => {{ for (const k of {}) window.localStorage.removeItem(k); return true; }})()",
            keys
        ))
        .await?;
        Ok(())
    }

    /// Value stored under `key` in the page origin's `localStorage`
    pub async fn local_storage_item(&self, key: &str) -> Result<Option<String>> {
        self.eval(&format!("window.localStorage.getItem({})", js_string(key)))
            .await
    }

    /// Number of cookies held by the browser, across all origins
    pub async fn cookie_count(&self) -> Result<usize> {
        Ok(self.browser()?.get_cookies().await?.len())
    }

    /// State of the first element matching `locator`
    pub async fn element_state(&self, locator: &Locator) -> Result<ElementState> {
        let script = format!(
            "(() => {{ \
                const els = {}; \
                const el = els[0]; \
                if (!el) return {{ count: 0, visible: false, enabled: false, value: null, text: null }}; \
                const style = window.getComputedStyle(el); \
                const rect = el.getBoundingClientRect(); \
                const visible = style.visibility !== 'hidden' && style.display !== 'none' \
                    && (rect.width > 0 || rect.height > 0); \
                return {{ \
                    count: els.length, \
                    visible, \
                    enabled: !el.disabled, \
                    value: ('value' in el) ? String(el.value) : null, \
                    text: (el.innerText || el.textContent || '').trim() \
                }}; \
            }})()",
            locator.to_js()
        );
        self.eval(&script).await
    }

    async fn check(&self, condition: &Condition) -> Result<Probe<()>> {
        let observed = match condition {
            Condition::UrlContains(fragment) => self.current_url().await.map(|url| {
                if url.contains(fragment.as_str()) {
                    Probe::Ready(())
                } else {
                    Probe::Pending(format!("current url: {}", url))
                }
            }),
            Condition::Visible(locator) => self.element_state(locator).await.map(|s| {
                if s.visible {
                    Probe::Ready(())
                } else {
                    Probe::Pending(s.describe())
                }
            }),
            Condition::Clickable(locator) => self.element_state(locator).await.map(|s| {
                if s.visible && s.enabled {
                    Probe::Ready(())
                } else {
                    Probe::Pending(s.describe())
                }
            }),
            Condition::ValueEmpty(locator) => self.element_state(locator).await.map(|s| {
                match (&s.value, s.count) {
                    (Some(value), n) if n > 0 && value.is_empty() => Probe::Ready(()),
                    (Some(value), _) => Probe::Pending(format!("value is {:?}", value)),
                    (None, _) => Probe::Pending(s.describe()),
                }
            }),
            Condition::CountAtLeast(locator, n) => self.element_state(locator).await.map(|s| {
                if s.count >= *n {
                    Probe::Ready(())
                } else {
                    Probe::Pending(format!("{} matched", s.count))
                }
            }),
        };

        observed.or_else(page_not_ready)
    }

    /// Block until `condition` holds or `timeout` elapses
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::WaitTimeout`] carrying the condition and the
    /// last observed state when the timeout elapses first.
    #[instrument(skip(self, condition), fields(condition = %condition))]
    pub async fn wait_until(&self, condition: &Condition, timeout: Duration) -> Result<()> {
        let description = condition.to_string();
        self.policy
            .poll(&description, timeout, || async move { self.check(condition).await })
            .await
    }

    /// [`Session::wait_until`] with the session's default timeout
    pub async fn wait_for(&self, condition: &Condition) -> Result<()> {
        self.wait_until(condition, self.policy.timeout).await
    }

    /// Wait until `locator` is visible
    pub async fn wait_visible(&self, locator: &Locator) -> Result<()> {
        self.wait_for(&Condition::Visible(locator.clone())).await
    }

    /// Wait until `locator` is visible and enabled
    pub async fn wait_clickable(&self, locator: &Locator) -> Result<()> {
        self.wait_for(&Condition::Clickable(locator.clone())).await
    }

    /// Look up `locator`, allowing the implicit grace period for it to appear
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ElementNotFound`] when nothing matches within
    /// the grace period.
    pub async fn find(&self, locator: &Locator) -> Result<ElementState> {
        let description = format!("{} to exist", locator);
        let found = self
            .policy
            .poll(&description, self.policy.implicit_wait, || async move {
                let state = match self.element_state(locator).await {
                    Ok(state) => state,
                    Err(e) => return page_not_ready(e),
                };
                if state.count > 0 {
                    Ok(Probe::Ready(state))
                } else {
                    Ok(Probe::Pending(state.describe()))
                }
            })
            .await;

        match found {
            Err(HarnessError::WaitTimeout { elapsed, .. }) => Err(HarnessError::ElementNotFound {
                locator: locator.to_string(),
                elapsed,
            }),
            other => other,
        }
    }

    /// Whether `locator` matches anything within the implicit grace period
    pub async fn exists(&self, locator: &Locator) -> Result<bool> {
        match self.find(locator).await {
            Ok(_) => Ok(true),
            Err(HarnessError::ElementNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Number of elements matching `locator` right now
    pub async fn count(&self, locator: &Locator) -> Result<usize> {
        Ok(self.element_state(locator).await?.count)
    }

    /// Run `body` against the first match of `locator` as `el`
    async fn with_element(&self, locator: &Locator, body: &str) -> Result<()> {
        let script = format!(
            "(() => {{ const el = ({})[0]; if (!el) return false; {} return true; }})()",
            locator.to_js(),
            body
        );
        if self.eval::<bool>(&script).await? {
            Ok(())
        } else {
            Err(HarnessError::ElementNotFound {
                locator: locator.to_string(),
                elapsed: Duration::ZERO,
            })
        }
    }

    /// Wait until `locator` is clickable, then click it
    #[instrument(skip(self, locator), fields(locator = %locator))]
    pub async fn click(&self, locator: &Locator) -> Result<()> {
        self.wait_clickable(locator).await?;
        if !self.config.slow_mo.is_zero() {
            self.scroll_into_view(locator).await?;
            self.highlight(locator).await?;
            self.slow_down().await;
        }
        debug!("Clicking: {}", locator);
        self.with_element(locator, "el.scrollIntoView({ block: 'center' }); el.click();")
            .await
    }

    /// Type `text` into the element with real key events
    ///
    /// The locator must be CSS-addressable (id or CSS selector).
    #[instrument(skip(self, locator, text), fields(locator = %locator))]
    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        self.find(locator).await?;
        let selector = locator.css_selector().ok_or_else(|| {
            HarnessError::Script(format!("cannot type into non-CSS locator {}", locator))
        })?;

        debug!("Typing into: {}", locator);
        let element = self.page()?.find_element(selector).await?;
        element.click().await?;

        if self.config.slow_mo.is_zero() {
            element.type_str(text).await?;
        } else {
            let per_key = self.config.slow_mo / 5;
            for c in text.chars() {
                element.type_str(c.to_string()).await?;
                tokio::time::sleep(per_key).await;
            }
        }
        Ok(())
    }

    /// Empty an input so the page's change handlers see the new value
    pub async fn clear_input(&self, locator: &Locator) -> Result<()> {
        self.find(locator).await?;
        self.with_element(
            locator,
            "const proto = el instanceof HTMLTextAreaElement \
                ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, ''); \
             el.dispatchEvent(new Event('input', { bubbles: true }));",
        )
        .await
    }

    /// Current `value` of a form control
    pub async fn input_value(&self, locator: &Locator) -> Result<String> {
        Ok(self.find(locator).await?.value.unwrap_or_default())
    }

    /// Scroll the first match to the middle of the viewport
    pub async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.with_element(
            locator,
            "el.scrollIntoView({ behavior: 'smooth', block: 'center' });",
        )
        .await
    }

    /// Outline the first match so it stands out in a headed run
    pub async fn highlight(&self, locator: &Locator) -> Result<()> {
        self.with_element(
            locator,
            "el.style.outline = '3px solid #f59e0b'; el.style.outlineOffset = '2px';",
        )
        .await
    }

    /// Slow-motion pause between steps; does nothing unless `slowMoMs` is set
    pub async fn slow_down(&self) {
        if !self.config.slow_mo.is_zero() {
            tokio::time::sleep(self.config.slow_mo).await;
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(handle) = self.handler.take() {
            handle.abort();
        }
        // Kill the browser before removing the profile it writes to
        if let Some(browser) = self.browser.take() {
            debug!("Session dropped without stop(); browser process will be killed");
            drop(browser);
        }
        let _ = std::fs::remove_dir_all(&self.user_data_dir);
    }
}

//! Element locators
//!
//! Locators render to a JavaScript expression that yields every matching
//! element in document order. All page queries go through `Runtime.evaluate`
//! so CSS and XPath lookups share one code path.

use std::fmt;

/// How to find an element on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Element by `id` attribute
    Id(String),
    /// CSS selector
    Css(String),
    /// Raw XPath expression
    XPath(String),
    /// `<button>` whose whitespace-normalised text equals the label
    Button(String),
    /// `<a>` whose whitespace-normalised text equals the label
    Link(String),
    /// Heading of the given level whose text contains the label
    Heading { level: u8, text: String },
    /// Heading of the given level whose whole text equals the title
    Title { level: u8, text: String },
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn button(label: impl Into<String>) -> Self {
        Locator::Button(label.into())
    }

    pub fn link(label: impl Into<String>) -> Self {
        Locator::Link(label.into())
    }

    pub fn h1(text: impl Into<String>) -> Self {
        Locator::Heading {
            level: 1,
            text: text.into(),
        }
    }

    pub fn h3(text: impl Into<String>) -> Self {
        Locator::Heading {
            level: 3,
            text: text.into(),
        }
    }

    /// Product card title, matched exactly
    pub fn h3_titled(text: impl Into<String>) -> Self {
        Locator::Title {
            level: 3,
            text: text.into(),
        }
    }

    /// CSS selector for this locator, when one exists
    pub fn css_selector(&self) -> Option<String> {
        match self {
            Locator::Id(id) => Some(format!("[id={}]", css_string(id))),
            Locator::Css(selector) => Some(selector.clone()),
            _ => None,
        }
    }

    /// XPath expression for this locator, when it is not CSS-addressable
    pub fn xpath_expr(&self) -> Option<String> {
        match self {
            Locator::XPath(expr) => Some(expr.clone()),
            Locator::Button(label) => Some(format!(
                "//button[normalize-space()={}]",
                xpath_literal(label)
            )),
            Locator::Link(label) => Some(format!("//a[normalize-space()={}]", xpath_literal(label))),
            Locator::Heading { level, text } => Some(format!(
                "//h{}[contains(normalize-space(), {})]",
                level,
                xpath_literal(text)
            )),
            Locator::Title { level, text } => Some(format!(
                "//h{}[normalize-space()={}]",
                level,
                xpath_literal(text)
            )),
            Locator::Id(_) | Locator::Css(_) => None,
        }
    }

    /// JavaScript expression evaluating to an array of matching elements
    pub fn to_js(&self) -> String {
        if let Some(selector) = self.css_selector() {
            return format!(
                "Array.from(document.querySelectorAll({}))",
                js_string(&selector)
            );
        }

        let expr = self.xpath_expr().unwrap_or_default();
        format!(
            "(() => {{ \
                const r = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                const out = []; \
                for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
                return out; \
            }})()",
            js_string(&expr)
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "#{}", id),
            Locator::Css(selector) => write!(f, "css {}", selector),
            Locator::XPath(expr) => write!(f, "xpath {}", expr),
            Locator::Button(label) => write!(f, "button '{}'", label),
            Locator::Link(label) => write!(f, "link '{}'", label),
            Locator::Heading { level, text } => write!(f, "h{} containing '{}'", level, text),
            Locator::Title { level, text } => write!(f, "h{} '{}'", level, text),
        }
    }
}

/// Quote a string as a JavaScript string literal
pub(crate) fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn css_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Quote a string as an XPath 1.0 literal
///
/// XPath has no escape sequences, so a value containing both quote kinds
/// is assembled with `concat()`.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{}'", s);
    }
    if !s.contains('"') {
        return format!("\"{}\"", s);
    }

    let parts: Vec<String> = s
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

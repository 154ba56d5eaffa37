//! Canned analyses used when no live answer can be obtained.
//!
//! [`FallbackResponder`] holds an ordered table of [`DomainRule`]s. The
//! first rule whose pattern occurs in the request's domain is rendered; when
//! none match, [`GENERIC_TEMPLATE`] is. Matching is a case-sensitive
//! substring test, so rule order is the only tie-breaker between
//! overlapping patterns.
//!
//! Templates may contain `{url}` and `{domain}` placeholders. Any other
//! brace is copied through verbatim.
//!
//! ```rust
//! use tabmonitor::fallback::FallbackResponder;
//!
//! let responder = FallbackResponder::default();
//! let text = responder.respond("www.nvidia.com", "https://www.nvidia.com/page");
//! assert!(text.contains("NVDA"));
//! ```

use serde::{Deserialize, Serialize};

/// A single `pattern → template` row of the fallback table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    /// Substring searched for in the domain.
    pub pattern: String,
    /// Response body, with optional `{url}` / `{domain}` placeholders.
    pub template: String,
}

impl DomainRule {
    pub fn new(pattern: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            template: template.into(),
        }
    }

    /// Whether this rule applies to `domain`.
    pub fn matches(&self, domain: &str) -> bool {
        domain.contains(self.pattern.as_str())
    }
}

/// Template rendered when no rule matches.
pub const GENERIC_TEMPLATE: &str = "## Website Analysis\n\n\
After analyzing the URL {url}, I could not determine if it's associated with a publicly traded company.\n\n\
### Technical Overview\n\
- This appears to be a general website ({domain})\n\
- No stock ticker symbol identified\n\
- The content seems to be technical/informational in nature\n\n\
### Resources\n\
For stock information, please check financial databases like Yahoo Finance or the SEC EDGAR database.";

const NVIDIA_TEMPLATE: &str = "## Company Analysis\n\n\
The website {url} is related to NVIDIA Corporation, which is publicly traded.\n\n\
Stock Ticker Symbol: NVDA\n\
Exchange: NASDAQ\n\n\
### Recent SEC Filings\n\
- 10-K: Filed on February 22, 2023\n\
- 10-Q: Filed on November 22, 2022\n\
- 8-K: Various filings throughout the year\n\
- Forms 3-4-5: Insider transactions\n\
- Schedule 13D: Ownership changes\n\n\
### Financial Information\n\
- Revenue: Significant growth in gaming and datacenter segments\n\
- Net Income: Substantial increases\n\
- Market Capitalization: One of the largest tech companies";

const APPLE_TEMPLATE: &str = "## Company Analysis\n\n\
The website {url} is related to Apple Inc., which is publicly traded.\n\n\
Stock Ticker Symbol: AAPL\n\
Exchange: NASDAQ\n\n\
### Recent SEC Filings\n\
- 10-K: Filed on October 28, 2022\n\
- 10-Q: Filed on February 3, 2023\n\
- 8-K: Various filings throughout the year\n\
- Forms 3-4-5: Insider transactions\n\
- Schedule 13D: Ownership changes\n\n\
### Financial Information\n\
- Revenue: Strong iPhone and Services revenue\n\
- Net Income: Consistent profitability\n\
- Market Capitalization: Among the world's most valuable companies";

const MICROSOFT_TEMPLATE: &str = "## Company Analysis\n\n\
The website {url} is related to Microsoft Corporation, which is publicly traded.\n\n\
Stock Ticker Symbol: MSFT\n\
Exchange: NASDAQ\n\n\
### Recent SEC Filings\n\
- 10-K: Filed on July 28, 2022\n\
- 10-Q: Filed on January 24, 2023\n\
- 8-K: Various filings throughout the year\n\
- Forms 3-4-5: Insider transactions\n\
- Schedule 13D: Ownership changes\n\n\
### Financial Information\n\
- Revenue: Strong cloud growth via Azure\n\
- Net Income: Significant and growing\n\
- Market Capitalization: Among the world's most valuable companies";

const PYTHON_TEMPLATE: &str = "## Technical Resource Analysis\n\n\
The website {url} is the home of the Python programming language, maintained by the Python Software Foundation.\n\n\
Stock Ticker Symbol: None (non-profit organization)\n\n\
### Resource Overview\n\
- Official documentation, tutorials and language reference\n\
- Downloads for CPython releases\n\
- Python Enhancement Proposals (PEPs)\n\
- Community, events and job board\n\n\
### Notes\n\
The Python Software Foundation is not publicly traded, so no SEC filings are available.";

/// Built-in rule table, in evaluation order.
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("nvidia.com", NVIDIA_TEMPLATE),
    ("apple.com", APPLE_TEMPLATE),
    ("microsoft.com", MICROSOFT_TEMPLATE),
    ("python.org", PYTHON_TEMPLATE),
];

/// Built-in fallback rules, in evaluation order.
pub fn builtin_rules() -> Vec<DomainRule> {
    BUILTIN_RULES
        .iter()
        .map(|(pattern, template)| DomainRule::new(*pattern, *template))
        .collect()
}

/// Deterministic first-match responder over an ordered rule table.
#[derive(Debug, Clone)]
pub struct FallbackResponder {
    rules: Vec<DomainRule>,
}

impl FallbackResponder {
    /// Responder over exactly `rules`, evaluated in order.
    pub fn new(rules: Vec<DomainRule>) -> Self {
        Self { rules }
    }

    /// Built-in table preceded by `extra` (e.g. rules from the config file).
    pub fn with_rules_prepended(extra: Vec<DomainRule>) -> Self {
        let mut rules = extra;
        rules.extend(builtin_rules());
        Self { rules }
    }

    /// The rule table, in evaluation order.
    pub fn rules(&self) -> &[DomainRule] {
        &self.rules
    }

    /// First rule matching `domain`, if any.
    pub fn resolve(&self, domain: &str) -> Option<&DomainRule> {
        self.rules.iter().find(|rule| rule.matches(domain))
    }

    /// Produce the canned analysis for `domain`.
    ///
    /// Always returns non-empty text: a matching rule that renders to blank
    /// text is replaced by the generic template.
    pub fn respond(&self, domain: &str, original_url: &str) -> String {
        if let Some(rule) = self.resolve(domain) {
            let text = render(&rule.template, domain, original_url);
            if !text.trim().is_empty() {
                return text;
            }
        }
        render(GENERIC_TEMPLATE, domain, original_url)
    }
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new(builtin_rules())
    }
}

/// Substitute `{url}` and `{domain}` in a single left-to-right pass, so
/// placeholder-like text inside the substituted values is never expanded.
fn render(template: &str, domain: &str, url: &str) -> String {
    let mut out = String::with_capacity(template.len() + url.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{url}") {
            out.push_str(url);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{domain}") {
            out.push_str(domain);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

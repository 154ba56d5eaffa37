//! tabmonitor - local analysis relay for the tab monitor browser extension
//!
//! The extension posts page URLs and screenshots to a local HTTP server;
//! this crate forwards them to a chat-completion provider and returns the
//! generated text, so API credentials never live in the browser.
//!
//! URL analyses are cached permanently in a JSON file keyed by normalized
//! URL. When the provider is missing or fails, a deterministic canned
//! analysis chosen by domain is returned (and cached) instead: callers
//! always get text back.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tabmonitor::{AnalysisCache, Analyzer, GroqClient};
//!
//! #[tokio::main]
//! async fn main() -> tabmonitor::Result<()> {
//!     let analyzer = Analyzer::builder()
//!         .provider(Arc::new(GroqClient::new("gsk-your-key")))
//!         .cache(AnalysisCache::load("url_analysis_cache.json").await)
//!         .build()?;
//!
//!     let result = analyzer
//!         .analyze_url(Some("https://www.nvidia.com/en-us/about-nvidia/?ref=nav"))
//!         .await;
//!     println!("{}", result.analysis);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod cache;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerConfig};
pub use cache::{AnalysisCache, CacheLookup};
pub use error::{RelayError, Result};
pub use fallback::{DomainRule, FallbackResponder};
pub use normalize::{NormalizedUrl, normalize};
pub use providers::{ChatProvider, GroqClient};
pub use version::{BuildInfo, PKG_VERSION, version_string};

pub use types::{
    AnalysisResult, ChatOptions, ChatResponse, ContentPart, FinishReason, ImageUrl, Message,
    MessageContent, Role, Usage,
};

//! Builder for configuring analyzer instances

use std::sync::Arc;
use std::time::Duration;

use super::Analyzer;
use crate::cache::AnalysisCache;
use crate::fallback::FallbackResponder;
use crate::providers::ChatProvider;
use crate::{RelayError, Result};

/// Default model for URL analysis.
pub const DEFAULT_URL_MODEL: &str = "llama-3.3-70b-versatile";

/// Default vision-capable model for screenshots.
pub const DEFAULT_VISION_MODEL: &str = "llama-3.2-11b-vision-preview";

/// Tunables for provider calls and the screenshot fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Model used for URL analysis.
    pub url_model: String,
    /// Model used for screenshot analysis.
    pub vision_model: String,
    /// Sampling temperature (default: 0.7).
    pub temperature: f32,
    /// Completion token limit (default: 1000).
    pub max_tokens: usize,
    /// Nucleus sampling cutoff; provider default when unset.
    pub top_p: Option<f32>,
    /// Stop sequences; empty means none.
    pub stop: Vec<String>,
    /// Pause before answering a screenshot with the fixed description
    /// (default: 3 s).
    pub screenshot_fallback_delay: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            url_model: DEFAULT_URL_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            top_p: None,
            stop: Vec::new(),
            screenshot_fallback_delay: Duration::from_secs(3),
        }
    }
}

/// Builder for [`Analyzer`].
///
/// ```rust
/// # use std::time::Duration;
/// use tabmonitor::{Analyzer, AnalysisCache};
///
/// let analyzer = Analyzer::builder()
///     .cache(AnalysisCache::in_memory())
///     .screenshot_fallback_delay(Duration::ZERO)
///     .build()
///     .unwrap();
/// assert!(analyzer.provider_name().is_none());
/// ```
pub struct AnalyzerBuilder {
    provider: Option<Arc<dyn ChatProvider>>,
    cache: Option<AnalysisCache>,
    fallback: FallbackResponder,
    config: AnalyzerConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            cache: None,
            fallback: FallbackResponder::default(),
            config: AnalyzerConfig::default(),
        }
    }

    /// Use `provider` for live analyses. Without one, every answer comes
    /// from the fallback table.
    pub fn provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Cache to consult and write through (default: in-memory only).
    pub fn cache(mut self, cache: AnalysisCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the fallback rule table.
    pub fn fallback(mut self, fallback: FallbackResponder) -> Self {
        self.fallback = fallback;
        self
    }

    /// Replace all tunables at once.
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Model used for URL analysis.
    pub fn url_model(mut self, model: impl Into<String>) -> Self {
        self.config.url_model = model.into();
        self
    }

    /// Model used for screenshot analysis.
    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.config.vision_model = model.into();
        self
    }

    /// Stop sequences sent with every provider call.
    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.config.stop = stop;
        self
    }

    /// Pause before the fixed screenshot description.
    pub fn screenshot_fallback_delay(mut self, delay: Duration) -> Self {
        self.config.screenshot_fallback_delay = delay;
        self
    }

    pub fn build(self) -> Result<Analyzer> {
        if self.provider.is_some() {
            if self.config.url_model.trim().is_empty() {
                return Err(RelayError::Configuration(
                    "URL analysis model must not be empty".to_string(),
                ));
            }
            if self.config.vision_model.trim().is_empty() {
                return Err(RelayError::Configuration(
                    "vision model must not be empty".to_string(),
                ));
            }
        }

        Ok(Analyzer::new(
            self.provider,
            self.cache.unwrap_or_else(AnalysisCache::in_memory),
            self.fallback,
            self.config,
        ))
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

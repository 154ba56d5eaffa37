//! Analysis orchestration.
//!
//! [`Analyzer`] answers the two relay endpoints:
//!
//! - [`Analyzer::analyze_url`]: normalize, consult the [`AnalysisCache`],
//!   ask the provider on a miss, substitute a [`FallbackResponder`] answer
//!   when the provider is absent or fails, and write the result through to
//!   the cache.
//! - [`Analyzer::analyze_screenshot`]: ask the provider's vision model to
//!   describe an image, or return a fixed description after a short delay.
//!
//! Both always succeed with *some* text. The only `success: false` result is
//! a request missing its required field.

mod builder;
pub mod prompt;
pub mod screenshot;

pub use builder::{AnalyzerBuilder, AnalyzerConfig, DEFAULT_URL_MODEL, DEFAULT_VISION_MODEL};

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::cache::AnalysisCache;
use crate::fallback::FallbackResponder;
use crate::normalize::{NormalizedUrl, normalize_or_raw};
use crate::providers::ChatProvider;
use crate::types::{AnalysisResult, ChatOptions, Message};
use crate::{RelayError, Result, telemetry};

const STOCK_RESEARCH: &str = "stock_research";
const ANALYZE_SCREENSHOT: &str = "analyze_screenshot";

/// Cache-first, always-answering analysis service.
pub struct Analyzer {
    provider: Option<Arc<dyn ChatProvider>>,
    cache: AnalysisCache,
    fallback: FallbackResponder,
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create a new builder.
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub(crate) fn new(
        provider: Option<Arc<dyn ChatProvider>>,
        cache: AnalysisCache,
        fallback: FallbackResponder,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            fallback,
            config,
        }
    }

    /// The URL analysis cache.
    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Name of the configured provider, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Stock-research analysis of a page URL.
    ///
    /// A cached answer is returned without contacting the provider. On a
    /// miss the provider is asked once; when it is absent or fails, the
    /// fallback table answers instead. Either way the answer is cached and
    /// written to disk before returning.
    pub async fn analyze_url(&self, url: Option<&str>) -> AnalysisResult {
        let Some(raw) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            metrics::counter!(telemetry::REQUESTS_TOTAL,
                "endpoint" => STOCK_RESEARCH, "status" => "error")
            .increment(1);
            return AnalysisResult::failed(RelayError::InputMissing("url").to_string());
        };

        let normalized = normalize_or_raw(raw);
        let lookup = self
            .cache
            .get_or_insert_with(
                normalized.cache_key.clone(),
                self.fresh_url_analysis(&normalized),
            )
            .await;

        if lookup.fresh {
            info!(key = %normalized.cache_key, "analyzed URL");
        } else {
            debug!(key = %normalized.cache_key, "serving cached analysis");
        }

        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "endpoint" => STOCK_RESEARCH, "status" => "ok")
        .increment(1);
        AnalysisResult::ok(lookup.value)
    }

    /// Description of a browser screenshot.
    ///
    /// `screenshot` may be raw base64 or a `data:` URL. Invalid image data
    /// is treated as absent. Without a usable image or provider, waits the
    /// configured fallback delay and returns a fixed description.
    pub async fn analyze_screenshot(&self, screenshot: Option<&str>) -> AnalysisResult {
        let Some(raw) = screenshot else {
            metrics::counter!(telemetry::REQUESTS_TOTAL,
                "endpoint" => ANALYZE_SCREENSHOT, "status" => "error")
            .increment(1);
            return AnalysisResult::failed(RelayError::InputMissing("screenshot").to_string());
        };

        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "endpoint" => ANALYZE_SCREENSHOT, "status" => "ok")
        .increment(1);

        debug!(bytes = raw.len(), "received screenshot");
        let image = screenshot::extract_base64(raw);

        if let (Some(provider), Some(image)) = (self.provider.as_deref(), image) {
            let options = self.options_for(&self.config.vision_model);
            let messages = prompt::screenshot_messages(&image);
            match self.call_provider(provider, &messages, &options).await {
                Ok(text) => return AnalysisResult::ok(text),
                Err(e) => warn!(provider = provider.name(), error = %e, "screenshot analysis failed"),
            }
        }

        tokio::time::sleep(self.config.screenshot_fallback_delay).await;
        metrics::counter!(telemetry::FALLBACK_RESPONSES_TOTAL, "endpoint" => ANALYZE_SCREENSHOT)
            .increment(1);
        AnalysisResult::ok(prompt::SCREENSHOT_FALLBACK_TEXT)
    }

    /// Compute a new analysis for a cache miss: live if possible, canned
    /// otherwise.
    async fn fresh_url_analysis(&self, url: &NormalizedUrl) -> String {
        match self.live_url_analysis(&url.cache_key).await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    RelayError::NoProvider => {
                        debug!(key = %url.cache_key, "no provider configured, using fallback")
                    }
                    e if e.is_provider_error() => {
                        warn!(key = %url.cache_key, error = %e, "provider failed, using fallback")
                    }
                    e => error!(key = %url.cache_key, error = %e, "URL analysis failed, using fallback"),
                }
                metrics::counter!(telemetry::FALLBACK_RESPONSES_TOTAL, "endpoint" => STOCK_RESEARCH)
                    .increment(1);
                self.fallback.respond(&url.domain, &url.cache_key)
            }
        }
    }

    async fn live_url_analysis(&self, clean_url: &str) -> Result<String> {
        let provider = self.provider.as_deref().ok_or(RelayError::NoProvider)?;
        let options = self.options_for(&self.config.url_model);
        let messages = prompt::url_messages(clean_url);
        self.call_provider(provider, &messages, &options).await
    }

    /// Single provider attempt with metrics; empty text counts as failure.
    async fn call_provider(
        &self,
        provider: &dyn ChatProvider,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<String> {
        let start = Instant::now();
        let result = provider
            .chat(messages, options)
            .await
            .and_then(|response| {
                if response.content.trim().is_empty() {
                    Err(RelayError::EmptyResponse)
                } else {
                    Ok(response.content)
                }
            });

        let name = provider.name().to_string();
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::PROVIDER_REQUESTS_TOTAL,
            "provider" => name.clone(), "status" => status)
        .increment(1);
        metrics::histogram!(telemetry::PROVIDER_REQUEST_DURATION_SECONDS, "provider" => name)
            .record(start.elapsed().as_secs_f64());

        result
    }

    fn options_for(&self, model: &str) -> ChatOptions {
        let mut options = ChatOptions::default()
            .model(model)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens);
        if let Some(top_p) = self.config.top_p {
            options = options.top_p(top_p);
        }
        if !self.config.stop.is_empty() {
            options = options.stop(self.config.stop.clone());
        }
        options
    }
}

//! Telemetry metric name constants.
//!
//! Centralised metric names for tabmonitor operations. The daemon does not
//! install a `metrics` recorder by default; without one, all metric calls
//! are no-ops. Embedders may install their own (prometheus, statsd, ...).
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `tabmonitor_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `endpoint`: `"stock_research"` or `"analyze_screenshot"`
//! - `provider`: provider name (e.g. "groq")
//! - `status`: "ok" or "error"

/// Total analysis requests handled by the analyzer.
///
/// Labels: `endpoint`, `status` ("ok" | "error"). `error` is only recorded
/// for requests missing their required field.
pub const REQUESTS_TOTAL: &str = "tabmonitor_requests_total";

/// Total URL analyses answered from the cache.
pub const CACHE_HITS_TOTAL: &str = "tabmonitor_cache_hits_total";

/// Total URL analyses that missed the cache.
pub const CACHE_MISSES_TOTAL: &str = "tabmonitor_cache_misses_total";

/// Total failed attempts to write the cache file.
pub const CACHE_PERSIST_FAILURES_TOTAL: &str = "tabmonitor_cache_persist_failures_total";

/// Total calls made to the analysis provider.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const PROVIDER_REQUESTS_TOTAL: &str = "tabmonitor_provider_requests_total";

/// Provider call duration in seconds.
///
/// Labels: `provider`.
pub const PROVIDER_REQUEST_DURATION_SECONDS: &str = "tabmonitor_provider_request_duration_seconds";

/// Total canned responses served in place of a live analysis.
///
/// Labels: `endpoint`.
pub const FALLBACK_RESPONSES_TOTAL: &str = "tabmonitor_fallback_responses_total";

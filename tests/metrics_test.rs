//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

use tabmonitor::telemetry;
use tabmonitor::{
    AnalysisResult, Analyzer, ChatOptions, ChatProvider, ChatResponse, Message, RelayError,
    Result,
};

// ============================================================================
// Mock providers
// ============================================================================

struct MockProvider;

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, _messages: &[Message], _options: &ChatOptions) -> Result<ChatResponse> {
        Ok(ChatResponse {
            content: "live".to_string(),
            ..Default::default()
        })
    }
}

struct FailingProvider;

#[async_trait]
impl ChatProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn chat(&self, _messages: &[Message], _options: &ChatOptions) -> Result<ChatResponse> {
        Err(RelayError::AuthenticationFailed)
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values matching a name and one label pair.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
fn recorded<F, T>(work: F) -> (T, SnapshotVec)
where
    F: Future<Output = T>,
{
    let recorder = DebuggingRecorder::new();
    let snapshotter: Snapshotter = recorder.snapshotter();

    let output = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(work))
    });

    (output, snapshotter.snapshot().into_vec())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_miss_then_hit_is_counted() {
    let analyzer = Analyzer::builder()
        .provider(Arc::new(MockProvider))
        .build()
        .unwrap();

    let (results, snapshot) = recorded(async {
        let first = analyzer.analyze_url(Some("https://example.com/a")).await;
        let second = analyzer.analyze_url(Some("https://example.com/a?b=c")).await;
        vec![first, second]
    });
    assert!(results.iter().all(|r| r.success));

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "ok"),
        2
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::PROVIDER_REQUESTS_TOTAL, "status", "ok"),
        1
    );
    assert!(
        has_histogram(&snapshot, telemetry::PROVIDER_REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
    assert_eq!(counter_total(&snapshot, telemetry::FALLBACK_RESPONSES_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn provider_failure_records_error_and_fallback() {
    let analyzer = Analyzer::builder()
        .provider(Arc::new(FailingProvider))
        .build()
        .unwrap();

    let (result, snapshot) = recorded(analyzer.analyze_url(Some("https://www.nvidia.com/")));
    assert!(result.success);

    assert_eq!(
        counter_with_label(&snapshot, telemetry::PROVIDER_REQUESTS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(
        counter_with_label(
            &snapshot,
            telemetry::FALLBACK_RESPONSES_TOTAL,
            "endpoint",
            "stock_research"
        ),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn missing_field_records_error_request() {
    let analyzer = Analyzer::builder().build().unwrap();

    let (result, snapshot): (AnalysisResult, _) = recorded(analyzer.analyze_url(None));
    assert!(!result.success);

    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn screenshot_fallback_is_counted() {
    let analyzer = Analyzer::builder()
        .screenshot_fallback_delay(std::time::Duration::ZERO)
        .build()
        .unwrap();

    let (result, snapshot) = recorded(analyzer.analyze_screenshot(Some("QUJD")));
    assert!(result.success);

    assert_eq!(
        counter_with_label(
            &snapshot,
            telemetry::FALLBACK_RESPONSES_TOTAL,
            "endpoint",
            "analyze_screenshot"
        ),
        1
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let analyzer = Analyzer::builder().build().unwrap();
    let result = analyzer.analyze_url(Some("https://python.org/")).await;
    assert!(result.success);
}

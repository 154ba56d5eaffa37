//! HTTP routes for the browser extension.
//!
//! | Method | Path                  | Body                       |
//! |--------|-----------------------|----------------------------|
//! | POST   | `/stock-research`     | `{"url": string}`          |
//! | POST   | `/analyze-screenshot` | `{"screenshot": string}`   |
//! | GET    | `/health`             |                            |
//!
//! Analysis routes answer `{"success": bool, "analysis": string}`. A body
//! that is not a JSON object gets HTTP 400 in the same shape. Every
//! response carries permissive CORS headers so the extension can call the
//! relay directly.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::Analyzer;
use crate::types::AnalysisResult;
use crate::version::BuildInfo;

/// Largest accepted request body. Full-page screenshots arrive as base64
/// data URLs and routinely exceed axum's 2 MB default.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Build the relay router around a shared analyzer.
pub fn router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route(
            "/stock-research",
            post(stock_research).options(preflight),
        )
        .route(
            "/analyze-screenshot",
            post(analyze_screenshot).options(preflight),
        )
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::map_response(with_cors_headers))
        .with_state(analyzer)
}

async fn stock_research(State(analyzer): State<Arc<Analyzer>>, body: Bytes) -> Response {
    let request = match parse_object(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let url = request.get("url").and_then(Value::as_str);
    let result = analyzer.analyze_url(url).await;
    (StatusCode::OK, Json(result)).into_response()
}

async fn analyze_screenshot(State(analyzer): State<Arc<Analyzer>>, body: Bytes) -> Response {
    let request = match parse_object(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let screenshot = request.get("screenshot").and_then(Value::as_str);
    let result = analyzer.analyze_screenshot(screenshot).await;
    (StatusCode::OK, Json(result)).into_response()
}

#[derive(Serialize)]
struct HealthReport<'a> {
    status: &'static str,
    version: String,
    build: BuildInfo,
    provider: Option<&'a str>,
    cached_entries: usize,
}

async fn health(State(analyzer): State<Arc<Analyzer>>) -> Response {
    let build = BuildInfo::current();
    let report = HealthReport {
        status: "ok",
        version: build.label(),
        build,
        provider: analyzer.provider_name(),
        cached_entries: analyzer.cache().len(),
    };
    (StatusCode::OK, Json(report)).into_response()
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}

/// Parse a request body as a JSON object, or build the 400 response.
fn parse_object(body: &[u8]) -> Result<Map<String, Value>, Response> {
    let invalid = |message: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(AnalysisResult::failed(format!("Invalid JSON request: {message}"))),
        )
            .into_response()
    };

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(invalid("expected a JSON object".to_string())),
        Err(e) => Err(invalid(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_accepts_objects() {
        let map = parse_object(br#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(map["url"], "https://example.com");
    }

    #[test]
    fn parse_object_rejects_non_objects() {
        let response = parse_object(b"[1, 2]").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_object_rejects_invalid_json() {
        let response = parse_object(b"{not json").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

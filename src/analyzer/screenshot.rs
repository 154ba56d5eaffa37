//! Screenshot payload extraction.

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Extract and validate the base64 image payload from a screenshot field.
///
/// Accepts raw base64 or a `data:image/...;base64,<payload>` URL. ASCII
/// whitespace inside the payload (line-wrapped encoders) is removed. Returns
/// `None` when the payload is empty or not valid standard base64, which
/// callers treat as "no image data".
pub fn extract_base64(raw: &str) -> Option<Cow<'_, str>> {
    let raw = raw.trim();
    let payload = if raw.starts_with("data:") {
        match raw.find("base64,") {
            Some(idx) => &raw[idx + "base64,".len()..],
            None => raw,
        }
    } else {
        raw
    };

    let payload: Cow<'_, str> = if payload.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(
            payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect(),
        )
    } else {
        Cow::Borrowed(payload)
    };

    if payload.is_empty() {
        return None;
    }

    match STANDARD.decode(payload.as_bytes()) {
        Ok(_) => Some(payload),
        Err(e) => {
            tracing::debug!(error = %e, "invalid base64 screenshot data");
            None
        }
    }
}

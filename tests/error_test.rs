use std::time::Duration;

use tabmonitor::{RelayError, Result};

#[test]
fn test_error_display() {
    let err = RelayError::ModelNotFound("llama-9".to_string());
    assert!(err.to_string().contains("llama-9"));
}

#[test]
fn test_input_missing_names_field() {
    let err = RelayError::InputMissing("url");
    assert_eq!(
        err.to_string(),
        "missing required field 'url' in request body"
    );
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(RelayError::NoProvider)
    }
    assert!(returns_error().is_err());
}

#[test]
fn test_json_error_conversion() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{oops")?)
    }
    assert!(matches!(parse(), Err(RelayError::Json(_))));
}

// ============================================================================
// Provider error classification
// ============================================================================

#[test]
fn provider_errors() {
    assert!(RelayError::RateLimited { retry_after: None }.is_provider_error());
    assert!(
        RelayError::RateLimited {
            retry_after: Some(Duration::from_secs(1))
        }
        .is_provider_error()
    );
    assert!(RelayError::Http("connection reset".into()).is_provider_error());
    assert!(
        RelayError::Api {
            status: 500,
            message: "internal".into()
        }
        .is_provider_error()
    );
    assert!(RelayError::AuthenticationFailed.is_provider_error());
    assert!(RelayError::ModelNotFound("m".into()).is_provider_error());
    assert!(RelayError::NoProvider.is_provider_error());
    assert!(RelayError::EmptyResponse.is_provider_error());
}

#[test]
fn non_provider_errors() {
    assert!(!RelayError::InputMissing("url").is_provider_error());
    assert!(!RelayError::Persistence("disk full".into()).is_provider_error());
    assert!(!RelayError::Configuration("bad".into()).is_provider_error());
    assert!(
        !RelayError::NormalizationFailed {
            url: "x".into(),
            reason: "y".into()
        }
        .is_provider_error()
    );
}

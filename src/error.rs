//! Error Handling
//!
//! A single error enum covers both failure classes of the arena core:
//!
//! - construction-time failures ([`LlmError::ClientInit`]) which are returned
//!   to the caller building an adapter;
//! - stream-time failures ([`LlmError::ProviderStream`]) which never escape a
//!   fragment stream as a panic or early return but travel in-band as the
//!   final item of the stream.
//!
//! The remaining variants are produced while talking to a provider and are
//! folded into `ProviderStream` at the adapter boundary.

use serde_json::Value;
use thiserror::Error;

use crate::types::ProviderKind;

/// Errors produced by the arena core
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// The adapter could not be constructed (malformed credential, bad client settings)
    #[error("Failed to initialize {provider} client: {message}")]
    ClientInit {
        provider: ProviderKind,
        message: String,
    },

    /// Any failure during a live streaming call
    #[error("Error calling {provider}: {message}")]
    ProviderStream {
        provider: ProviderKind,
        message: String,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success response that could not be classified more precisely
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<Value>,
    },

    /// Credential rejected by the provider
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Provider-side throttling
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// Request rejected as malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown model or endpoint
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed provider payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// SSE framing failure or an error payload delivered mid-stream
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Tracing subscriber could not be installed
    #[error("Telemetry initialization error: {0}")]
    TelemetryInit(String),
}

impl LlmError {
    /// Build a construction-time error for `provider`
    pub fn client_init(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::ClientInit {
            provider,
            message: message.into(),
        }
    }

    /// Wrap any error raised while streaming from `provider`.
    ///
    /// Already-wrapped errors are returned unchanged.
    pub fn provider_stream(provider: ProviderKind, error: LlmError) -> Self {
        match error {
            wrapped @ Self::ProviderStream { .. } => wrapped,
            other => Self::ProviderStream {
                provider,
                message: other.to_string(),
            },
        }
    }

    /// Whether this error was raised while constructing an adapter
    pub fn is_client_init(&self) -> bool {
        matches!(self, Self::ClientInit { .. })
    }

    /// Provider this error is attributed to, if any
    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            Self::ClientInit { provider, .. } | Self::ProviderStream { provider, .. } => {
                Some(*provider)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::HttpError(format!("Request timed out: {e}"));
        }
        if e.is_connect() {
            return Self::HttpError(format!("Connection failed: {e}"));
        }
        Self::HttpError(e.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

/// Classify a non-success HTTP response from any supported provider.
///
/// All four providers wrap failures in a top-level `error` object:
///
/// - OpenAI / Groq: `{"error": {"message", "type", "code"}}`
/// - Anthropic: `{"type": "error", "error": {"type", "message"}}`
/// - Gemini: `{"error": {"code", "message", "status"}}`
///
/// Bodies that match none of these fall back to a generic [`LlmError::ApiError`].
pub fn classify_http_error(provider: ProviderKind, status: u16, body_text: &str) -> LlmError {
    let Some(json) = serde_json::from_str::<Value>(body_text).ok() else {
        return generic_api_error(provider, status, body_text, None);
    };

    match json.get("error") {
        Some(error_obj) => classify_error_object(provider, Some(status), error_obj, json.clone()),
        None => generic_api_error(provider, status, body_text, Some(json)),
    }
}

/// Classify an `error` object found in a response body or mid-stream payload.
///
/// `status` is `None` for errors delivered inside an already-open stream.
pub(crate) fn classify_error_object(
    provider: ProviderKind,
    status: Option<u16>,
    error_obj: &Value,
    details: Value,
) -> LlmError {
    let message = error_obj
        .get("message")
        .and_then(|v| v.as_str())
        .or_else(|| error_obj.as_str())
        .unwrap_or("Unknown error")
        .to_string();
    let error_type = error_obj
        .get("type")
        .or_else(|| error_obj.get("status"))
        .and_then(|v| v.as_str())
        .unwrap_or("");

    if matches!(status, Some(401 | 403)) {
        return LlmError::AuthenticationError(message);
    }

    match error_type {
        "authentication_error" | "invalid_api_key" | "UNAUTHENTICATED" | "PERMISSION_DENIED" => {
            LlmError::AuthenticationError(message)
        }
        "rate_limit_error" | "RESOURCE_EXHAUSTED" => LlmError::RateLimitError(message),
        "invalid_request_error" | "INVALID_ARGUMENT" => LlmError::InvalidInput(message),
        "not_found_error" | "NOT_FOUND" => LlmError::NotFound(message),
        _ => match status {
            Some(429) => LlmError::RateLimitError(message),
            Some(400) => LlmError::InvalidInput(message),
            Some(404) => LlmError::NotFound(message),
            Some(code) => LlmError::ApiError {
                code,
                message: format!("{provider} API error: {message}"),
                details: Some(details),
            },
            None if error_type.is_empty() => LlmError::StreamError(message),
            None => LlmError::StreamError(format!("{error_type}: {message}")),
        },
    }
}

fn generic_api_error(
    provider: ProviderKind,
    status: u16,
    body_text: &str,
    details: Option<Value>,
) -> LlmError {
    let message = if body_text.trim().is_empty() {
        format!("{provider} returned HTTP {status}")
    } else {
        body_text.trim().to_string()
    };
    LlmError::ApiError {
        code: status,
        message,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_stream_display_matches_in_band_format() {
        let err = LlmError::provider_stream(
            ProviderKind::Anthropic,
            LlmError::HttpError("connection reset".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Error calling Anthropic: HTTP error: connection reset"
        );
        assert_eq!(err.provider(), Some(ProviderKind::Anthropic));
    }

    #[test]
    fn provider_stream_is_not_double_wrapped() {
        let inner = LlmError::provider_stream(
            ProviderKind::Groq,
            LlmError::StreamError("eof".to_string()),
        );
        let outer = LlmError::provider_stream(ProviderKind::OpenAi, inner.clone());
        assert_eq!(outer.to_string(), inner.to_string());
    }

    #[test]
    fn client_init_is_flagged() {
        let err = LlmError::client_init(ProviderKind::Gemini, "API key is empty");
        assert!(err.is_client_init());
        assert!(!LlmError::ParseError("x".into()).is_client_init());
    }

    #[test]
    fn openai_invalid_key_maps_to_authentication() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        match classify_http_error(ProviderKind::OpenAi, 401, body) {
            LlmError::AuthenticationError(msg) => assert!(msg.contains("Incorrect API key")),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn invalid_request_type_maps_to_invalid_input() {
        let body = r#"{"error":{"message":"messages: field required","type":"invalid_request_error"}}"#;
        match classify_http_error(ProviderKind::Groq, 400, body) {
            LlmError::InvalidInput(msg) => assert_eq!(msg, "messages: field required"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn anthropic_envelope_is_classified() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        match classify_http_error(ProviderKind::Anthropic, 401, body) {
            LlmError::AuthenticationError(msg) => assert_eq!(msg, "invalid x-api-key"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn gemini_status_field_is_classified() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        match classify_http_error(ProviderKind::Gemini, 429, body) {
            LlmError::RateLimitError(msg) => assert_eq!(msg, "Quota exceeded"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_falls_back_to_status() {
        let body = r#"{"error":{"message":"upstream overloaded","type":"overloaded_error"}}"#;
        match classify_http_error(ProviderKind::Anthropic, 529, body) {
            LlmError::ApiError { code, message, .. } => {
                assert_eq!(code, 529);
                assert_eq!(message, "Anthropic API error: upstream overloaded");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn mid_stream_error_without_known_type_is_a_stream_error() {
        let obj = serde_json::json!({"type": "overloaded_error", "message": "Overloaded"});
        match classify_error_object(ProviderKind::Anthropic, None, &obj, obj.clone()) {
            LlmError::StreamError(msg) => assert_eq!(msg, "overloaded_error: Overloaded"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        match classify_http_error(ProviderKind::Groq, 502, "Bad Gateway") {
            LlmError::ApiError { code, message, details } => {
                assert_eq!(code, 502);
                assert_eq!(message, "Bad Gateway");
                assert!(details.is_none());
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}

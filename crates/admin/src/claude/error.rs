//! Failures of the Claude Messages API client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Wait suggested for a 429 that carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ClaudeError {
    /// The request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("Claude API returned {status} ({kind}): {message}")]
    Api {
        status: u16,
        /// The API's error type, or `"unknown"` for a non-JSON body.
        kind: String,
        message: String,
    },

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Claude API key was rejected")]
    Unauthorized,

    /// A success response did not have the Messages API shape.
    #[error("unexpected response body: {0}")]
    Parse(String),

    /// The client could not be built from configuration.
    #[error("client setup error: {0}")]
    Setup(String),

    /// A tool call named an unknown tool or its data was missing.
    #[error("tool execution error: {0}")]
    ToolExecution(String),
}

/// `{"type": "error", "error": {"type": ..., "message": ...}}`
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

impl ClaudeError {
    /// Classify a non-success response from its status, `Retry-After` header
    /// and body.
    pub(crate) fn from_response(status: StatusCode, retry_after: Option<&str>, body: &str) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(
                retry_after
                    .and_then(|value| value.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            ),
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            _ => match serde_json::from_str::<ErrorBody>(body) {
                Ok(parsed) => Self::Api {
                    status: status.as_u16(),
                    kind: parsed.error.kind,
                    message: parsed.error.message,
                },
                Err(_) => Self::Api {
                    status: status.as_u16(),
                    kind: "unknown".to_string(),
                    message: body.trim().to_string(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_uses_retry_after() {
        let err = ClaudeError::from_response(StatusCode::TOO_MANY_REQUESTS, Some("30"), "");
        assert!(matches!(err, ClaudeError::RateLimited(30)));
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");

        let err = ClaudeError::from_response(StatusCode::TOO_MANY_REQUESTS, Some("soon"), "");
        assert!(matches!(err, ClaudeError::RateLimited(DEFAULT_RETRY_AFTER_SECS)));
        let err = ClaudeError::from_response(StatusCode::TOO_MANY_REQUESTS, None, "");
        assert!(matches!(err, ClaudeError::RateLimited(DEFAULT_RETRY_AFTER_SECS)));
    }

    #[test]
    fn test_rejected_key_is_unauthorized() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = ClaudeError::from_response(StatusCode::UNAUTHORIZED, None, body);
        assert!(matches!(err, ClaudeError::Unauthorized));
    }

    #[test]
    fn test_api_error_body_is_parsed() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let err = ClaudeError::from_response(StatusCode::from_u16(529).expect("status"), None, body);
        assert!(matches!(
            err,
            ClaudeError::Api { status: 529, ref kind, .. } if kind == "overloaded_error"
        ));
        assert_eq!(err.to_string(), "Claude API returned 529 (overloaded_error): Overloaded");
    }

    #[test]
    fn test_plain_error_body_is_kept() {
        let err = ClaudeError::from_response(StatusCode::BAD_GATEWAY, None, "Bad Gateway\n");
        assert!(matches!(
            err,
            ClaudeError::Api { status: 502, ref kind, ref message }
                if kind == "unknown" && message == "Bad Gateway"
        ));
    }
}

//! Provider client error types
//!
//! Error enum and response helpers shared by the upstream HTTP clients.

use serde::Deserialize;
use thiserror::Error;

pub use reqwest::StatusCode;

/// Maximum response body size for provider HTTP calls (16 MB).
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Error type for the YouTube Data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("API error {status} ({reason}): {message}")]
    Api {
        status: reqwest::StatusCode,
        reason: String,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

impl YoutubeError {
    /// HTTP status of the failed call, when the upstream answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Http { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable reason reported by the API (`quotaExceeded`, `liveChatEnded`, ...).
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Api { reason, .. } => Some(reason.as_str()),
            _ => None,
        }
    }
}

/// Error envelope returned by Google APIs on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    reason: String,
}

/// Read a response body with size limit and deserialize as JSON.
///
/// Checks `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes before deserializing.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, YoutubeError> {
    let bytes = bytes_with_limit(response).await?;
    serde_json::from_slice(&bytes).map_err(Into::into)
}

async fn bytes_with_limit(response: reqwest::Response) -> Result<Vec<u8>, YoutubeError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(YoutubeError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(YoutubeError::ResponseTooLarge { size: bytes.len() as u64 });
    }
    Ok(bytes.to_vec())
}

/// Check HTTP response status before processing body.
///
/// Error responses carrying a Google error envelope become
/// [`YoutubeError::Api`]; anything else becomes [`YoutubeError::Http`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, YoutubeError> {
    let status = resp.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let body = bytes_with_limit(resp).await.unwrap_or_default();
    Err(decode_error_body(status, url, &body))
}

fn decode_error_body(status: reqwest::StatusCode, url: String, body: &[u8]) -> YoutubeError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let reason = envelope
                .error
                .errors
                .into_iter()
                .map(|item| item.reason)
                .find(|reason| !reason.is_empty())
                .unwrap_or_default();
            YoutubeError::Api {
                status,
                reason,
                message: envelope.error.message,
            }
        }
        Err(_) => YoutubeError::Http { status, url },
    }
}

impl From<reqwest::Error> for YoutubeError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key
        Self::Network(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for YoutubeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_network() {
        let err = YoutubeError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_error_display_http() {
        let err = YoutubeError::Http {
            status: reqwest::StatusCode::NOT_FOUND,
            url: "https://example.com/api".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404 Not Found for https://example.com/api");
    }

    #[test]
    fn test_error_display_api() {
        let err = YoutubeError::Api {
            status: reqwest::StatusCode::FORBIDDEN,
            reason: "quotaExceeded".to_string(),
            message: "quota exhausted".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error 403 Forbidden (quotaExceeded): quota exhausted"
        );
        assert_eq!(err.reason(), Some("quotaExceeded"));
        assert_eq!(err.status(), Some(reqwest::StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_decode_error_envelope() {
        let body = br#"{"error":{"code":403,"message":"The live chat is no longer live.","errors":[{"domain":"youtube.liveChat","reason":"liveChatEnded"}]}}"#;
        let err = decode_error_body(reqwest::StatusCode::FORBIDDEN, "u".to_string(), body);
        match err {
            YoutubeError::Api { reason, message, .. } => {
                assert_eq!(reason, "liveChatEnded");
                assert_eq!(message, "The live chat is no longer live.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_non_json_error_body() {
        let err = decode_error_body(
            reqwest::StatusCode::BAD_GATEWAY,
            "https://example.com".to_string(),
            b"<html>bad gateway</html>",
        );
        assert!(matches!(err, YoutubeError::Http { .. }));
        assert_eq!(err.reason(), None);
    }

    #[test]
    fn test_error_display_response_too_large() {
        let err = YoutubeError::ResponseTooLarge { size: 20_000_000 };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains(&MAX_RESPONSE_SIZE.to_string()));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: YoutubeError = json_err.into();
        assert!(matches!(err, YoutubeError::Parse(_)));
    }
}

// Provider Error Types

use livewatch_providers::YoutubeError;

/// Upstream call failure, independent of the concrete platform client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Provider API error {status} ({reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// How a poller should read a failure.
///
/// Every kind is retried after the same fixed delay; the kind decides the
/// log level and whether the stale-session policy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network trouble, upstream 5xx, rate limiting
    Retryable,
    /// Will not heal by retrying: bad credential, exhausted quota, schema mismatch
    Fatal,
    /// The chat behind the session handle is gone
    ChatEnded,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retryable => "retryable",
            Self::Fatal => "fatal",
            Self::ChatEnded => "chat_ended",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const CHAT_ENDED_REASONS: &[&str] = &["liveChatEnded", "liveChatNotFound", "liveChatDisabled"];
const RETRYABLE_REASONS: &[&str] = &[
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "backendError",
    "internalError",
];

const fn retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

impl ProviderError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Retryable,
            Self::Http { status, .. } if retryable_status(*status) => FailureKind::Retryable,
            Self::Http { .. } => FailureKind::Fatal,
            Self::Api { reason, .. } if CHAT_ENDED_REASONS.contains(&reason.as_str()) => {
                FailureKind::ChatEnded
            }
            Self::Api { reason, .. } if RETRYABLE_REASONS.contains(&reason.as_str()) => {
                FailureKind::Retryable
            }
            Self::Api { status, .. } if retryable_status(*status) => FailureKind::Retryable,
            Self::Api { .. } | Self::Parse(_) | Self::InvalidConfig(_) => FailureKind::Fatal,
        }
    }
}

impl From<YoutubeError> for ProviderError {
    fn from(err: YoutubeError) -> Self {
        match err {
            YoutubeError::Network(msg) => Self::Network(msg),
            YoutubeError::Http { status, url } => Self::Http {
                status: status.as_u16(),
                message: format!("request to {} failed", redact_key(&url)),
            },
            YoutubeError::Api { status, reason, message } => Self::Api {
                status: status.as_u16(),
                reason,
                message,
            },
            YoutubeError::Parse(msg) => Self::Parse(msg),
            err @ YoutubeError::ResponseTooLarge { .. } => Self::Parse(err.to_string()),
            YoutubeError::InvalidConfig(msg) => Self::InvalidConfig(msg),
        }
    }
}

/// Strip the query string so the API key never reaches the logs.
fn redact_key(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

pub type Result<T> = std::result::Result<T, ProviderError>;

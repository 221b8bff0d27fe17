use thiserror::Error;

/// Errors returned while verifying, decoding or dispatching a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook is not signed")]
    NotSigned,

    #[error("invalid signature header: {0}")]
    InvalidHeader(String),

    #[error("no signature matches the expected signature for the payload")]
    NoValidSignature,

    #[error("timestamp is {age}s old, tolerance is {tolerance}s")]
    TooOld { age: i64, tolerance: u64 },

    #[error("invalid event payload: {0}")]
    Decode(String),

    #[error("handler for {prefix:?} failed: {reason}")]
    Handler { prefix: String, reason: String },
}

impl WebhookError {
    /// Stable, low-cardinality label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookError::NotSigned => "not_signed",
            WebhookError::InvalidHeader(_) => "invalid_header",
            WebhookError::NoValidSignature => "no_valid_signature",
            WebhookError::TooOld { .. } => "too_old",
            WebhookError::Decode(_) => "decode_error",
            WebhookError::Handler { .. } => "handler_error",
        }
    }

    /// True for failures that mean the sender could not prove it holds the secret
    /// (or the proof went stale).
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::NotSigned | WebhookError::NoValidSignature | WebhookError::TooOld { .. }
        )
    }

    pub(crate) fn handler(prefix: &str, reason: impl ToString) -> Self {
        WebhookError::Handler {
            prefix: prefix.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(e: serde_json::Error) -> Self {
        WebhookError::Decode(e.to_string())
    }
}

use std::time::Duration;

/// Request header carrying the timestamped signature.
pub const SIGNATURE_HEADER: &str = "Martian-Pay-Signature";

/// Header key holding the Unix timestamp.
pub const TIMESTAMP_KEY: &str = "t";

/// Header key for HMAC-SHA256 signatures (the only scheme currently published).
pub const SIGNATURE_SCHEME_V1: &str = "v1";

/// HMAC-SHA256 output length in bytes.
pub const SIGNATURE_LEN: usize = 32;

/// Maximum accepted age of a signed event.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Default receiver route.
pub const DEFAULT_WEBHOOK_PATH: &str = "/v1/webhook_test";

/// Value of the `object` field on every event envelope.
pub const EVENT_OBJECT: &str = "event";

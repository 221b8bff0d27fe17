use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::constants::DEFAULT_TOLERANCE;
use crate::error::WebhookError;
use crate::hmac::compute_signature;
use crate::security::signature_matches_any;
use crate::webhook::{Event, SignedHeader};

/// Verifies `Martian-Pay-Signature` headers against the raw request body.
///
/// Stateless apart from the tolerance window; share one instance across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    tolerance: Duration,
}

impl Validator {
    pub fn new(tolerance: Duration) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Verify `header` for `payload` using the system clock.
    pub fn validate(&self, payload: &[u8], header: &str, secret: &[u8]) -> Result<(), WebhookError> {
        self.validate_at(payload, header, secret, unix_now())
    }

    /// Verify `header` for `payload` as of `now` (Unix seconds).
    ///
    /// The signature is recomputed before the age check, and every offered
    /// `v1` is compared in constant time; any one match is enough.
    pub fn validate_at(
        &self,
        payload: &[u8],
        header: &str,
        secret: &[u8],
        now: i64,
    ) -> Result<(), WebhookError> {
        let header = SignedHeader::parse(header)?;
        let expected = compute_signature(secret, header.timestamp, payload);

        let age = now.saturating_sub(header.timestamp);
        let tolerance = self.tolerance.as_secs();
        if age > 0 && age as u64 > tolerance {
            return Err(WebhookError::TooOld { age, tolerance });
        }

        if signature_matches_any(&expected, &header.signatures) {
            Ok(())
        } else {
            Err(WebhookError::NoValidSignature)
        }
    }

    /// Verify the signature, then decode the event.
    pub fn construct_event(
        &self,
        payload: &[u8],
        header: &str,
        secret: &[u8],
    ) -> Result<Event, WebhookError> {
        self.validate(payload, header, secret)?;
        Event::decode(payload)
    }

    /// [`construct_event`](Self::construct_event) as of `now` (Unix seconds).
    pub fn construct_event_at(
        &self,
        payload: &[u8],
        header: &str,
        secret: &[u8],
        now: i64,
    ) -> Result<Event, WebhookError> {
        self.validate_at(payload, header, secret, now)?;
        Event::decode(payload)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

/// Verify with the default tolerance window.
pub fn validate_payload(payload: &[u8], header: &str, secret: &[u8]) -> Result<(), WebhookError> {
    Validator::default().validate(payload, header, secret)
}

/// Verify with the default tolerance window and decode the event.
pub fn construct_event(payload: &[u8], header: &str, secret: &[u8]) -> Result<Event, WebhookError> {
    Validator::default().construct_event(payload, header, secret)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

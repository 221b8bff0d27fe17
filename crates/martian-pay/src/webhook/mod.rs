//! Signed webhook ingestion: header codec, validation, event decoding and dispatch.
//!
//! A request moves through `parse header -> verify signature -> decode event
//! -> dispatch`; any failure stops the pipeline with a [`WebhookError`](crate::WebhookError).

pub mod dispatch;
pub mod event;
pub mod header;
pub mod validator;

pub use dispatch::{Dispatch, Dispatcher, DispatcherBuilder, EventHandler, EventObject};
pub use event::{decode_event, Event, EventData};
pub use header::SignedHeader;
pub use validator::{construct_event, validate_payload, Validator};

use crate::hmac::compute_signature;

/// Produce a single-signature header for `payload` signed at `timestamp`.
///
/// For a published event the timestamp is the event's `created` field.
pub fn sign_payload(secret: &[u8], timestamp: i64, payload: &[u8]) -> SignedHeader {
    SignedHeader::new(timestamp, compute_signature(secret, timestamp, payload))
}

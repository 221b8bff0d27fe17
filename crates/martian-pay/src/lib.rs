//! Martian Pay SDK: verified webhook ingestion.
//!
//! Martian Pay signs every webhook delivery with HMAC-SHA256 over
//! `<timestamp>.<raw body>` and sends the result in the
//! `Martian-Pay-Signature` header as `t=<unix>,v1=<hex>`. This crate verifies
//! that header, decodes the event envelope and routes the event's resource to
//! typed handlers.
//!
//! # Pipeline
//!
//! - [`SignedHeader`]: parses and renders the signature header
//! - [`Validator`]: recomputes the signature, enforces the tolerance window
//!   and compares every offered signature in constant time
//! - [`Event`]: the decoded envelope; `data.raw` keeps the resource's exact bytes
//! - [`Dispatcher`]: longest-prefix routing of event types to handlers
//!
//! # Quick example
//!
//! ```
//! use martian_pay::resources::PaymentIntent;
//! use martian_pay::webhook::{sign_payload, Dispatcher, Validator};
//!
//! let secret = b"whsec_example";
//! let body = br#"{"id":"evt_1","object":"event","created":1700000000,"type":"payment_intent.succeeded","data":{"object":{"id":"pi_1","amount":"10.00"}}}"#;
//! let header = sign_payload(secret, 1700000000, body).to_string();
//!
//! let event = Validator::default()
//!     .construct_event_at(body, &header, secret, 1700000030)
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::builder()
//!     .on_object(|_, pi: PaymentIntent| {
//!         assert_eq!(pi.amount, "10.00");
//!         Ok(())
//!     })
//!     .build();
//! dispatcher.dispatch(&event).unwrap();
//! ```

pub mod constants;
pub mod error;
pub mod hmac;
pub mod resources;
pub mod secret;
pub mod security;
pub mod webhook;

pub use constants::*;
pub use error::WebhookError;
pub use hmac::{compute_signature, signing_input, Signature};
pub use secret::WebhookSecret;
pub use webhook::{
    sign_payload, Dispatch, Dispatcher, Event, EventData, EventHandler, EventObject, SignedHeader,
    Validator,
};

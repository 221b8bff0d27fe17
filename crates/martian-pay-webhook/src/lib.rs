//! Martian Pay webhook receiver.
//!
//! Accepts signed deliveries on a single POST route, verifies the
//! `Martian-Pay-Signature` header with [`martian_pay`], and dispatches the
//! decoded event to typed handlers. Every delivery is answered with a
//! `{code, msg}` body.
//!
//! # Modules
//!
//! - [`routes`]: HTTP endpoints (webhook receiver, health, metrics)
//! - [`state`]: Shared [`AppState`](state::AppState) with a swappable handler table
//! - [`config`]: Environment configuration
//! - [`error`]: Config errors and the error-to-response mapping
//! - [`handlers`]: Default logging consumers for each resource type
//! - [`metrics`]: Prometheus metrics for deliveries and dispatch

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod response;
pub mod routes;
pub mod state;

pub use config::WebhookConfig;
pub use error::{ConfigError, WebhookRejection};
pub use response::WebhookResponse;
pub use state::AppState;

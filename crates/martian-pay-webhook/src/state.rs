use std::sync::{Arc, PoisonError, RwLock};

use martian_pay::{Dispatcher, Validator, WebhookSecret};

use crate::config::WebhookConfig;

/// Shared application state for the webhook receiver.
pub struct AppState {
    /// HMAC key for this endpoint. Mandatory; the receiver will not start without it.
    pub secret: Arc<WebhookSecret>,
    pub validator: Validator,
    dispatcher: RwLock<Arc<Dispatcher>>,
    /// Bearer token for /metrics (separate from the webhook secret).
    pub metrics_token: Option<Vec<u8>>,
    pub public_metrics: bool,
}

impl AppState {
    pub fn new(secret: WebhookSecret, validator: Validator, dispatcher: Dispatcher) -> Self {
        Self {
            secret: Arc::new(secret),
            validator,
            dispatcher: RwLock::new(Arc::new(dispatcher)),
            metrics_token: None,
            public_metrics: false,
        }
    }

    pub fn from_config(config: &WebhookConfig, dispatcher: Dispatcher) -> Self {
        Self {
            metrics_token: config.metrics_token.clone(),
            public_metrics: config.public_metrics,
            ..Self::new(
                config.secret.clone(),
                Validator::new(config.tolerance),
                dispatcher,
            )
        }
    }

    pub fn with_metrics_token(mut self, token: Option<Vec<u8>>) -> Self {
        self.metrics_token = token;
        self
    }

    /// Snapshot of the current handler table.
    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        let guard = self.dispatcher.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Atomically swap in a new handler table. In-flight requests finish on the old one.
    pub fn replace_dispatcher(&self, dispatcher: Dispatcher) -> Arc<Dispatcher> {
        let mut guard = self.dispatcher.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(dispatcher))
    }
}

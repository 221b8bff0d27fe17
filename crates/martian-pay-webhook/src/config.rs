use std::time::Duration;

use martian_pay::{WebhookSecret, DEFAULT_TOLERANCE, DEFAULT_WEBHOOK_PATH};

use crate::error::ConfigError;

/// Secrets shorter than this still work but trigger a startup warning.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Receiver configuration, normally read from the environment.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub secret: WebhookSecret,
    pub tolerance: Duration,
    pub path: String,
    pub port: u16,
    pub rate_limit_rpm: u64,
    pub metrics_token: Option<Vec<u8>>,
    pub public_metrics: bool,
    pub max_body_bytes: usize,
}

impl WebhookConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = get("MARTIAN_PAY_WEBHOOK_SECRET")
            .map(WebhookSecret::from)
            .ok_or(ConfigError::MissingSecret)?;

        let tolerance = match get("MARTIAN_PAY_WEBHOOK_TOLERANCE_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "MARTIAN_PAY_WEBHOOK_TOLERANCE_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TOLERANCE,
        };

        let path = match get("MARTIAN_PAY_WEBHOOK_PATH") {
            Some(p) if p.starts_with('/') => p,
            Some(p) => {
                return Err(ConfigError::Invalid {
                    key: "MARTIAN_PAY_WEBHOOK_PATH",
                    value: p,
                })
            }
            None => DEFAULT_WEBHOOK_PATH.to_string(),
        };

        let port = parse_or(&get, "PORT", 8080)?;
        let rate_limit_rpm = parse_or(&get, "RATE_LIMIT_RPM", 600)?;
        let max_body_bytes = parse_or(&get, "MAX_BODY_BYTES", 65_536)?;

        let metrics_token = get("METRICS_TOKEN").map(String::into_bytes);
        let public_metrics = get("MARTIAN_PUBLIC_METRICS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            secret,
            tolerance,
            path,
            port,
            rate_limit_rpm,
            metrics_token,
            public_metrics,
            max_body_bytes,
        })
    }

    /// Configuration with defaults for everything but the secret.
    pub fn with_secret(secret: impl Into<WebhookSecret>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: DEFAULT_TOLERANCE,
            path: DEFAULT_WEBHOOK_PATH.to_string(),
            port: 8080,
            rate_limit_rpm: 600,
            metrics_token: None,
            public_metrics: false,
            max_body_bytes: 65_536,
        }
    }

    pub fn secret_is_short(&self) -> bool {
        self.secret.len() < RECOMMENDED_SECRET_LEN
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

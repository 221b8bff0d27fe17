use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, ResponseError};
use martian_pay::WebhookError;
use thiserror::Error;

use crate::metrics;
use crate::response::WebhookResponse;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MARTIAN_PAY_WEBHOOK_SECRET is required")]
    MissingSecret,

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// A delivery the receiver refused, rendered as `{code, msg}`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct WebhookRejection(#[from] pub WebhookError);

impl WebhookRejection {
    /// Client-facing message. Handler failures are not described to the sender.
    fn message(&self) -> String {
        match &self.0 {
            WebhookError::Handler { .. } => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for WebhookRejection {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            WebhookError::InvalidHeader(_) | WebhookError::Decode(_) => StatusCode::BAD_REQUEST,
            WebhookError::NotSigned
            | WebhookError::NoValidSignature
            | WebhookError::TooOld { .. } => StatusCode::UNAUTHORIZED,
            WebhookError::Handler { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(WebhookResponse::error(status, self.message()))
    }
}

/// Re-render rejections produced outside the handler (oversized body, rate
/// limit) with the same `{code, msg}` body as every other response.
pub fn json_error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::PAYLOAD_TOO_LARGE, render_as_json)
        .handler(StatusCode::TOO_MANY_REQUESTS, render_as_json)
}

fn render_as_json<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let (req, original) = res.into_parts();

    let reason = match status {
        StatusCode::PAYLOAD_TOO_LARGE => "body_too_large",
        _ => "rate_limited",
    };
    metrics::WEBHOOK_REJECTIONS.with_label_values(&[reason]).inc();
    tracing::warn!(reason, path = %req.path(), "request rejected before verification");

    let mut builder = HttpResponse::build(status);
    // Keep retry-after and friends; the body is replaced.
    for (name, value) in original.headers() {
        if *name != header::CONTENT_TYPE && *name != header::CONTENT_LENGTH {
            builder.insert_header((name.clone(), value.clone()));
        }
    }
    let msg = status
        .canonical_reason()
        .unwrap_or("request rejected")
        .to_lowercase();
    let response = builder.json(WebhookResponse::error(status, msg));

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

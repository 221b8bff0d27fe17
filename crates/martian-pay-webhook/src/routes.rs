use actix_web::{get, web, HttpRequest, HttpResponse};
use martian_pay::{Dispatch, WebhookError, SIGNATURE_HEADER};

use crate::error::WebhookRejection;
use crate::metrics;
use crate::response::WebhookResponse;
use crate::state::AppState;

/// Mount the webhook receiver at `path`.
pub fn configure(path: &str) -> impl FnOnce(&mut web::ServiceConfig) + '_ {
    move |cfg| {
        cfg.route(path, web::post().to(receive_webhook));
    }
}

/// Read the signature header. Header lookup is case-insensitive.
fn signature_header(req: &HttpRequest) -> Result<&str, WebhookError> {
    match req.headers().get(SIGNATURE_HEADER) {
        None => Err(WebhookError::NotSigned),
        Some(value) => value
            .to_str()
            .map_err(|_| WebhookError::InvalidHeader("header is not visible ASCII".to_string())),
    }
}

fn process(req: &HttpRequest, body: &[u8], state: &AppState) -> Result<Dispatch, WebhookError> {
    let header = signature_header(req)?;
    let event = state
        .validator
        .construct_event(body, header, state.secret.as_bytes())?;

    tracing::debug!(
        event_id = %event.id,
        event_type = %event.event_type,
        livemode = event.livemode,
        "webhook verified"
    );

    let dispatcher = state.dispatcher();
    let outcome = dispatcher.dispatch(&event).inspect_err(|e| {
        tracing::error!(
            event_id = %event.id,
            event_type = %event.event_type,
            error = %e,
            "event handler failed"
        );
    })?;

    match &outcome {
        Dispatch::Handled { prefix } => {
            metrics::DISPATCH_OUTCOMES.with_label_values(&["handled"]).inc();
            tracing::info!(event_id = %event.id, event_type = %event.event_type, %prefix, "event dispatched");
        }
        Dispatch::NoHandler => {
            metrics::DISPATCH_OUTCOMES.with_label_values(&["no_handler"]).inc();
            tracing::info!(event_id = %event.id, event_type = %event.event_type, "no handler for event type");
        }
    }
    Ok(outcome)
}

pub async fn receive_webhook(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, WebhookRejection> {
    let start = std::time::Instant::now();
    let result = process(&req, &body, &state);
    let elapsed = start.elapsed().as_secs_f64();

    match result {
        Ok(_) => {
            metrics::WEBHOOK_REQUESTS.with_label_values(&["accepted"]).inc();
            metrics::PROCESSING_LATENCY
                .with_label_values(&["accepted"])
                .observe(elapsed);
            Ok(HttpResponse::Ok().json(WebhookResponse::success()))
        }
        Err(e) => {
            metrics::WEBHOOK_REQUESTS.with_label_values(&["rejected"]).inc();
            metrics::WEBHOOK_REJECTIONS.with_label_values(&[e.kind()]).inc();
            metrics::PROCESSING_LATENCY
                .with_label_values(&["rejected"])
                .observe(elapsed);
            if e.is_authentication_failure() {
                tracing::warn!(reason = e.kind(), error = %e, "webhook authentication failed");
            } else if !matches!(e, WebhookError::Handler { .. }) {
                tracing::warn!(reason = e.kind(), error = %e, "webhook rejected");
            }
            Err(WebhookRejection(e))
        }
    }
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "martian-pay-webhook",
    }))
}

#[get("/metrics")]
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match &state.metrics_token {
        Some(token) => {
            let authorized = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| martian_pay::security::constant_time_eq(t.as_bytes(), token))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Valid Bearer token required for /metrics"
                }));
            }
        }
        None if !state.public_metrics => {
            return HttpResponse::Forbidden().json(serde_json::json!({
                "error": "forbidden",
                "message": "Set METRICS_TOKEN or MARTIAN_PUBLIC_METRICS=true to access /metrics"
            }));
        }
        None => {}
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}

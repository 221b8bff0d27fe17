use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use martian_pay_webhook::config::WebhookConfig;
use martian_pay_webhook::error::json_error_handlers;
use martian_pay_webhook::handlers::default_dispatcher;
use martian_pay_webhook::routes;
use martian_pay_webhook::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match WebhookConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                "{e}. Set MARTIAN_PAY_WEBHOOK_SECRET to the endpoint secret shown in the \
                 Martian Pay dashboard."
            );
            std::process::exit(1);
        }
    };

    if config.secret_is_short() {
        tracing::warn!(
            "MARTIAN_PAY_WEBHOOK_SECRET is only {} bytes (minimum 32 recommended)",
            config.secret.len()
        );
    }

    if config.metrics_token.is_none() && !config.public_metrics {
        tracing::warn!("METRICS_TOKEN not set, /metrics is disabled");
    }

    let state = web::Data::new(AppState::from_config(&config, default_dispatcher()));

    let port = config.port;
    let path = config.path.clone();
    let max_body_bytes = config.max_body_bytes;

    tracing::info!("Martian Pay webhook receiver listening on port {port}");
    tracing::info!("Tolerance window: {}s", config.tolerance.as_secs());
    tracing::info!("Rate limit: {} req/min per IP", config.rate_limit_rpm);
    tracing::info!("  POST http://localhost:{port}{path}");
    tracing::info!("  GET  http://localhost:{port}/health");

    let governor_conf = match GovernorConfigBuilder::default()
        .requests_per_minute(config.rate_limit_rpm)
        .finish()
    {
        Some(conf) => conf,
        None => {
            tracing::error!("RATE_LIMIT_RPM must be greater than zero");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(json_error_handlers())
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_body_bytes))
            .configure(routes::configure(&path))
            .service(routes::health)
            .service(routes::metrics_endpoint)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::sync::LazyLock;

pub static WEBHOOK_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "martian_webhook_requests_total",
        "Total webhook deliveries received",
        &["result"]
    )
    .unwrap()
});

pub static WEBHOOK_REJECTIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "martian_webhook_rejections_total",
        "Webhook deliveries rejected, by reason",
        &["reason"]
    )
    .unwrap()
});

pub static DISPATCH_OUTCOMES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "martian_webhook_dispatch_total",
        "Verified events by dispatch outcome",
        &["outcome"]
    )
    .unwrap()
});

pub static PROCESSING_LATENCY: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "martian_webhook_processing_duration_seconds",
        "Time from receiving a delivery to responding",
        &["result"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]
    )
    .unwrap()
});

pub fn metrics_output() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

// Registration only fails on duplicate metric names, which is a programming error.
#![allow(clippy::expect_used)]

use error_stack::ResultExt;
use lazy_static::lazy_static;
use prometheus::{
    self, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

// Define latency buckets for histograms
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

lazy_static! {
    pub static ref HTTP_SERVER_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "HTTP_SERVER_REQUESTS_TOTAL",
        "Total number of HTTP requests received",
        &["method", "path", "gateway"]
    )
    .expect("failed to register HTTP_SERVER_REQUESTS_TOTAL");
    pub static ref HTTP_SERVER_REQUESTS_SUCCESSFUL: IntCounterVec = register_int_counter_vec!(
        "HTTP_SERVER_REQUESTS_SUCCESSFUL",
        "Total number of HTTP requests answered with a success status",
        &["method", "path", "gateway"]
    )
    .expect("failed to register HTTP_SERVER_REQUESTS_SUCCESSFUL");
    pub static ref HTTP_SERVER_REQUEST_LATENCY: HistogramVec = register_histogram_vec!(
        "HTTP_SERVER_REQUEST_LATENCY",
        "Request latency in seconds",
        &["method", "path", "gateway"],
        LATENCY_BUCKETS.to_vec()
    )
    .expect("failed to register HTTP_SERVER_REQUEST_LATENCY");
    pub static ref EXTERNAL_SERVICE_API_CALLS_LATENCY: HistogramVec = register_histogram_vec!(
        "EXTERNAL_SERVICE_API_CALLS_LATENCY_SECONDS",
        "Latency of external service API calls",
        &["flow", "connector"],
        LATENCY_BUCKETS.to_vec()
    )
    .expect("failed to register EXTERNAL_SERVICE_API_CALLS_LATENCY_SECONDS");
    pub static ref EXTERNAL_SERVICE_TOTAL_API_CALLS: IntCounterVec = register_int_counter_vec!(
        "EXTERNAL_SERVICE_TOTAL_API_CALLS",
        "Total number of external service API calls",
        &["flow", "connector"]
    )
    .expect("failed to register EXTERNAL_SERVICE_TOTAL_API_CALLS");
    pub static ref EXTERNAL_SERVICE_API_CALLS_ERRORS: IntCounterVec = register_int_counter_vec!(
        "EXTERNAL_SERVICE_API_CALLS_ERRORS",
        "Total number of errors in external service API calls",
        &["flow", "connector", "error"]
    )
    .expect("failed to register EXTERNAL_SERVICE_API_CALLS_ERRORS");
    pub static ref WEBHOOK_EVENTS_RECEIVED: IntCounterVec = register_int_counter_vec!(
        "WEBHOOK_EVENTS_RECEIVED",
        "Inbound gateway events by type and whether they were ignored",
        &["gateway", "event_type", "ignored"]
    )
    .expect("failed to register WEBHOOK_EVENTS_RECEIVED");
}

// Metrics handler
pub async fn metrics_handler() -> error_stack::Result<String, MetricsError> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .change_context(MetricsError::EncodingError)?;
    String::from_utf8(buffer).change_context(MetricsError::Utf8Error)
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Error encoding metrics")]
    EncodingError,
    #[error("Error converting metrics to utf8")]
    Utf8Error,
}

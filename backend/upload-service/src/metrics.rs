//! Prometheus metrics for upload-service

use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

use crate::error::{AppError, Result};

pub const OUTCOME_CREATED: &str = "created";

lazy_static::lazy_static! {
    /// Upload requests by outcome (`created` or an error code)
    static ref UPLOAD_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "upload_requests_total",
        "Upload requests by outcome",
        &["outcome"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

pub fn record_upload(outcome: &str) {
    UPLOAD_REQUESTS.with_label_values(&[outcome]).inc();
}

pub fn upload_count(outcome: &str) -> u64 {
    UPLOAD_REQUESTS.with_label_values(&[outcome]).get()
}

/// Render the default registry in the Prometheus text format
pub fn render() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| AppError::Internal(format!("Failed to encode metrics: {e}")))?;

    String::from_utf8(buffer)
        .map_err(|e| AppError::Internal(format!("Metrics output is not UTF-8: {e}")))
}

/// HTTP handlers for upload-service
///
/// - Uploads: multipart image + text posts
/// - Health: liveness and readiness probes
/// - Metrics: Prometheus scrape endpoint
pub mod health;
pub mod metrics;
pub mod uploads;

pub use health::{health, readiness};
pub use metrics::metrics;
pub use uploads::upload_post;

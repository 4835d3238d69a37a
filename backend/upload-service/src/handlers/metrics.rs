use actix_web::HttpResponse;

use crate::error::Result;

/// Prometheus scrape endpoint
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "health",
    responses((status = 200, description = "Prometheus text exposition", body = String, content_type = "text/plain"))
)]
pub async fn metrics() -> Result<HttpResponse> {
    let body = crate::metrics::render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

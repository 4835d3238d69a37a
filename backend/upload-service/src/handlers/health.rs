/// Health handlers - liveness and readiness probes
use actix_web::{web, HttpResponse};

use crate::models::{ComponentStatus, ReadinessResponse};
use crate::AppState;

/// Liveness probe; never touches storage or the database
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive", body = String, content_type = "text/plain"))
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK")
}

/// Readiness probe; pings the database and the bucket
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Dependencies reachable", body = ReadinessResponse),
        (status = 503, description = "A dependency is unreachable", body = ReadinessResponse),
    )
)]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let (database, storage) = futures::join!(state.posts.ping(), state.storage.health_check());

    let database = match database {
        Ok(()) => ComponentStatus::Ok,
        Err(err) => {
            tracing::warn!("readiness: database check failed: {}", err);
            ComponentStatus::Unavailable
        }
    };
    let storage = match storage {
        Ok(()) => ComponentStatus::Ok,
        Err(err) => {
            tracing::warn!("readiness: storage check failed: {}", err);
            ComponentStatus::Unavailable
        }
    };

    let report = ReadinessResponse::new(database, storage);
    if report.is_ready() {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}

//! Upload Service
//!
//! Accepts a multipart image + text upload, stores the image in S3 and
//! records the text and image rows in MySQL.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::db::PostRepository;
use crate::services::storage::ObjectStorage;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};

/// Clients shared by every request, built once in `main`
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStorage>,
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    pub fn new(storage: Arc<dyn ObjectStorage>, posts: Arc<dyn PostRepository>) -> Self {
        Self { storage, posts }
    }
}

/// Register every route; shared by the server and the integration tests
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/health/ready", web::get().to(handlers::readiness))
        .route("/metrics", web::get().to(handlers::metrics))
        .route(
            openapi::ApiDoc::openapi_json_path(),
            web::get().to(|| async {
                use utoipa::OpenApi;
                HttpResponse::Ok()
                    .content_type("application/json")
                    .json(openapi::ApiDoc::openapi())
            }),
        )
        .service(web::scope("/api").route("/upload", web::post().to(handlers::upload_post)));
}

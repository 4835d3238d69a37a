/// OpenAPI documentation for the upload service
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::models::{ComponentStatus, ReadinessResponse, UploadRequestSchema, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Upload Service API",
        version = "1.0.0",
        description = "Accepts an image plus a text field, stores the image in object storage and records the post in MySQL.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Development server"),
    ),
    paths(
        crate::handlers::uploads::upload_post,
        crate::handlers::health::health,
        crate::handlers::health::readiness,
        crate::handlers::metrics::metrics,
    ),
    components(schemas(
        UploadRequestSchema,
        UploadResponse,
        ErrorResponse,
        ReadinessResponse,
        ComponentStatus,
    )),
    tags(
        (name = "uploads", description = "Image and text uploads"),
        (name = "health", description = "Service health checks"),
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/openapi.json"
    }
}

/// Data models for upload-service
///
/// - TextRecord / ImageRecord: the two rows written per upload
/// - UploadForm: the parsed multipart request
/// - Response bodies
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload succeeded";

// ========================================
// Database Rows
// ========================================

/// Row in the `text` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TextRecord {
    pub id: u64,
    pub content: String,
}

/// Row in the `image` table, linked to its TextRecord through `post_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageRecord {
    pub post_id: u64,
    pub file_name: String,
    pub url: String,
}

// ========================================
// Upload Request
// ========================================

/// File part of a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename supplied by the client, if any
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Multipart request as received; presence is checked by the upload service
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub image: Option<UploadedFile>,
    pub text: Option<String>,
}

/// OpenAPI shape of the multipart body
#[derive(Debug, ToSchema)]
pub struct UploadRequestSchema {
    /// Image file (exactly one)
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// Text stored alongside the image
    pub text: String,
}

// ========================================
// Responses
// ========================================

/// Body returned with `201 Created`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub post_id: u64,
    pub file_name: String,
    pub url: String,
}

impl From<ImageRecord> for UploadResponse {
    fn from(record: ImageRecord) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            post_id: record.post_id,
            file_name: record.file_name,
            url: record.url,
        }
    }
}

/// Status of a single dependency in the readiness report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: ComponentStatus,
    pub storage: ComponentStatus,
}

impl ReadinessResponse {
    pub fn new(database: ComponentStatus, storage: ComponentStatus) -> Self {
        let status = if both_ok(database, storage) {
            "ready"
        } else {
            "not_ready"
        };

        Self {
            status: status.to_string(),
            database,
            storage,
        }
    }

    pub fn is_ready(&self) -> bool {
        both_ok(self.database, self.storage)
    }
}

fn both_ok(database: ComponentStatus, storage: ComponentStatus) -> bool {
    database == ComponentStatus::Ok && storage == ComponentStatus::Ok
}

/// Service layer for uploads
///
/// `UploadService` runs the per-request sequence: store the object, insert
/// the text row, insert the image row. The steps are strictly ordered and
/// nothing is rolled back when a later step fails.
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::models::{ImageRecord, UploadForm};

pub mod storage;

use storage::{ObjectStorage, PutObject};

/// Every object key lives under this prefix
pub const UPLOAD_KEY_PREFIX: &str = "uploads/";

/// Multipart field the image is read from
pub const IMAGE_FIELD: &str = "image";

/// Multipart field the text is read from
pub const TEXT_FIELD: &str = "text";

/// Generate a storage key unique per request
///
/// The millisecond prefix keeps listings roughly chronological; the random
/// suffix keeps concurrent uploads within the same millisecond apart.
pub fn generate_storage_key() -> String {
    format!(
        "{}{}-{}",
        UPLOAD_KEY_PREFIX,
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

/// Upload service for handling upload operations
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
    posts: Arc<dyn PostRepository>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>, posts: Arc<dyn PostRepository>) -> Self {
        Self { storage, posts }
    }

    /// Store the image and record the post
    ///
    /// Presence of both fields is checked before any external call, so a
    /// rejected request leaves no object and no rows behind.
    pub async fn create_post(&self, form: UploadForm) -> Result<ImageRecord> {
        let image = form.image.ok_or(AppError::MissingImage)?;
        let text = form.text.ok_or(AppError::MissingText)?;

        let key = generate_storage_key();
        let size = image.size();

        let stored = self
            .storage
            .put_object(PutObject {
                key,
                body: image.data,
                content_type: image.content_type,
                field_name: IMAGE_FIELD.to_string(),
            })
            .await
            .map_err(|err| {
                error!(error = %err, "image upload to object storage failed");
                AppError::from(err)
            })?;

        info!(
            key = %stored.key,
            size,
            client_file_name = ?image.file_name,
            "image stored"
        );

        let post_id = match self.posts.insert_text(&text).await {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    key = %stored.key,
                    error = %err,
                    "text insert failed; stored object has no database rows"
                );
                return Err(err);
            }
        };

        let record = ImageRecord {
            post_id,
            file_name: stored.key,
            url: stored.url,
        };

        if let Err(err) = self.posts.insert_image(&record).await {
            warn!(
                post_id,
                key = %record.file_name,
                error = %err,
                "image insert failed; text record left without an image"
            );
            return Err(err);
        }

        info!(post_id, key = %record.file_name, "upload recorded");

        Ok(record)
    }
}

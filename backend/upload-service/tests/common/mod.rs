//! Shared fixtures for the HTTP-level tests
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use upload_service::db::PostRepository;
use upload_service::models::{ImageRecord, TextRecord};
use upload_service::services::storage::{ObjectStorage, PutObject, StorageError, StoredObject};
use upload_service::{AppError, AppState};

pub const BOUNDARY: &str = "----upload-service-test-boundary";
pub const PUBLIC_BASE: &str = "https://test-bucket.s3.ap-northeast-2.amazonaws.com";

/// Object as captured by [`MemoryStorage`]
#[derive(Debug, Clone)]
pub struct StoredBody {
    pub body: Bytes,
    pub content_type: String,
    pub field_name: String,
}

/// In-memory bucket
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, StoredBody>>,
    put_attempts: AtomicU64,
    fail_puts: AtomicBool,
    unreachable: AtomicBool,
}

impl MemoryStorage {
    pub fn failing() -> Self {
        let storage = Self::default();
        storage.fail_puts.store(true, Ordering::SeqCst);
        storage
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn objects(&self) -> HashMap<String, StoredBody> {
        self.objects.lock().unwrap().clone()
    }

    pub fn put_attempts(&self) -> u64 {
        self.put_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put_object(&self, object: PutObject) -> Result<StoredObject, StorageError> {
        self.put_attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Upload(
                "simulated failure: connection reset by peer".to_string(),
            ));
        }

        let url = format!("{}/{}", PUBLIC_BASE, object.key);
        let previous = self.objects.lock().unwrap().insert(
            object.key.clone(),
            StoredBody {
                body: object.body,
                content_type: object.content_type,
                field_name: object.field_name,
            },
        );
        assert!(previous.is_none(), "storage key reused: {}", object.key);

        Ok(StoredObject {
            key: object.key,
            url,
        })
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }
}

/// Which insert the fake database should reject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbFailure {
    None,
    /// Every query fails, as with an unreachable server
    Unreachable,
    /// Text inserts succeed, image inserts fail
    ImageInsert,
}

/// In-memory `text` / `image` tables
pub struct MemoryPostRepository {
    texts: Mutex<Vec<TextRecord>>,
    images: Mutex<Vec<ImageRecord>>,
    next_id: AtomicU64,
    failure: Mutex<DbFailure>,
}

impl Default for MemoryPostRepository {
    fn default() -> Self {
        Self::with_failure(DbFailure::None)
    }
}

impl MemoryPostRepository {
    pub fn with_failure(failure: DbFailure) -> Self {
        Self {
            texts: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            failure: Mutex::new(failure),
        }
    }

    pub fn set_failure(&self, failure: DbFailure) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn texts(&self) -> Vec<TextRecord> {
        self.texts.lock().unwrap().clone()
    }

    pub fn images(&self) -> Vec<ImageRecord> {
        self.images.lock().unwrap().clone()
    }

    fn failure(&self) -> DbFailure {
        *self.failure.lock().unwrap()
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn insert_text(&self, content: &str) -> upload_service::Result<u64> {
        if self.failure() == DbFailure::Unreachable {
            return Err(AppError::Database(
                "pool timed out while waiting for an open connection".to_string(),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(TextRecord {
            id,
            content: content.to_string(),
        });
        Ok(id)
    }

    async fn insert_image(&self, image: &ImageRecord) -> upload_service::Result<()> {
        match self.failure() {
            DbFailure::None => {}
            DbFailure::Unreachable | DbFailure::ImageInsert => {
                return Err(AppError::Database(
                    "Cannot add or update a child row: a foreign key constraint fails".to_string(),
                ));
            }
        }

        let exists = self.texts.lock().unwrap().iter().any(|t| t.id == image.post_id);
        if !exists {
            return Err(AppError::Database(format!(
                "no text row with id {}",
                image.post_id
            )));
        }

        self.images.lock().unwrap().push(image.clone());
        Ok(())
    }

    async fn ping(&self) -> upload_service::Result<()> {
        match self.failure() {
            DbFailure::Unreachable => Err(AppError::Database("connection refused".to_string())),
            _ => Ok(()),
        }
    }
}

pub struct TestContext {
    pub storage: Arc<MemoryStorage>,
    pub posts: Arc<MemoryPostRepository>,
}

impl TestContext {
    pub fn new(storage: MemoryStorage, posts: MemoryPostRepository) -> Self {
        Self {
            storage: Arc::new(storage),
            posts: Arc::new(posts),
        }
    }

    pub fn healthy() -> Self {
        Self::new(MemoryStorage::default(), MemoryPostRepository::default())
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.storage.clone(), self.posts.clone())
    }
}

/// One part of a hand-built multipart body
pub enum Part<'a> {
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
    /// Form field without a filename whose body need not be valid UTF-8
    RawText {
        name: &'a str,
        value: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::RawText { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value);
            }
        }
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend((0u8..=255).cycle().take(4096));
    data
}

pub fn image_part(data: &[u8]) -> Part<'_> {
    Part::File {
        name: "image",
        file_name: "photo.png",
        content_type: "image/png",
        data,
    }
}

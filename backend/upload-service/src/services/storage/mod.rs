/// Object storage for uploaded images
///
/// Handlers only see [`ObjectStorage`]; the S3 client lives behind it so
/// tests can swap in an in-memory store.
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod s3;

pub use s3::S3Storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 auth failed (403): check AWS credentials")]
    AccessDenied,

    #[error("S3 bucket not found: {0}")]
    BucketNotFound(String),

    #[error("S3 upload failed: {0}")]
    Upload(String),

    #[error("S3 unreachable: {0}")]
    Unavailable(String),
}

/// Location of an object after a successful put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Key actually written
    pub key: String,
    /// Publicly resolvable URL of the object
    pub url: String,
}

/// Metadata attached to every stored object
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    /// Multipart field the bytes came from
    pub field_name: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload the object and wait until the store acknowledges it
    async fn put_object(&self, object: PutObject) -> Result<StoredObject, StorageError>;

    /// Check that the bucket is reachable with the configured credentials
    async fn health_check(&self) -> Result<(), StorageError>;
}

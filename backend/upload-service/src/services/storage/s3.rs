/// S3 object storage
///
/// Uploads image bytes with PutObject and derives public URLs from the
/// configured bucket, region or endpoint.
use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, error, info};

use super::{ObjectStorage, PutObject, StorageError, StoredObject};
use crate::config::S3Config;

pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    pub fn new(client: Client, config: &S3Config) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url(),
        }
    }

    /// Build the S3 client once at startup and wrap it
    pub async fn from_config(config: &S3Config) -> Self {
        let client = build_client(config).await;
        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "S3 storage client initialized"
        );
        Self::new(client, config)
    }

    /// Public URL for a key in this bucket
    pub fn object_url(&self, key: &str) -> String {
        object_url(&self.public_base_url, key)
    }
}

/// Join a base URL and an object key
pub fn object_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

/// Initialize AWS S3 client with credentials from config
///
/// Explicit access keys win; otherwise the default credential chain applies.
async fn build_client(config: &S3Config) -> Client {
    use aws_sdk_s3::config::Region;

    let mut aws_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let (Some(access_key_id), Some(secret_access_key)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        use aws_sdk_s3::config::Credentials;

        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "upload_service_s3",
        );

        aws_config_builder = aws_config_builder.credentials_provider(credentials);
    }

    if let Some(endpoint) = &config.endpoint {
        aws_config_builder = aws_config_builder.endpoint_url(endpoint);
    }

    let sdk_config = aws_config_builder.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.force_path_style)
        .build();

    Client::from_conf(s3_config)
}

/// Map an SDK failure onto [`StorageError`] from its error code and HTTP status
fn classify_error<E>(bucket: &str, err: &SdkError<E, HttpResponse>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let detail = DisplayErrorContext(err).to_string();
    let code = err.as_service_error().and_then(|e| e.code());
    let status = err.raw_response().map(|resp| resp.status().as_u16());
    let transport = matches!(
        err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    );

    classify(bucket, code, status, transport, detail)
}

fn classify(
    bucket: &str,
    code: Option<&str>,
    status: Option<u16>,
    transport: bool,
    detail: String,
) -> StorageError {
    match (code, status) {
        (Some("AccessDenied"), _) | (_, Some(403)) => StorageError::AccessDenied,
        // HeadBucket carries no body, so a missing bucket is only a bare 404
        (Some("NoSuchBucket" | "NotFound"), _) | (_, Some(404)) => {
            StorageError::BucketNotFound(bucket.to_string())
        }
        _ if transport => StorageError::Unavailable(detail),
        _ => StorageError::Upload(detail),
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(&self, object: PutObject) -> Result<StoredObject, StorageError> {
        let size = object.body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object.key)
            .body(ByteStream::from(object.body))
            .content_type(&object.content_type)
            .metadata("fieldname", &object.field_name)
            .send()
            .await
            .map_err(|e| {
                error!(
                    bucket = %self.bucket,
                    key = %object.key,
                    error = %DisplayErrorContext(&e),
                    "S3 put_object failed"
                );
                classify_error(&self.bucket, &e)
            })?;

        debug!(bucket = %self.bucket, key = %object.key, size, "S3 object stored");

        Ok(StoredObject {
            url: self.object_url(&object.key),
            key: object.key,
        })
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                error!(bucket = %self.bucket, error = %DisplayErrorContext(&e), "S3 health check failed");
                match classify_error(&self.bucket, &e) {
                    StorageError::Upload(detail) => StorageError::Unavailable(detail),
                    other => other,
                }
            })?;

        Ok(())
    }
}

/// Upload handlers - HTTP endpoints for post uploads
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;

use crate::error::{AppError, ErrorResponse, Result};
use crate::metrics::{self, OUTCOME_CREATED};
use crate::models::{
    UploadForm, UploadRequestSchema, UploadResponse, UploadedFile, DEFAULT_CONTENT_TYPE,
};
use crate::services::{UploadService, IMAGE_FIELD, TEXT_FIELD};
use crate::AppState;

/// Store an image and its text as a new post
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "uploads",
    request_body(content = UploadRequestSchema, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored and post recorded", body = UploadResponse),
        (status = 400, description = "Missing field or malformed multipart body", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse),
    )
)]
pub async fn upload_post(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse> {
    tracing::debug!("upload request received");

    let result = async {
        let form = read_upload_form(payload).await?;
        UploadService::new(state.storage.clone(), state.posts.clone())
            .create_post(form)
            .await
    }
    .await;

    match result {
        Ok(record) => {
            metrics::record_upload(OUTCOME_CREATED);
            Ok(HttpResponse::Created().json(UploadResponse::from(record)))
        }
        Err(err) => {
            metrics::record_upload(err.code());
            if err.is_client_error() {
                tracing::warn!(code = err.code(), "upload rejected: {}", err);
            } else {
                tracing::error!(code = err.code(), "upload failed: {}", err);
            }
            Err(err)
        }
    }
}

/// Read the whole multipart body into an [`UploadForm`]
///
/// The first `image` and the first `text` part are kept; repeated and
/// unknown parts are drained and dropped.
pub async fn read_upload_form(mut payload: Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::InvalidMultipart(format!("Multipart error: {}", e)))?;

        let name = field.name().map(str::to_owned);

        match name.as_deref() {
            Some(IMAGE_FIELD) if form.image.is_none() => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_owned);
                let content_type = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
                let data = read_field(&mut field).await?;

                form.image = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some(TEXT_FIELD) if form.text.is_none() => {
                let data = read_field(&mut field).await?;
                form.text = Some(String::from_utf8_lossy(&data).into_owned());
            }
            _ => {
                read_field(&mut field).await?;
            }
        }
    }

    Ok(form)
}

async fn read_field(field: &mut Field) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let data =
            chunk.map_err(|e| AppError::InvalidMultipart(format!("Field read error: {}", e)))?;
        buf.extend_from_slice(&data);
    }
    Ok(buf.freeze())
}

use std::{ffi::OsStr, path::Path};

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use chrono::Utc;

use crate::{
    AppState,
    error::{AppError, Result},
    models::UploadResponse,
    services::UploadOptions,
};

pub const IMAGE_FIELD: &str = "image";
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;
pub const UPLOAD_FOLDER: &str = "uploads";

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "webp"];
const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

struct ImageFile {
    field_name: String,
    bytes: Vec<u8>,
}

pub async fn upload_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let image = match multipart {
        Ok(mut multipart) => read_image(&mut multipart).await?,
        Err(rejection) => {
            tracing::debug!("Upload without multipart body: {}", rejection);
            None
        }
    }
    .ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;

    let options = UploadOptions {
        folder: UPLOAD_FOLDER.to_string(),
        public_id: format!("{}-{}", image.field_name, Utc::now().timestamp_millis()),
        resource_type: "image".to_string(),
        overwrite: false,
    };

    let asset = state
        .media
        .upload(image.bytes, options)
        .await
        .map_err(|e| AppError::UploadFailed(e.to_string()))?;

    tracing::info!("Uploaded image {}", asset.public_id);

    Ok(Json(UploadResponse {
        message: "Image uploaded successfully".to_string(),
        image: asset.secure_url,
        public_id: asset.public_id,
        raw: asset.raw,
    }))
}

/// Reads the single image part, enforcing type and size before buffering.
async fn read_image(multipart: &mut Multipart) -> Result<Option<ImageFile>> {
    let mut image = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        // text parts are not files
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name != IMAGE_FIELD || image.is_some() {
            return Err(AppError::BadRequest("Unexpected field".to_string()));
        }

        if !is_allowed_image(&file_name, field.content_type()) {
            return Err(AppError::BadRequest("Images only".to_string()));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > MAX_IMAGE_SIZE {
                return Err(AppError::BadRequest("File too large".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }

        image = Some(ImageFile { field_name, bytes });
    }

    Ok(image)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

/// Both the extension and the declared MIME type must be on the allow-list.
fn is_allowed_image(file_name: &str, content_type: Option<&str>) -> bool {
    let extension = Path::new(file_name)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    let extension_ok = extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext));
    let mime_ok = content_type
        .map(str::to_ascii_lowercase)
        .is_some_and(|mime| ALLOWED_MIME_TYPES.contains(&mime.as_str()));

    extension_ok && mime_ok
}

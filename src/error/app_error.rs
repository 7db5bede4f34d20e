use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::error::{DatabaseError, ErrorKind};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(sqlx::Error),
    ConfigError(String),
    InternalError(String),
    NotFound(String),
    BadRequest(String),
    DuplicateKey(String),
    UploadFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::DuplicateKey(field) => write!(f, "Duplicate key: {}", field),
            AppError::UploadFailed(msg) => write!(f, "Upload failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return AppError::DatabaseError(err);
        };

        match db_err.kind() {
            ErrorKind::UniqueViolation => {
                AppError::DuplicateKey(duplicate_field(db_err.constraint()).to_string())
            }
            ErrorKind::ForeignKeyViolation => {
                AppError::BadRequest("category does not exist".to_string())
            }
            _ => AppError::DatabaseError(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body ({}): {}", rejection.status(), rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

/// Column behind a `<table>_<column>_key` unique constraint.
fn duplicate_field(constraint: Option<&str>) -> &str {
    constraint
        .and_then(|c| c.strip_suffix("_key"))
        .and_then(|c| c.split_once('_'))
        .map(|(_, field)| field)
        .filter(|field| !field.is_empty())
        .unwrap_or("value")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DatabaseError(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::ConfigError(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                )
            }
            AppError::InternalError(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DuplicateKey(field) => {
                (StatusCode::CONFLICT, format!("{} already exists", field))
            }
            AppError::UploadFailed(msg) => {
                tracing::error!("Cloudinary upload error: {}", msg);
                let body = Json(json!({
                    "message": "Cloudinary upload failed",
                    "error": msg,
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        let body = Json(json!({
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

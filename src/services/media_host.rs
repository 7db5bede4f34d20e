use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

/// Where and how an upload is stored on the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub folder: String,
    pub public_id: String,
    pub resource_type: String,
    pub overwrite: bool,
}

/// A stored asset as reported by the media host.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub secure_url: String,
    pub public_id: String,
    pub raw: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum MediaHostError {
    #[error("Must supply {0}")]
    MissingCredential(&'static str),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    InvalidResponse(String),
}

/// Remote image storage.
///
/// One call is one attempt: implementations do not retry.
#[automock]
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(
        &self,
        data: Vec<u8>,
        options: UploadOptions,
    ) -> Result<UploadedAsset, MediaHostError>;
}

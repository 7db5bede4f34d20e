use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub image: String,
    pub public_id: String,
    pub raw: serde_json::Value,
}

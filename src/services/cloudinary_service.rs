use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use sha1::{Digest, Sha1};

use crate::{
    config::CloudinaryConfig,
    error::{AppError, Result},
    services::media_host::{MediaHost, MediaHostError, UploadOptions, UploadedAsset},
};

/// Cloudinary signature: SHA-1 of the sorted `key=value` pairs joined by `&`,
/// followed by the API secret. Empty values are left out.
pub fn generate_signature(api_secret: &str, params: &BTreeMap<&str, String>) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            "Cloudinary client initialized with {}s timeout",
            config.timeout.as_secs()
        );

        Ok(Self { http, config })
    }

    fn upload_url(&self, cloud_name: &str, resource_type: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.config.api_base.trim_end_matches('/'),
            cloud_name,
            resource_type
        )
    }
}

fn credential<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> std::result::Result<&'a str, MediaHostError> {
    value
        .as_deref()
        .ok_or(MediaHostError::MissingCredential(name))
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(
        &self,
        data: Vec<u8>,
        options: UploadOptions,
    ) -> std::result::Result<UploadedAsset, MediaHostError> {
        let cloud_name = credential(&self.config.cloud_name, "cloud_name")?;
        let api_key = credential(&self.config.api_key, "api_key")?;
        let api_secret = credential(&self.config.api_secret, "api_secret")?;

        let mut params = BTreeMap::new();
        params.insert("folder", options.folder.clone());
        params.insert("overwrite", options.overwrite.to_string());
        params.insert("public_id", options.public_id.clone());
        params.insert("timestamp", Utc::now().timestamp().to_string());

        let signature = generate_signature(api_secret, &params);

        let mut form = Form::new()
            .part(
                "file",
                Part::bytes(data).file_name(options.public_id.clone()),
            )
            .text("api_key", api_key.to_string())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = self.upload_url(cloud_name, &options.resource_type);
        tracing::debug!("Uploading {} to {}", options.public_id, url);

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body: Option<serde_json::Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|b| b.pointer("/error/message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown Cloudinary error")
                        .to_string()
                });
            return Err(MediaHostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let raw = body.ok_or_else(|| {
            MediaHostError::InvalidResponse("Cloudinary response is not valid JSON".to_string())
        })?;

        let field = |name: &str| {
            raw.get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    MediaHostError::InvalidResponse(format!(
                        "Cloudinary response missing {}",
                        name
                    ))
                })
        };
        let secure_url = field("secure_url")?;
        let public_id = field("public_id")?;

        Ok(UploadedAsset {
            secure_url,
            public_id,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use axum::{
        Json, Router,
        extract::{Multipart, Path},
        http::StatusCode,
        routing::post,
    };
    use serde_json::{Value, json};
    use testresult::TestResult;

    use super::*;

    const SECRET: &str = "test-secret";

    fn config(api_base: String) -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: Some("demo".to_string()),
            api_key: Some("123456".to_string()),
            api_secret: Some(SECRET.to_string()),
            api_base,
            timeout: Duration::from_secs(5),
        }
    }

    fn options() -> UploadOptions {
        UploadOptions {
            folder: "uploads".to_string(),
            public_id: "image-1700000000000".to_string(),
            resource_type: "image".to_string(),
            overwrite: false,
        }
    }

    async fn fake_upload(
        Path(cloud): Path<String>,
        mut multipart: Multipart,
    ) -> (StatusCode, Json<Value>) {
        let mut fields = HashMap::new();
        let mut file_len = 0;
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                file_len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            } else {
                fields.insert(name, field.text().await.unwrap_or_default());
            }
        }

        let signed: BTreeMap<&str, String> = ["folder", "overwrite", "public_id", "timestamp"]
            .into_iter()
            .map(|k| (k, fields.get(k).cloned().unwrap_or_default()))
            .collect();
        if fields.get("signature") != Some(&generate_signature(SECRET, &signed)) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "message": "Invalid Signature" } })),
            );
        }

        let public_id = format!("{}/{}", fields["folder"], fields["public_id"]);
        (
            StatusCode::OK,
            Json(json!({
                "public_id": public_id,
                "secure_url": format!("https://res.cloudinary.com/{}/image/upload/{}.png", cloud, public_id),
                "bytes": file_len,
                "format": "png",
            })),
        )
    }

    async fn spawn_fake_cloudinary() -> std::io::Result<String> {
        let app = Router::new().route("/v1_1/{cloud}/image/upload", post(fake_upload));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(format!("http://{}", addr))
    }

    #[test]
    fn signature_matches_documented_example() {
        let mut params = BTreeMap::new();
        params.insert("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string());
        params.insert("public_id", "sample_image".to_string());
        params.insert("timestamp", "1315060510".to_string());

        assert_eq!(
            generate_signature("abcd", &params),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn signature_skips_empty_values() {
        let mut with_empty = BTreeMap::new();
        with_empty.insert("folder", String::new());
        with_empty.insert("timestamp", "1700000000".to_string());
        let mut without = BTreeMap::new();
        without.insert("timestamp", "1700000000".to_string());

        assert_eq!(
            generate_signature(SECRET, &with_empty),
            generate_signature(SECRET, &without)
        );
    }

    #[test]
    fn upload_url_ignores_trailing_slash() -> TestResult {
        let client = CloudinaryClient::new(config("https://api.cloudinary.com/".to_string()))?;

        assert_eq!(
            client.upload_url("demo", "image"),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() -> TestResult {
        let client = CloudinaryClient::new(CloudinaryConfig {
            api_key: None,
            ..config("http://127.0.0.1:9".to_string())
        })?;

        let err = client
            .upload(b"png".to_vec(), options())
            .await
            .expect_err("upload without api key should fail");

        assert!(matches!(err, MediaHostError::MissingCredential("api_key")));
        assert_eq!(err.to_string(), "Must supply api_key");
        Ok(())
    }

    #[tokio::test]
    async fn signed_upload_returns_secure_url() -> TestResult {
        let base = spawn_fake_cloudinary().await?;
        let client = CloudinaryClient::new(config(base))?;

        let asset = client.upload(vec![0u8; 2048], options()).await?;

        assert_eq!(asset.public_id, "uploads/image-1700000000000");
        assert_eq!(
            asset.secure_url,
            "https://res.cloudinary.com/demo/image/upload/uploads/image-1700000000000.png"
        );
        assert_eq!(asset.raw["bytes"], 2048);
        Ok(())
    }

    #[tokio::test]
    async fn remote_rejection_relays_error_message() -> TestResult {
        let base = spawn_fake_cloudinary().await?;
        let client = CloudinaryClient::new(CloudinaryConfig {
            api_secret: Some("wrong-secret".to_string()),
            ..config(base)
        })?;

        let err = client
            .upload(vec![1, 2, 3], options())
            .await
            .expect_err("bad signature should be rejected");

        assert!(matches!(err, MediaHostError::Rejected { status: 401, .. }));
        assert_eq!(err.to_string(), "Invalid Signature");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() -> TestResult {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);
        let client = CloudinaryClient::new(config(format!("http://{}", addr)))?;

        let err = client
            .upload(vec![1, 2, 3], options())
            .await
            .expect_err("closed port should fail");

        assert!(matches!(err, MediaHostError::Transport(_)));
        Ok(())
    }
}

use std::{env, time::Duration};

use crate::error::{AppError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and endpoint for the Cloudinary upload API.
///
/// Credentials are optional here: a missing value does not stop the server
/// from starting, it makes every upload fail at transfer time instead.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl CloudinaryConfig {
    pub fn from_env() -> Result<Self> {
        let timeout_secs = env::var("CLOUDINARY_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| {
                AppError::ConfigError("Invalid CLOUDINARY_TIMEOUT_SECS value".to_string())
            })?;

        let config = Self {
            cloud_name: non_empty_var("CLOUDINARY_CLOUD_NAME"),
            api_key: non_empty_var("CLOUDINARY_API_KEY"),
            api_secret: non_empty_var("CLOUDINARY_API_SECRET"),
            api_base: env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        let missing = config.missing_credentials();
        if !missing.is_empty() {
            tracing::warn!(
                "Cloudinary credentials not set ({}); image uploads will fail",
                missing.join(", ")
            );
        }

        Ok(config)
    }

    /// Names of the credential variables that are not configured.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("CLOUDINARY_CLOUD_NAME", &self.cloud_name),
            ("CLOUDINARY_API_KEY", &self.api_key),
            ("CLOUDINARY_API_SECRET", &self.api_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

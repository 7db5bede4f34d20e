use crate::error::{AppError, Result};
use std::{env, str::FromStr};

use super::CloudinaryConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let frontend = env::var("FRONTEND_URL").unwrap_or_else(|_| {
            tracing::warn!("FRONTEND_URL not set, allowing {}", DEFAULT_FRONTEND_URL);
            DEFAULT_FRONTEND_URL.to_string()
        });

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", 5000)?,
                max_body_size: parse_var("MAX_BODY_SIZE", 10 * 1024 * 1024)?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")
                    .map_err(|_| AppError::ConfigError("DB_URL must be set".to_string()))?,
                max_connections: parse_var("DB_MAX_CONNECTIONS", 20)?,
                acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            },
            cors: CorsConfig {
                allowed_origins: split_origins(&frontend),
            },
            cloudinary: CloudinaryConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid {} value: {:?}", key, raw)))
}

/// Comma-separated origin list with blanks dropped.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

mod app_config;
mod cloudinary_config;

pub use app_config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig};
pub use cloudinary_config::*;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use crate::{
    config::AppConfig,
    database,
    error::{AppError, Result},
    routes,
    services::{CloudinaryClient, MediaHost},
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub media: Arc<dyn MediaHost>,
    pub media_configured: bool,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let media = CloudinaryClient::new(config.cloudinary.clone())?;
    let state = AppState {
        db: pool,
        media: Arc::new(media),
        media_configured: config.cloudinary.missing_credentials().is_empty(),
    };

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins);

    Ok(router(state, config.server.max_body_size).layer(cors))
}

pub fn router(state: AppState, max_body_size: usize) -> Router {
    routes::create_router()
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}

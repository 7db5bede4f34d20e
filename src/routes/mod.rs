mod categories;
mod health;
mod products;
mod upload;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

// `{key}` is a slug for GET and a numeric id for PUT.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/{key}",
            get(categories::get_category).put(categories::update_category),
        )
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{key}",
            get(products::get_product).put(products::update_product),
        )
        .route("/api/upload", post(upload::upload_image))
}

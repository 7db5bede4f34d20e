use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{NewProduct, Product, ProductChanges, ProductRequest},
    queries::products_queries,
};

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = products_queries::get_all(&state.db).await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = products_queries::find_by_slug(&state.db, &slug)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;

    let new_product = NewProduct::try_from(payload)?;

    let product = products_queries::create_product(&state.db, &new_product).await?;
    tracing::info!("Created product {} ({})", product.id, product.slug);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<Product>> {
    let Json(payload) = payload?;

    let current = products_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    let changes = ProductChanges::between(&current, payload)?;
    if changes.is_empty() {
        return Ok(Json(current));
    }

    let product = products_queries::update_product(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    Ok(Json(product))
}

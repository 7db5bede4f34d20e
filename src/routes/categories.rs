use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Category, CategoryChanges, CreateCategoryRequest, NewCategory, UpdateCategoryRequest},
    queries::category_queries,
};

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = category_queries::get_all(&state.db).await?;

    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>> {
    let category = category_queries::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(category))
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>)> {
    let Json(payload) = payload?;

    let new_category = NewCategory::try_from(payload)?;

    let category = category_queries::create_category(&state.db, &new_category).await?;
    tracing::info!("Created category {} ({})", category.id, category.slug);

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<Category>> {
    let Json(payload) = payload?;

    let current = category_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;

    let changes = CategoryChanges::between(&current, payload)?;
    if changes.is_empty() {
        return Ok(Json(current));
    }

    let category = category_queries::update_category(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;

    Ok(Json(category))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use testresult::TestResult;
    use tower::ServiceExt;

    use super::*;
    use crate::{services::media_host::MockMediaHost, test_helpers::test_app};

    async fn post_category(payload: Value) -> TestResult<(StatusCode, Value)> {
        let request = Request::builder()
            .method("POST")
            .uri("/api/categories")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = test_app(MockMediaHost::new()).oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    #[tokio::test]
    async fn blank_name_fails_before_storage() -> TestResult {
        let (status, body) = post_category(json!({ "name": "   " })).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "name is required" }));
        Ok(())
    }

    #[tokio::test]
    async fn overlong_name_is_rejected() -> TestResult {
        let (status, body) = post_category(json!({ "name": "x".repeat(33) })).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name must be at most 32 characters");
        Ok(())
    }

    #[tokio::test]
    async fn mistyped_name_gets_json_error_body() -> TestResult {
        let (status, body) = post_category(json!({ "name": 5 })).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().is_some_and(|m| m.contains("name")));
        Ok(())
    }

    #[tokio::test]
    async fn body_without_json_content_type_gets_json_error_body() -> TestResult {
        let request = Request::builder()
            .method("POST")
            .uri("/api/categories")
            .body(Body::from(r#"{"name":"Laptops"}"#))?;

        let response = test_app(MockMediaHost::new()).oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await?.to_bytes();
        let body: Value = serde_json::from_slice(&bytes)?;
        assert!(body["message"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn client_supplied_slug_is_not_accepted_as_a_name() -> TestResult {
        let (status, body) = post_category(json!({ "slug": "custom-slug" })).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name is required");
        Ok(())
    }
}

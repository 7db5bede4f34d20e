use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{AppState, database, error::Result};

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse> {
    database::check_health(&state.db).await?;

    let media = if state.media_configured {
        "configured"
    } else {
        "missing credentials"
    };

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "database": "connected",
            "media": media,
        })),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use testresult::TestResult;
    use tower::ServiceExt;

    use super::*;
    use crate::{services::media_host::MockMediaHost, test_helpers::test_app};

    #[tokio::test]
    async fn liveness_does_not_touch_dependencies() -> TestResult {
        let app = test_app(MockMediaHost::new());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await?.to_bytes();
        assert_eq!(
            serde_json::from_slice::<Value>(&bytes)?,
            json!({ "status": "ok" })
        );
        Ok(())
    }
}

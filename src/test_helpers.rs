use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::{AppState, app, services::media_host::MockMediaHost};

pub const TEST_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Full router over a pool that never connects; handlers that reach the
/// database will fail, everything else runs as in production.
pub fn test_app(media: MockMediaHost) -> Router {
    let db = PgPool::connect_lazy("postgres://postgres@localhost/proshop_test")
        .expect("lazy pool should not connect");
    let state = AppState {
        db,
        media: Arc::new(media),
        media_configured: true,
    };
    app::router(state, TEST_BODY_LIMIT)
}

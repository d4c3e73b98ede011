use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::{self as axum_middleware, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::db::services::BlobStore;
use crate::web::routes::*;

pub mod error;
pub mod models;
pub mod routes;

/// Shared handler state. Handlers keep nothing between requests; all state
/// lives behind `store`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
}

async fn not_found_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

/// Answers every OPTIONS request with an empty 200. Real CORS preflights are
/// already handled by the outer `CorsLayer`; this covers the rest.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

pub fn create_axum_router(store: Arc<dyn BlobStore>) -> Router {
    let app_state = Arc::new(AppState { store });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .merge(tile_routes::create_tiles_router())
        .merge(color_meaning_routes::create_color_meanings_router())
        .merge(migration_routes::create_migration_router())
        .fallback(not_found_handler)
        .with_state(app_state)
        .layer(axum_middleware::from_fn(answer_options))
        .layer(cors)
}

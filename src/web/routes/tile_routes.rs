use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::parse_json_body;
use crate::db::services;
use crate::models::Tile;
use crate::web::error::{store_failure, AppError};
use crate::web::models::{TilesMutationResponse, TilesResponse};
use crate::web::AppState;

// --- Route Handlers ---

async fn get_tiles_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<TilesResponse>, AppError> {
    let tiles = services::get_tiles(app_state.store.as_ref())
        .await
        .map_err(store_failure("Failed to get tiles"))?;
    Ok(Json(TilesResponse { tiles }))
}

async fn replace_tiles_handler(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TilesMutationResponse>, AppError> {
    let payload = parse_json_body(&body)?;
    let tiles = match payload.get("tiles") {
        Some(tiles @ Value::Array(_)) => serde_json::from_value::<Vec<Tile>>(tiles.clone())
            .map_err(|e| AppError::InvalidInput(format!("Invalid tiles format: {e}")))?,
        _ => return Err(AppError::InvalidInput("Invalid tiles format".to_string())),
    };

    services::replace_tiles(app_state.store.as_ref(), &tiles)
        .await
        .map_err(store_failure("Failed to update tiles"))?;
    info!(count = tiles.len(), "Tile collection replaced");

    Ok(Json(TilesMutationResponse { success: true, tiles }))
}

async fn upsert_tile_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tile_id): Path<String>,
    body: Bytes,
) -> Result<Json<TilesMutationResponse>, AppError> {
    let mut payload = match parse_json_body(&body)? {
        Value::Object(map) => map,
        _ => return Err(AppError::InvalidInput("Tile body must be an object".to_string())),
    };
    // The path id always wins over any id in the body.
    payload.insert("id".to_string(), Value::String(tile_id.clone()));
    let tile: Tile = serde_json::from_value(Value::Object(payload))
        .map_err(|e| AppError::InvalidInput(format!("Invalid tile: {e}")))?;

    let tiles = services::upsert_tile(app_state.store.as_ref(), tile)
        .await
        .map_err(store_failure("Failed to update tile"))?;
    info!(tile_id = %tile_id, "Tile upserted");

    Ok(Json(TilesMutationResponse { success: true, tiles }))
}

async fn delete_tile_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tile_id): Path<String>,
) -> Result<Json<TilesMutationResponse>, AppError> {
    let remaining = services::delete_tile(app_state.store.as_ref(), &tile_id)
        .await
        .map_err(store_failure("Failed to delete tile"))?
        .ok_or_else(|| AppError::NotFound("Tile not found".to_string()))?;
    info!(tile_id = %tile_id, "Tile deleted");

    Ok(Json(TilesMutationResponse {
        success: true,
        tiles: remaining,
    }))
}

// --- Router ---

pub fn create_tiles_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tiles", get(get_tiles_handler).put(replace_tiles_handler))
        .route(
            "/api/tiles/{*tile_id}",
            post(upsert_tile_handler).delete(delete_tile_handler),
        )
}

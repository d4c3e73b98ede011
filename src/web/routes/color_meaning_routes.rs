use axum::{body::Bytes, extract::State, routing::get, Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::parse_json_body;
use crate::db::services;
use crate::models::ColorMeanings;
use crate::web::error::{store_failure, AppError};
use crate::web::models::{ColorMeaningsMutationResponse, ColorMeaningsResponse};
use crate::web::AppState;

async fn get_color_meanings_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ColorMeaningsResponse>, AppError> {
    let color_meanings = services::get_color_meanings(app_state.store.as_ref())
        .await
        .map_err(store_failure("Failed to get color meanings"))?;
    Ok(Json(ColorMeaningsResponse { color_meanings }))
}

async fn replace_color_meanings_handler(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ColorMeaningsMutationResponse>, AppError> {
    let payload = parse_json_body(&body)?;
    let color_meanings: ColorMeanings = match payload.get("colorMeanings") {
        Some(value @ Value::Object(_)) => serde_json::from_value(value.clone())
            .map_err(|e| AppError::InvalidInput(format!("Invalid color meanings format: {e}")))?,
        _ => {
            return Err(AppError::InvalidInput(
                "Invalid color meanings format".to_string(),
            ));
        }
    };

    services::replace_color_meanings(app_state.store.as_ref(), &color_meanings)
        .await
        .map_err(store_failure("Failed to update color meanings"))?;
    info!(count = color_meanings.len(), "Color meanings replaced");

    Ok(Json(ColorMeaningsMutationResponse {
        success: true,
        color_meanings,
    }))
}

pub fn create_color_meanings_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/color-meanings",
        get(get_color_meanings_handler).put(replace_color_meanings_handler),
    )
}

pub mod color_meaning_routes;
pub mod migration_routes;
pub mod tile_routes;

use axum::body::Bytes;

use crate::web::error::AppError;

/// Parses a request body as JSON, reporting malformed input as a 400.
pub(crate) fn parse_json_body(body: &Bytes) -> Result<serde_json::Value, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("Request body is not valid JSON: {e}")))
}

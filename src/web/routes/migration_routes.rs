use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::error;

use crate::db::services::{self, MigrationOutcome};
use crate::web::error::AppError;
use crate::web::models::MigrationResponse;
use crate::web::AppState;

/// POST /api/migrate
/// One-time copy of the legacy key-value tile blob into the primary store.
async fn migrate_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<MigrationResponse>, AppError> {
    let outcome = services::migrate_legacy_tiles(app_state.store.as_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Migration error");
            AppError::MigrationFailed(e.to_string())
        })?;

    let response = match outcome {
        MigrationOutcome::NoLegacyData => {
            return Err(AppError::NotFound("No data in legacy store to migrate".to_string()));
        }
        MigrationOutcome::AlreadyPopulated => MigrationResponse {
            success: true,
            message: "Primary store already has tiles; nothing was migrated".to_string(),
            migrated_tiles: 0,
        },
        MigrationOutcome::Migrated(count) => MigrationResponse {
            success: true,
            message: "Migration completed! The legacy store can now be removed".to_string(),
            migrated_tiles: count,
        },
    };
    Ok(Json(response))
}

pub fn create_migration_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/migrate", post(migrate_handler))
}

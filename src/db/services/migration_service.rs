use tracing::info;

use super::blob_service::{BlobStore, StoreError};
use super::tile_service::{replace_tiles, TILES_KEY};
use crate::models::Tile;

/// Result of a one-time copy from the legacy key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The legacy store has nothing under the tiles key.
    NoLegacyData,
    /// The primary store already holds tiles; nothing was copied.
    AlreadyPopulated,
    /// This many tiles were copied into the primary store.
    Migrated(usize),
}

/// Copies the legacy tile blob into the primary store if the primary store
/// has never been written.
pub async fn migrate_legacy_tiles(store: &dyn BlobStore) -> Result<MigrationOutcome, StoreError> {
    let Some(raw) = store.get_legacy(TILES_KEY).await? else {
        return Ok(MigrationOutcome::NoLegacyData);
    };

    if store.get(TILES_KEY).await?.is_some() {
        info!("Primary store already populated; skipping legacy migration");
        return Ok(MigrationOutcome::AlreadyPopulated);
    }

    let tiles: Vec<Tile> = serde_json::from_str(&raw)?;
    replace_tiles(store, &tiles).await?;
    info!(count = tiles.len(), "Migrated tiles from legacy store");

    Ok(MigrationOutcome::Migrated(tiles.len()))
}

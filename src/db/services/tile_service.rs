use tracing::debug;

use super::blob_service::{BlobStore, StoreError};
use crate::models::{default_tiles, Tile};

/// Logical key of the tile collection blob.
pub const TILES_KEY: &str = "tiles";

/// Retrieves the tile collection, falling back to the built-in sample tiles
/// when nothing has been stored yet.
pub async fn get_tiles(store: &dyn BlobStore) -> Result<Vec<Tile>, StoreError> {
    match store.get(TILES_KEY).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(default_tiles()),
    }
}

/// Overwrites the whole tile collection.
pub async fn replace_tiles(store: &dyn BlobStore, tiles: &[Tile]) -> Result<(), StoreError> {
    let value = serde_json::to_value(tiles)?;
    store.put(TILES_KEY, &value).await?;
    debug!(count = tiles.len(), "Replaced tile collection");
    Ok(())
}

/// Replaces the tile with the same id in place, or appends it.
pub async fn upsert_tile(store: &dyn BlobStore, tile: Tile) -> Result<Vec<Tile>, StoreError> {
    let mut tiles = get_tiles(store).await?;
    match tiles.iter_mut().find(|t| t.id == tile.id) {
        Some(existing) => *existing = tile,
        None => tiles.push(tile),
    }
    replace_tiles(store, &tiles).await?;
    Ok(tiles)
}

/// Removes a tile by id. Returns `None`, and writes nothing, when the id is absent.
pub async fn delete_tile(
    store: &dyn BlobStore,
    tile_id: &str,
) -> Result<Option<Vec<Tile>>, StoreError> {
    let tiles = get_tiles(store).await?;
    let before = tiles.len();
    let remaining: Vec<Tile> = tiles.into_iter().filter(|t| t.id != tile_id).collect();

    if remaining.len() == before {
        return Ok(None);
    }

    replace_tiles(store, &remaining).await?;
    Ok(Some(remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::services::MemoryBlobStore;

    #[tokio::test]
    async fn test_empty_store_returns_defaults() {
        let store = MemoryBlobStore::new();
        assert_eq!(get_tiles(&store).await.unwrap(), default_tiles());
    }

    #[tokio::test]
    async fn test_stored_empty_list_is_not_replaced_by_defaults() {
        let store = MemoryBlobStore::new();
        replace_tiles(&store, &[]).await.unwrap();
        assert!(get_tiles(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = MemoryBlobStore::new();
        let renamed = Tile::new("2", "Baidu", "https://baidu.com", "#2319DC");

        let tiles = upsert_tile(&store, renamed.clone()).await.unwrap();

        assert_eq!(tiles.len(), default_tiles().len());
        assert_eq!(tiles[1], renamed);
    }

    #[tokio::test]
    async fn test_upsert_appends_new_id() {
        let store = MemoryBlobStore::new();
        replace_tiles(&store, &[]).await.unwrap();

        let tiles = upsert_tile(&store, Tile::new("9", "Rust", "https://rust-lang.org", "#000000"))
            .await
            .unwrap();

        assert_eq!(tiles.len(), 1);
        assert_eq!(get_tiles(&store).await.unwrap(), tiles);
    }

    #[tokio::test]
    async fn test_delete_missing_id_leaves_store_untouched() {
        let store = MemoryBlobStore::new();
        let original = vec![Tile::new("a", "A", "https://a.com", "#111111")];
        replace_tiles(&store, &original).await.unwrap();

        assert!(delete_tile(&store, "zzz").await.unwrap().is_none());
        assert_eq!(get_tiles(&store).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_delete_removes_tile() {
        let store = MemoryBlobStore::new();
        let remaining = delete_tile(&store, "1").await.unwrap().unwrap();
        assert!(remaining.iter().all(|t| t.id != "1"));
        assert_eq!(get_tiles(&store).await.unwrap(), remaining);
    }
}

use super::blob_service::{BlobStore, StoreError};
use crate::models::ColorMeanings;

/// Logical key of the color-meaning blob.
pub const COLOR_MEANINGS_KEY: &str = "color_meanings";

/// Retrieves all color meanings; an unwritten blob reads as an empty map.
pub async fn get_color_meanings(store: &dyn BlobStore) -> Result<ColorMeanings, StoreError> {
    match store.get(COLOR_MEANINGS_KEY).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(ColorMeanings::new()),
    }
}

/// Overwrites the whole color-meaning map. Keys are stored uppercase.
pub async fn replace_color_meanings(
    store: &dyn BlobStore,
    meanings: &ColorMeanings,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(meanings)?;
    store.put(COLOR_MEANINGS_KEY, &value).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::services::MemoryBlobStore;
    use crate::models::ColorMeaning;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_blob_reads_empty() {
        let store = MemoryBlobStore::new();
        assert!(get_color_meanings(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keys_are_stored_uppercase() {
        let store = MemoryBlobStore::new();
        let mut meanings = ColorMeanings::new();
        meanings.insert(
            "#abcdef",
            ColorMeaning {
                name: "Reading".to_string(),
                emoji: "📚".to_string(),
                description: None,
            },
        );

        replace_color_meanings(&store, &meanings).await.unwrap();

        let raw = store.get(COLOR_MEANINGS_KEY).await.unwrap().unwrap();
        assert_eq!(raw, json!({"#ABCDEF": {"name": "Reading", "emoji": "📚"}}));
        assert_eq!(get_color_meanings(&store).await.unwrap(), meanings);
    }
}

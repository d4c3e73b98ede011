use serde::{Deserialize, Serialize};

use crate::models::{ColorMeanings, Tile};

#[derive(Debug, Serialize, Deserialize)]
pub struct TilesResponse {
    #[serde(default)]
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TilesMutationResponse {
    pub success: bool,
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMeaningsResponse {
    #[serde(default)]
    pub color_meanings: ColorMeanings,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMeaningsMutationResponse {
    pub success: bool,
    pub color_meanings: ColorMeanings,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResponse {
    pub success: bool,
    pub message: String,
    pub migrated_tiles: usize,
}

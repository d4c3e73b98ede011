//! Remote operations against the storage API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::dashboard::error::DashboardError;
use crate::models::{ColorMeanings, Tile};
use crate::web::models::{
    ColorMeaningsMutationResponse, ColorMeaningsResponse, TilesMutationResponse, TilesResponse,
};

/// Whole-collection load and save of both blobs.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn load_tiles(&self) -> Result<Vec<Tile>, DashboardError>;

    /// Replaces the stored collection and returns what the server persisted.
    async fn save_tiles(&self, tiles: &[Tile]) -> Result<Vec<Tile>, DashboardError>;

    async fn load_color_meanings(&self) -> Result<ColorMeanings, DashboardError>;

    async fn save_color_meanings(&self, meanings: &ColorMeanings) -> Result<ColorMeanings, DashboardError>;
}

pub struct HttpDashboardApi {
    client: Client,
    base_url: String,
}

impl HttpDashboardApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Describes a non-2xx response, preferring the server's `error` message.
async fn describe_failure(response: Response) -> String {
    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_owned));
    match message {
        Some(message) => format!("HTTP {status}: {message}"),
        None => format!("HTTP {status}"),
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn load_tiles(&self) -> Result<Vec<Tile>, DashboardError> {
        let response = self
            .client
            .get(self.endpoint("tiles"))
            .send()
            .await
            .map_err(|e| DashboardError::Load(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DashboardError::Load(describe_failure(response).await));
        }
        let body: TilesResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::Load(e.to_string()))?;
        debug!(count = body.tiles.len(), "Loaded tiles");
        Ok(body.tiles)
    }

    async fn save_tiles(&self, tiles: &[Tile]) -> Result<Vec<Tile>, DashboardError> {
        let response = self
            .client
            .put(self.endpoint("tiles"))
            .json(&serde_json::json!({ "tiles": tiles }))
            .send()
            .await
            .map_err(|e| DashboardError::Save(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DashboardError::Save(describe_failure(response).await));
        }
        let body: TilesMutationResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::Save(e.to_string()))?;
        debug!(count = body.tiles.len(), "Saved tiles");
        Ok(body.tiles)
    }

    async fn load_color_meanings(&self) -> Result<ColorMeanings, DashboardError> {
        let response = self
            .client
            .get(self.endpoint("color-meanings"))
            .send()
            .await
            .map_err(|e| DashboardError::Load(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DashboardError::Load(describe_failure(response).await));
        }
        let body: ColorMeaningsResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::Load(e.to_string()))?;
        Ok(body.color_meanings)
    }

    async fn save_color_meanings(&self, meanings: &ColorMeanings) -> Result<ColorMeanings, DashboardError> {
        let response = self
            .client
            .put(self.endpoint("color-meanings"))
            .json(&serde_json::json!({ "colorMeanings": meanings }))
            .send()
            .await
            .map_err(|e| DashboardError::Save(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DashboardError::Save(describe_failure(response).await));
        }
        let body: ColorMeaningsMutationResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::Save(e.to_string()))?;
        Ok(body.color_meanings)
    }
}

//! In-memory copy of the dashboard data and the save policies around it.
//!
//! Tiles are saved in one of two modes. A confirmed save changes local state
//! only once the server has accepted it. An optimistic save shows the new
//! state right away and, if the write fails, reloads from the server so the
//! client never keeps a state the server rejected. Failures end up in a
//! dismissible error banner and never abort the caller's session.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::dashboard::client::DashboardApi;
use crate::dashboard::error::DashboardError;
use crate::models::{ColorMeanings, Tile};

pub const LOAD_FAILED: &str = "Could not load tiles";
pub const SAVE_FAILED: &str = "Could not save tiles";
pub const REVERTED: &str = "Save failed; reverted to the previous state";
pub const MEANINGS_LOAD_FAILED: &str = "Could not load color meanings";
pub const MEANINGS_SAVE_FAILED: &str = "Could not save color meanings";

const MIRROR_FILE: &str = "color-meanings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Update local state first; reload from the server on failure.
    Optimistic,
    /// Update local state only after the server accepted the write.
    Confirmed,
}

/// A local value shown before the server confirmed it, with the value it
/// replaced. Exactly one of `commit` or `rollback` settles it.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Optimistic<T> {
    pending: T,
    previous: T,
}

impl<T> Optimistic<T> {
    pub fn new(pending: T, previous: T) -> Self {
        Self { pending, previous }
    }

    pub fn pending(&self) -> &T {
        &self.pending
    }

    /// The write went through; keep what the server returned.
    pub fn commit(self, confirmed: T) -> T {
        confirmed
    }

    /// The write failed; use the server's state when available, otherwise
    /// the value that was shown before.
    pub fn rollback(self, authoritative: Option<T>) -> T {
        authoritative.unwrap_or(self.previous)
    }
}

/// JSON copy of the color meanings on local disk.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    path: PathBuf,
}

impl LocalMirror {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(MIRROR_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when there is no mirror yet or it cannot be read.
    pub async fn read(&self) -> Option<ColorMeanings> {
        let raw = tokio::fs::read_to_string(&self.path).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(meanings) => Some(meanings),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Ignoring unreadable color meaning mirror");
                None
            }
        }
    }

    pub async fn write(&self, meanings: &ColorMeanings) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let raw = serde_json::to_string_pretty(meanings)?;
        tokio::fs::write(&self.path, raw).await
    }
}

pub struct TileStore {
    api: Arc<dyn DashboardApi>,
    mirror: LocalMirror,
    tiles: Vec<Tile>,
    meanings: ColorMeanings,
    banner: Option<String>,
}

impl TileStore {
    pub fn new(api: Arc<dyn DashboardApi>, mirror: LocalMirror) -> Self {
        Self {
            api,
            mirror,
            tiles: Vec::new(),
            meanings: ColorMeanings::new(),
            banner: None,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn color_meanings(&self) -> &ColorMeanings {
        &self.meanings
    }

    /// Current error banner text, if any.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    fn show_banner(&mut self, message: &str) {
        self.banner = Some(message.to_string());
    }

    pub async fn load_tiles(&mut self) -> Result<(), DashboardError> {
        match self.api.load_tiles().await {
            Ok(tiles) => {
                self.tiles = tiles;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error loading tiles");
                self.show_banner(LOAD_FAILED);
                Err(e)
            }
        }
    }

    pub async fn save_tiles(&mut self, tiles: Vec<Tile>, mode: SaveMode) -> Result<(), DashboardError> {
        match mode {
            SaveMode::Confirmed => self.save_confirmed(tiles).await,
            SaveMode::Optimistic => self.save_optimistic(tiles).await,
        }
    }

    async fn save_confirmed(&mut self, tiles: Vec<Tile>) -> Result<(), DashboardError> {
        match self.api.save_tiles(&tiles).await {
            Ok(persisted) => {
                info!(count = persisted.len(), "Tiles saved");
                self.tiles = persisted;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error saving tiles");
                self.show_banner(SAVE_FAILED);
                Err(e)
            }
        }
    }

    async fn save_optimistic(&mut self, tiles: Vec<Tile>) -> Result<(), DashboardError> {
        let previous = std::mem::replace(&mut self.tiles, tiles.clone());
        let update = Optimistic::new(tiles, previous);

        match self.api.save_tiles(update.pending()).await {
            Ok(persisted) => {
                info!(count = persisted.len(), "Tiles saved");
                self.tiles = update.commit(persisted);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Optimistic save failed; reloading");
                let authoritative = match self.api.load_tiles().await {
                    Ok(tiles) => Some(tiles),
                    Err(reload) => {
                        warn!(error = %reload, "Reload after failed save also failed");
                        None
                    }
                };
                self.tiles = update.rollback(authoritative);
                self.show_banner(REVERTED);
                Err(e)
            }
        }
    }

    /// Loads color meanings, falling back to the local mirror when the
    /// server cannot be reached.
    pub async fn load_color_meanings(&mut self) -> Result<(), DashboardError> {
        match self.api.load_color_meanings().await {
            Ok(meanings) => {
                self.meanings = meanings;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Loading color meanings failed; trying local mirror");
                match self.mirror.read().await {
                    Some(meanings) => {
                        self.meanings = meanings;
                        Ok(())
                    }
                    None => {
                        self.show_banner(MEANINGS_LOAD_FAILED);
                        Err(e)
                    }
                }
            }
        }
    }

    /// Saves color meanings remotely, then mirrors them to local disk.
    pub async fn save_color_meanings(&mut self, meanings: ColorMeanings) -> Result<(), DashboardError> {
        let persisted = match self.api.save_color_meanings(&meanings).await {
            Ok(persisted) => persisted,
            Err(e) => {
                error!(error = %e, "Error saving color meanings");
                self.show_banner(MEANINGS_SAVE_FAILED);
                return Err(e);
            }
        };

        if let Err(e) = self.mirror.write(&persisted).await {
            warn!(path = ?self.mirror.path(), error = %e, "Could not mirror color meanings locally");
        }
        self.meanings = persisted;
        Ok(())
    }
}

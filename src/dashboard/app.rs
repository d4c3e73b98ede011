//! The dashboard state container.
//!
//! `Dashboard` owns every piece of UI state (search term, view mode, color
//! filters, open modal, command palette) next to the [`TileStore`], and maps
//! user intents to store operations. A front end renders from its getters and
//! forwards events to its methods.

use std::sync::Arc;
use tracing::{info, warn};

use crate::dashboard::client::{DashboardApi, HttpDashboardApi};
use crate::dashboard::colors::{TileStyle, parse_custom_color, tile_style};
use crate::dashboard::config::ClientConfig;
use crate::dashboard::error::DashboardError;
use crate::dashboard::favicon::{FaviconProbe, HttpFaviconProbe, refresh_favicons};
use crate::dashboard::palette::{CommandPalette, PaletteAction, PaletteKey};
use crate::dashboard::reorder::{DropOutcome, drop_tile};
use crate::dashboard::search::{ColorFilter, TileLayout, ViewMode, arrange, color_counts};
use crate::dashboard::shortcuts::{KeyPress, ShortcutAction, handle_shortcut};
use crate::dashboard::store::{LocalMirror, SaveMode, TileStore};
use crate::dashboard::suggestion::{ColorSuggestion, suggest_colors};
use crate::dashboard::transfer::{export_document, export_file_name_today, parse_import};
use crate::models::{ColorMeaning, ColorMeanings, Tile, next_tile_id};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    None,
    AddTile,
    EditTile(String),
    ColorMeanings,
}

/// Contents of the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileDraft {
    pub name: String,
    pub url: String,
    pub color: String,
    pub darkness: u8,
    /// Empty means none.
    pub custom_icon: String,
}

impl TileDraft {
    pub fn from_tile(tile: &Tile) -> Self {
        Self {
            name: tile.name.clone(),
            url: tile.url.clone(),
            color: tile.color.clone(),
            darkness: tile.darkness(),
            custom_icon: tile.custom_icon().unwrap_or_default().to_string(),
        }
    }

    /// Trims text fields and checks the required ones and the color.
    fn validate(&self) -> Result<TileDraft, DashboardError> {
        let name = self.name.trim();
        let url = self.url.trim();
        if name.is_empty() {
            return Err(DashboardError::Validation("Name is required".to_string()));
        }
        if url.is_empty() {
            return Err(DashboardError::Validation("URL is required".to_string()));
        }
        Ok(TileDraft {
            name: name.to_string(),
            url: url.to_string(),
            color: parse_custom_color(&self.color)?,
            darkness: self.darkness.min(100),
            custom_icon: self.custom_icon.trim().to_string(),
        })
    }

    fn apply_to(self, tile: &mut Tile) {
        tile.name = self.name;
        tile.url = self.url;
        tile.color = self.color;
        tile.darkness = Some(self.darkness);
        tile.custom_icon = (!self.custom_icon.is_empty()).then_some(self.custom_icon);
    }
}

/// What an import replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub tiles: Option<usize>,
    pub color_meanings: Option<usize>,
}

pub struct Dashboard {
    store: TileStore,
    probe: Arc<dyn FaviconProbe>,
    search: String,
    view: ViewMode,
    filter: ColorFilter,
    modal: Modal,
    palette: CommandPalette,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DashboardApi>, mirror: LocalMirror, probe: Arc<dyn FaviconProbe>) -> Self {
        Self {
            store: TileStore::new(api, mirror),
            probe,
            search: String::new(),
            view: ViewMode::default(),
            filter: ColorFilter::new(),
            modal: Modal::None,
            palette: CommandPalette::new(),
        }
    }

    /// Wires the HTTP client, the local mirror and the HTTP favicon probe.
    pub fn from_config(config: &ClientConfig) -> Result<Self, DashboardError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DashboardError::Load(format!("Failed to build HTTP client: {e}")))?;
        let api = Arc::new(HttpDashboardApi::new(client.clone(), config.api_base_url.clone()));
        let probe = Arc::new(HttpFaviconProbe::new(client, config.favicon_timeout()));
        Ok(Self::new(api, LocalMirror::new(&config.data_dir), probe))
    }

    /// Initial load. Color meanings are best effort.
    pub async fn load(&mut self) -> Result<(), DashboardError> {
        self.store.load_tiles().await?;
        if let Err(e) = self.store.load_color_meanings().await {
            warn!(error = %e, "Continuing without color meanings");
        }
        Ok(())
    }

    pub async fn reload(&mut self) -> Result<(), DashboardError> {
        self.store.load_tiles().await
    }

    // --- Read side ---

    pub fn tiles(&self) -> &[Tile] {
        self.store.tiles()
    }

    pub fn color_meanings(&self) -> &ColorMeanings {
        self.store.color_meanings()
    }

    pub fn banner(&self) -> Option<&str> {
        self.store.banner()
    }

    pub fn dismiss_banner(&mut self) {
        self.store.dismiss_banner();
    }

    pub fn layout(&self) -> TileLayout<'_> {
        arrange(self.store.tiles(), &self.search, &self.filter, self.view)
    }

    pub fn visible_tiles(&self) -> Vec<&Tile> {
        self.layout().visible()
    }

    /// Filter bar entries: color, tile count and display label.
    pub fn color_filter_entries(&self) -> Vec<(String, usize, String)> {
        color_counts(self.store.tiles())
            .into_iter()
            .map(|(color, count)| {
                let label = self.store.color_meanings().label(&color);
                (color, count, label)
            })
            .collect()
    }

    pub fn style_of(&self, tile: &Tile) -> TileStyle {
        tile_style(&tile.color, tile.darkness())
    }

    pub fn suggestions(&self, url: &str, name: &str) -> Vec<ColorSuggestion> {
        suggest_colors(url, name, self.store.tiles())
    }

    // --- UI state ---

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn filter(&self) -> &ColorFilter {
        &self.filter
    }

    pub fn toggle_color(&mut self, color: &str) {
        self.filter.toggle(color);
    }

    pub fn reset_colors(&mut self) {
        self.filter.reset();
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn open_add(&mut self) {
        self.modal = Modal::AddTile;
    }

    /// Opens the edit form and returns its initial contents.
    pub fn open_edit(&mut self, id: &str) -> Result<TileDraft, DashboardError> {
        let draft = self
            .find(id)
            .map(TileDraft::from_tile)
            .ok_or_else(|| DashboardError::NotFound(format!("Tile {id}")))?;
        self.modal = Modal::EditTile(id.to_string());
        Ok(draft)
    }

    pub fn open_color_meanings(&mut self) {
        self.modal = Modal::ColorMeanings;
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::None;
    }

    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut CommandPalette {
        &mut self.palette
    }

    // --- Tile edits ---

    fn find(&self, id: &str) -> Option<&Tile> {
        self.store.tiles().iter().find(|t| t.id == id)
    }

    /// Appends a new tile and returns its id. Local state changes only once
    /// the server accepted the write.
    pub async fn add_tile(&mut self, draft: &TileDraft) -> Result<String, DashboardError> {
        let draft = draft.validate()?;
        let id = next_tile_id(self.store.tiles());
        let mut tile = Tile::new(id.clone(), "", "", "");
        draft.apply_to(&mut tile);

        let mut tiles = self.store.tiles().to_vec();
        tiles.push(tile);
        self.store.save_tiles(tiles, SaveMode::Confirmed).await?;
        info!(tile_id = %id, "Tile added");
        Ok(id)
    }

    /// Replaces the editable fields of `id`, keeping its id and cached favicon.
    pub async fn update_tile(&mut self, id: &str, draft: &TileDraft) -> Result<(), DashboardError> {
        let draft = draft.validate()?;
        let mut tiles = self.store.tiles().to_vec();
        let tile = tiles
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("Tile {id}")))?;
        draft.apply_to(tile);

        self.store.save_tiles(tiles, SaveMode::Confirmed).await?;
        info!(tile_id = %id, "Tile updated");
        Ok(())
    }

    /// Submits the add or edit form that is currently open and closes it on success.
    pub async fn submit_tile_modal(&mut self, draft: &TileDraft) -> Result<String, DashboardError> {
        let id = match self.modal.clone() {
            Modal::AddTile => self.add_tile(draft).await?,
            Modal::EditTile(id) => {
                self.update_tile(&id, draft).await?;
                id
            }
            _ => return Err(DashboardError::Validation("No tile form is open".to_string())),
        };
        self.modal = Modal::None;
        Ok(id)
    }

    /// Deletes `id` only when `confirmed`. Returns whether a delete happened.
    pub async fn delete_tile(&mut self, id: &str, confirmed: bool) -> Result<bool, DashboardError> {
        if self.find(id).is_none() {
            return Err(DashboardError::NotFound(format!("Tile {id}")));
        }
        if !confirmed {
            return Ok(false);
        }
        let tiles: Vec<Tile> = self.store.tiles().iter().filter(|t| t.id != id).cloned().collect();
        self.store.save_tiles(tiles, SaveMode::Confirmed).await?;
        info!(tile_id = %id, "Tile deleted");
        Ok(true)
    }

    /// Drag released: reorders and persists optimistically. Returns whether
    /// the order changed.
    pub async fn drag_end(&mut self, active_id: &str, over_id: Option<&str>) -> Result<bool, DashboardError> {
        match drop_tile(self.store.tiles(), active_id, over_id) {
            DropOutcome::Unchanged => Ok(false),
            DropOutcome::Reordered(tiles) => {
                self.store.save_tiles(tiles, SaveMode::Optimistic).await?;
                Ok(true)
            }
        }
    }

    // --- Keyboard ---

    /// Page-level key press. Ignored while the palette has focus.
    pub fn handle_key(&mut self, press: &KeyPress) -> ShortcutAction {
        if self.palette.is_open() {
            return ShortcutAction::None;
        }
        let action = {
            let visible = self.visible_tiles();
            handle_shortcut(press, &visible, self.view)
        };
        if action == ShortcutAction::OpenPalette {
            self.palette.open();
        }
        action
    }

    pub fn palette_key(&mut self, key: PaletteKey) -> PaletteAction {
        self.palette.handle_key(key, self.store.tiles())
    }

    // --- Color meanings ---

    pub async fn set_color_meaning(&mut self, color: &str, meaning: ColorMeaning) -> Result<(), DashboardError> {
        let color = parse_custom_color(color)?;
        if meaning.name.trim().is_empty() {
            return Err(DashboardError::Validation("Meaning name is required".to_string()));
        }
        let mut meanings = self.store.color_meanings().clone();
        meanings.insert(&color, meaning);
        self.store.save_color_meanings(meanings).await
    }

    /// Tiles keep the color; they just show the plain hex label again.
    pub async fn remove_color_meaning(&mut self, color: &str) -> Result<(), DashboardError> {
        let mut meanings = self.store.color_meanings().clone();
        if meanings.remove(color).is_none() {
            return Err(DashboardError::NotFound(format!("Color meaning {}", color.to_uppercase())));
        }
        self.store.save_color_meanings(meanings).await
    }

    // --- Backup and maintenance ---

    /// File name and contents of a backup of the current state.
    pub fn export(&self) -> Result<(String, String), DashboardError> {
        let contents = export_document(self.store.tiles(), self.store.color_meanings())?;
        Ok((export_file_name_today(), contents))
    }

    /// Validates the whole file first, then applies each present part.
    ///
    /// Tiles and color meanings are saved independently: a failed tile write
    /// does not stop the color meanings from being applied. The first failure
    /// is returned once both parts have been attempted.
    pub async fn import(&mut self, raw: &str) -> Result<ImportSummary, DashboardError> {
        let plan = parse_import(raw)?;
        let mut summary = ImportSummary::default();
        let mut first_error = None;

        if let Some(tiles) = plan.tiles {
            let count = tiles.len();
            match self.store.save_tiles(tiles, SaveMode::Confirmed).await {
                Ok(()) => summary.tiles = Some(count),
                Err(e) => first_error = Some(e),
            }
        }
        if let Some(meanings) = plan.color_meanings {
            let count = meanings.len();
            match self.store.save_color_meanings(meanings).await {
                Ok(()) => summary.color_meanings = Some(count),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => {
                warn!(?summary, error = %e, "Import partially applied");
                Err(e)
            }
            None => {
                info!(?summary, "Import applied");
                Ok(summary)
            }
        }
    }

    /// Probes favicon providers for every tile and saves the sources that
    /// worked. Returns how many tiles got a new cached favicon.
    pub async fn refresh_favicons(&mut self) -> Result<usize, DashboardError> {
        let before = self.store.tiles().to_vec();
        let refreshed = refresh_favicons(&before, self.probe.as_ref()).await;
        let changed = refreshed
            .iter()
            .zip(&before)
            .filter(|(new, old)| new.cached_favicon != old.cached_favicon)
            .count();
        self.store.save_tiles(refreshed, SaveMode::Confirmed).await?;
        Ok(changed)
    }
}

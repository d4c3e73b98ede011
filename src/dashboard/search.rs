//! Search, color filtering and per-view ordering of the tile grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dashboard::colors::hex_to_hue;
use crate::dashboard::error::DashboardError;
use crate::dashboard::pinyin::to_pinyin;
use crate::models::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Stored order; the only view that honours the color filter.
    #[default]
    Grid,
    /// Buckets by color, most populous first.
    Grouped,
    /// Sorted by hue.
    Rainbow,
}

impl ViewMode {
    /// Views where digit keys address tiles by position.
    pub fn has_shortcuts(self) -> bool {
        matches!(self, ViewMode::Grid | ViewMode::Rainbow)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewMode::Grid => "grid",
            ViewMode::Grouped => "grouped",
            ViewMode::Rainbow => "rainbow",
        };
        f.write_str(name)
    }
}

impl FromStr for ViewMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "grouped" | "group" => Ok(ViewMode::Grouped),
            "rainbow" => Ok(ViewMode::Rainbow),
            other => Err(DashboardError::Validation(format!("Unknown view mode: {other}"))),
        }
    }
}

/// The set of active filter colors, kept in the order they were toggled on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFilter {
    active: Vec<String>,
}

impl ColorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `color` if active, otherwise appends it.
    pub fn toggle(&mut self, color: &str) {
        let key = color.to_uppercase();
        match self.active.iter().position(|c| *c == key) {
            Some(pos) => {
                self.active.remove(pos);
            }
            None => self.active.push(key),
        }
    }

    /// "All": clears the set, which means no filtering.
    pub fn reset(&mut self) {
        self.active.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, color: &str) -> bool {
        let key = color.to_uppercase();
        self.active.iter().any(|c| *c == key)
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }
}

/// Case-insensitive substring match on name, transliterated name, or URL.
pub fn matches_search(tile: &Tile, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    tile.name.to_lowercase().contains(&needle)
        || to_pinyin(&tile.name).to_lowercase().contains(&needle)
        || tile.url.to_lowercase().contains(&needle)
}

/// Applies the search step, then the color filter when in grid view.
/// Stored order is preserved.
pub fn filter_tiles<'a>(
    tiles: &'a [Tile],
    term: &str,
    filter: &ColorFilter,
    view: ViewMode,
) -> Vec<&'a Tile> {
    let apply_colors = view == ViewMode::Grid && !filter.is_empty();
    tiles
        .iter()
        .filter(|tile| matches_search(tile, term))
        .filter(|tile| !apply_colors || filter.contains(&tile.color))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup<'a> {
    /// Uppercased hex color shared by every tile in the group.
    pub color: String,
    pub tiles: Vec<&'a Tile>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileLayout<'a> {
    Flat(Vec<&'a Tile>),
    Grouped(Vec<ColorGroup<'a>>),
}

impl<'a> TileLayout<'a> {
    /// Tiles in on-screen reading order.
    pub fn visible(&self) -> Vec<&'a Tile> {
        match self {
            TileLayout::Flat(tiles) => tiles.clone(),
            TileLayout::Grouped(groups) => groups
                .iter()
                .flat_map(|g| g.tiles.iter().copied())
                .collect(),
        }
    }
}

/// Buckets by uppercased color, keeping stored order inside each bucket.
/// Larger buckets come first; equal sizes keep first-appearance order.
pub fn group_by_color<'a>(tiles: &[&'a Tile]) -> Vec<ColorGroup<'a>> {
    let mut groups: Vec<ColorGroup<'a>> = Vec::new();
    for &tile in tiles {
        let key = tile.color_key();
        match groups.iter_mut().find(|g| g.color == key) {
            Some(group) => group.tiles.push(tile),
            None => groups.push(ColorGroup {
                color: key,
                tiles: vec![tile],
            }),
        }
    }
    groups.sort_by(|a, b| b.tiles.len().cmp(&a.tiles.len()));
    groups
}

/// Stable sort by ascending hue.
pub fn sort_by_hue<'a>(tiles: &[&'a Tile]) -> Vec<&'a Tile> {
    let mut keyed: Vec<(f64, &'a Tile)> = tiles.iter().map(|t| (hex_to_hue(&t.color), *t)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, t)| t).collect()
}

/// Full pipeline: search, color filter, then view-specific ordering.
pub fn arrange<'a>(
    tiles: &'a [Tile],
    term: &str,
    filter: &ColorFilter,
    view: ViewMode,
) -> TileLayout<'a> {
    let filtered = filter_tiles(tiles, term, filter, view);
    match view {
        ViewMode::Grid => TileLayout::Flat(filtered),
        ViewMode::Rainbow => TileLayout::Flat(sort_by_hue(&filtered)),
        ViewMode::Grouped => TileLayout::Grouped(group_by_color(&filtered)),
    }
}

/// Distinct uppercased colors with their tile counts, in first-appearance order.
pub fn color_counts(tiles: &[Tile]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for tile in tiles {
        let key = tile.color_key();
        match counts.iter_mut().find(|(c, _)| *c == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

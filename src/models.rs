//! Shared data models for tiles and color meanings.
//!
//! These types are the wire and persisted form used by both the storage
//! routes and the dashboard client, so field names follow the JSON shape
//! (`customIcon`, `cachedFavicon`).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single bookmark entry rendered as a colored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: String,
    pub name: String,
    pub url: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub darkness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_favicon: Option<String>,
}

impl Tile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            color: color.into(),
            darkness: None,
            custom_icon: None,
            cached_favicon: None,
        }
    }

    /// Tint percentage clamped to 0..=100; absent means 0.
    pub fn darkness(&self) -> u8 {
        self.darkness.unwrap_or(0).min(100)
    }

    /// Custom icon URL, treating an empty string as unset.
    pub fn custom_icon(&self) -> Option<&str> {
        self.custom_icon.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn cached_favicon(&self) -> Option<&str> {
        self.cached_favicon.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Color key used for filtering, grouping and meaning lookups.
    pub fn color_key(&self) -> String {
        self.color.to_uppercase()
    }
}

/// Time-based id in milliseconds, bumped until it does not collide with `existing`.
pub fn next_tile_id(existing: &[Tile]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while existing.iter().any(|t| t.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

/// Tiles served when the datastore has never been written.
pub fn default_tiles() -> Vec<Tile> {
    vec![
        Tile::new("1", "Google", "https://google.com", "#4285F4"),
        Tile::new("2", "百度", "https://baidu.com", "#2319dc"),
        Tile::new("3", "GitHub", "https://github.com", "#24292e"),
        Tile::new("4", "ChatGPT", "https://chat.openai.com", "#10A37F"),
    ]
}

/// User-defined label attached to a color value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMeaning {
    pub name: String,
    pub emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Color meanings keyed by uppercase hex. Keys are normalised on every
/// insert and when deserialising, so lookups by tile color always agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, ColorMeaning>", into = "BTreeMap<String, ColorMeaning>")]
pub struct ColorMeanings(BTreeMap<String, ColorMeaning>);

impl ColorMeanings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, color: &str) -> Option<&ColorMeaning> {
        self.0.get(&color.to_uppercase())
    }

    pub fn insert(&mut self, color: &str, meaning: ColorMeaning) -> Option<ColorMeaning> {
        self.0.insert(color.to_uppercase(), meaning)
    }

    pub fn remove(&mut self, color: &str) -> Option<ColorMeaning> {
        self.0.remove(&color.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColorMeaning)> {
        self.0.iter()
    }

    /// Label shown for a color: `"<emoji> <name>"` when a meaning exists, else the hex itself.
    pub fn label(&self, color: &str) -> String {
        match self.get(color) {
            Some(meaning) if meaning.emoji.is_empty() => meaning.name.clone(),
            Some(meaning) => format!("{} {}", meaning.emoji, meaning.name),
            None => color.to_uppercase(),
        }
    }
}

impl From<BTreeMap<String, ColorMeaning>> for ColorMeanings {
    fn from(map: BTreeMap<String, ColorMeaning>) -> Self {
        Self(
            map.into_iter()
                .map(|(color, meaning)| (color.to_uppercase(), meaning))
                .collect(),
        )
    }
}

impl From<ColorMeanings> for BTreeMap<String, ColorMeaning> {
    fn from(meanings: ColorMeanings) -> Self {
        meanings.0
    }
}

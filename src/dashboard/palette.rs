//! Keyboard-driven command palette over the tile list.

use crate::dashboard::search::matches_search;
use crate::models::Tile;

/// Number of leading positions that carry a digit shortcut.
pub const SHORTCUT_SLOTS: usize = 9;

/// Digit label for a list position: `Some("1")` through `Some("9")`.
pub fn shortcut_label(index: usize) -> Option<String> {
    (index < SHORTCUT_SLOTS).then(|| (index + 1).to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteAction {
    None,
    /// Open this URL in a new browsing context. The palette has closed.
    Open(String),
    Closed,
}

#[derive(Debug, Clone, Default)]
pub struct CommandPalette {
    open: bool,
    query: String,
    selected: usize,
    keyboard_nav: bool,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_keyboard_nav(&self) -> bool {
        self.keyboard_nav
    }

    /// Opens with an empty query.
    pub fn open(&mut self) {
        self.open = true;
        self.set_query("");
    }

    /// Escape or a click outside.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.selected = 0;
        self.keyboard_nav = false;
    }

    /// Tiles matching the palette query, in stored order. Color filters do
    /// not apply here.
    pub fn results<'a>(&self, tiles: &'a [Tile]) -> Vec<&'a Tile> {
        tiles
            .iter()
            .filter(|t| matches_search(t, &self.query))
            .collect()
    }

    pub fn handle_key(&mut self, key: PaletteKey, tiles: &[Tile]) -> PaletteAction {
        if !self.open {
            return PaletteAction::None;
        }
        let results = self.results(tiles);
        let count = results.len();

        match key {
            PaletteKey::Escape => {
                self.close();
                PaletteAction::Closed
            }
            PaletteKey::ArrowDown => {
                self.keyboard_nav = true;
                self.selected = if count == 0 || self.selected + 1 >= count {
                    0
                } else {
                    self.selected + 1
                };
                PaletteAction::None
            }
            PaletteKey::ArrowUp => {
                self.keyboard_nav = true;
                self.selected = if count == 0 {
                    0
                } else if self.selected == 0 || self.selected >= count {
                    count - 1
                } else {
                    self.selected - 1
                };
                PaletteAction::None
            }
            PaletteKey::Enter => match results.get(self.selected) {
                Some(tile) => {
                    let url = tile.url.clone();
                    self.close();
                    PaletteAction::Open(url)
                }
                None => PaletteAction::None,
            },
        }
    }

    /// Pointer over a result row. Ignored right after keyboard navigation.
    pub fn hover(&mut self, index: usize) {
        if !self.keyboard_nav {
            self.selected = index;
        }
    }

    /// Any pointer movement hands selection back to the mouse.
    pub fn mouse_moved(&mut self) {
        self.keyboard_nav = false;
    }

    /// Click on a result row.
    pub fn click(&mut self, index: usize, tiles: &[Tile]) -> PaletteAction {
        match self.results(tiles).get(index) {
            Some(tile) => {
                let url = tile.url.clone();
                self.close();
                PaletteAction::Open(url)
            }
            None => PaletteAction::None,
        }
    }
}

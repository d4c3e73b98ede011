//! Global keyboard shortcuts: Ctrl/Cmd+K and the digit keys.

use crate::dashboard::search::ViewMode;
use crate::models::Tile;

/// A key press as seen by the page-level listener.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    /// Focus is in a text input or text area.
    pub in_text_input: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn while_typing(mut self) -> Self {
        self.in_text_input = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutAction {
    None,
    OpenPalette,
    OpenTile(String),
}

/// `visible` is the on-screen order of the current view.
pub fn handle_shortcut(press: &KeyPress, visible: &[&Tile], view: ViewMode) -> ShortcutAction {
    if press.in_text_input {
        return ShortcutAction::None;
    }

    if (press.ctrl || press.meta) && press.key.eq_ignore_ascii_case("k") {
        return ShortcutAction::OpenPalette;
    }

    if press.ctrl || press.meta || press.alt || !view.has_shortcuts() {
        return ShortcutAction::None;
    }

    match press.key.as_bytes() {
        [digit @ b'1'..=b'9'] => {
            let index = usize::from(digit - b'1');
            visible
                .get(index)
                .map_or(ShortcutAction::None, |tile| ShortcutAction::OpenTile(tile.url.clone()))
        }
        _ => ShortcutAction::None,
    }
}

//! Drag-and-drop reordering.

use crate::models::Tile;

/// Removes the element at `from` and reinserts it at `to`, shifting the ones
/// in between by one. Out-of-range indices leave the list untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Outcome of releasing a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// New global order to apply and persist.
    Reordered(Vec<Tile>),
    /// Dropped on itself, outside any target, or on an unknown tile.
    Unchanged,
}

/// Resolves a drag of `active_id` released over `over_id` into a new order of
/// the full tile list. Ids are looked up in the full list so the move is
/// correct even when the visible list is filtered.
pub fn drop_tile(tiles: &[Tile], active_id: &str, over_id: Option<&str>) -> DropOutcome {
    let Some(over_id) = over_id else {
        return DropOutcome::Unchanged;
    };
    if active_id == over_id {
        return DropOutcome::Unchanged;
    }

    let from = tiles.iter().position(|t| t.id == active_id);
    let to = tiles.iter().position(|t| t.id == over_id);
    match (from, to) {
        (Some(from), Some(to)) => {
            let mut reordered = tiles.to_vec();
            array_move(&mut reordered, from, to);
            DropOutcome::Reordered(reordered)
        }
        _ => DropOutcome::Unchanged,
    }
}

//! Initial placement for newly uploaded tiles.
//!
//! New tiles are packed into a fixed three-column grid in upload order, so a
//! freshly migrated gallery is readable before anyone arranges it.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use crate::consts::{GRID_COLUMNS, PLACEMENT_GAP, PLACEMENT_TILE_HEIGHT, PLACEMENT_TILE_WIDTH};
use crate::geom::Point;

/// Ordering and geometry assigned to a tile at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub display_order: i64,
    pub z_index: i64,
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Top-left corner of grid cell `order`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid_position(order: i64) -> Point {
    let order = order.max(0);
    let row = order / GRID_COLUMNS;
    let col = order % GRID_COLUMNS;
    Point {
        x: col as f64 * (PLACEMENT_TILE_WIDTH + PLACEMENT_GAP),
        y: row as f64 * (PLACEMENT_TILE_HEIGHT + PLACEMENT_GAP),
    }
}

/// Next slot in a category given its current maxima (`None` when empty).
#[must_use]
pub fn next_slot(max_display_order: Option<i64>, max_z_index: Option<i64>) -> Slot {
    let display_order = max_display_order.map_or(0, |o| o + 1);
    let z_index = max_z_index.map_or(0, |z| z + 1);
    let pos = grid_position(display_order);
    Slot {
        display_order,
        z_index,
        position_x: pos.x,
        position_y: pos.y,
        width: PLACEMENT_TILE_WIDTH,
        height: PLACEMENT_TILE_HEIGHT,
    }
}

/// Human title from an upload file name: extension dropped, dashes to spaces.
#[must_use]
pub fn title_from_file_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    stem.replace('-', " ")
}

//! Collection coordinator: the ordered set of tiles for the active category.
//!
//! The collection owns tile state for one gallery category. Gestures report
//! partial updates through `apply_partial`; z-order actions are computed here
//! so the browser editor and the service agree on the neighbour policy.
//!
//! Z-ORDER POLICY
//! ==============
//! Tiles are ranked by `(z_index, original position)`. Bring-forward swaps
//! `z_index` with the next tile in that ranking, send-backward with the
//! previous one. When both share a `z_index` the swap would be invisible, so
//! the target moves one step past its neighbour instead.

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;

use crate::tile::{LayoutPatch, PartialTile, Tile, TileId};

/// Direction of a z-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZDirection {
    Forward,
    Backward,
}

/// The `z_index` assignments produced by one z-order action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZChange {
    /// `(tile, new z_index)` pairs, target first.
    pub updates: Vec<(TileId, i64)>,
}

/// Tiles for one gallery category, in stable original order.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    tiles: Vec<Tile>,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all tiles. The given order becomes the tie-break order.
    pub fn load(&mut self, tiles: Vec<Tile>) {
        self.tiles = tiles;
    }

    /// Append a tile, or replace the existing tile with the same id in place.
    pub fn insert(&mut self, tile: Tile) {
        if let Some(existing) = self.tiles.iter_mut().find(|t| t.id == tile.id) {
            *existing = tile;
        } else {
            self.tiles.push(tile);
        }
    }

    /// Remove a tile by id, returning it if it was present.
    pub fn remove(&mut self, id: &TileId) -> Option<Tile> {
        let idx = self.tiles.iter().position(|t| t.id == *id)?;
        Some(self.tiles.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == *id)
    }

    /// Apply a partial update to the matching tile. Returns false if absent.
    pub fn apply_partial(&mut self, id: &TileId, partial: &PartialTile) -> bool {
        let Some(tile) = self.tiles.iter_mut().find(|t| t.id == *id) else {
            return false;
        };
        tile.apply(partial);
        true
    }

    /// All tiles in stable original order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Geometry of every tile, for history entries and layout saves.
    #[must_use]
    pub fn layout(&self) -> Vec<LayoutPatch> {
        self.tiles.iter().map(|t| LayoutPatch { id: t.id, geometry: t.geometry() }).collect()
    }

    /// Put back recorded geometry. Metadata is left alone and ids no longer
    /// present are skipped.
    pub fn restore_layout(&mut self, layout: &[LayoutPatch]) {
        for patch in layout {
            if let Some(tile) = self.tiles.iter_mut().find(|t| t.id == patch.id) {
                tile.apply(&PartialTile::from(patch.geometry));
            }
        }
    }

    /// Tiles sorted for drawing: `(z_index, original order)`.
    #[must_use]
    pub fn sorted_by_z(&self) -> Vec<&Tile> {
        let mut ranked: Vec<&Tile> = self.tiles.iter().collect();
        // `sort_by_key` is stable, so equal z keep original order.
        ranked.sort_by_key(|t| t.z_index);
        ranked
    }

    /// Compute and apply a bring-forward for `id`.
    ///
    /// Returns `None` when the tile is unknown or already at the top.
    pub fn bring_forward(&mut self, id: &TileId) -> Option<ZChange> {
        self.shift(id, ZDirection::Forward)
    }

    /// Compute and apply a send-backward for `id`.
    ///
    /// Returns `None` when the tile is unknown or already at the bottom.
    pub fn send_backward(&mut self, id: &TileId) -> Option<ZChange> {
        self.shift(id, ZDirection::Backward)
    }

    /// Compute and apply a z-order change in either direction.
    pub fn shift(&mut self, id: &TileId, direction: ZDirection) -> Option<ZChange> {
        let change = plan_z_change(&self.tiles, id, direction)?;
        for (tile_id, z) in &change.updates {
            self.apply_partial(tile_id, &PartialTile::z_index(*z));
        }
        Some(change)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Plan a z-order change over `tiles` (in original order) without mutating.
///
/// Shared with the service, which reads the category from the row store and
/// persists the returned assignments.
#[must_use]
pub fn plan_z_change(tiles: &[Tile], id: &TileId, direction: ZDirection) -> Option<ZChange> {
    let mut ranked: Vec<&Tile> = tiles.iter().collect();
    ranked.sort_by_key(|t| t.z_index);

    let pos = ranked.iter().position(|t| t.id == *id)?;
    let neighbour_pos = match direction {
        ZDirection::Forward => pos.checked_add(1).filter(|p| *p < ranked.len())?,
        ZDirection::Backward => pos.checked_sub(1)?,
    };

    let target = ranked[pos];
    let neighbour = ranked[neighbour_pos];

    if target.z_index == neighbour.z_index {
        let z = match direction {
            ZDirection::Forward => neighbour.z_index + 1,
            ZDirection::Backward => neighbour.z_index - 1,
        };
        return Some(ZChange { updates: vec![(target.id, z)] });
    }

    Some(ZChange {
        updates: vec![(target.id, neighbour.z_index), (neighbour.id, target.z_index)],
    })
}

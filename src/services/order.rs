//! Z-order service: persisted bring-forward / send-backward.
//!
//! The neighbour is chosen by `editor::collection::plan_z_change` over the
//! tile's category in slot order, the same policy the browser applies
//! locally, so the saved stacking matches what the admin saw.

#[cfg(test)]
#[path = "order_test.rs"]
mod order_test;

use editor::collection::{ZChange, ZDirection, plan_z_change};
use editor::tile::Gallery;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::services::tile::{TileError, category_tiles, get_tile};
use crate::state::AppState;
use crate::store::{Row, Table};

/// Move a tile one step in the stacking order and persist every changed
/// `z_index`. Returns `None` when the tile is already at the end.
///
/// # Errors
///
/// Returns `NotFound` for an unknown tile, or a store error.
pub async fn shift_z(
    state: &AppState,
    gallery: Gallery,
    id: Uuid,
    direction: ZDirection,
) -> Result<Option<ZChange>, TileError> {
    let tile = get_tile(state, gallery, id).await?;
    let siblings = category_tiles(state, gallery, &tile.category).await?;

    let Some(change) = plan_z_change(&siblings, &id, direction) else {
        debug!(gallery = gallery.as_str(), tile_id = %id, ?direction, "z-order unchanged");
        return Ok(None);
    };

    let table = Table::for_gallery(gallery);
    for (tile_id, z) in &change.updates {
        let mut patch = Row::new();
        patch.insert("z_index".into(), Value::from(*z));
        state.rows.update(table, *tile_id, patch).await?;
    }
    info!(
        gallery = gallery.as_str(),
        category = %tile.category,
        tile_id = %id,
        ?direction,
        count = change.updates.len(),
        "z-order changed"
    );
    Ok(Some(change))
}

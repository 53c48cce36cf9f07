//! Layout service: batch geometry save.
//!
//! The editor sends the geometry of every tile it holds. Every patch is
//! validated and every id looked up before any row is written, then each
//! tile is updated in turn. A tile deleted between the lookup and its update
//! still fails that update after earlier rows were written. Saves are
//! last-write-wins; there is no version check.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use editor::tile::{Gallery, LayoutPatch};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::state::AppState;
use crate::store::{self, Row, StoreError, Table};

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid geometry for tile {0}")]
    InvalidGeometry(Uuid),
    #[error("tile not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LayoutError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl ErrorCode for LayoutError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidGeometry(_) => "E_INVALID_GEOMETRY",
            Self::NotFound(_) => "E_TILE_NOT_FOUND",
            Self::Store(e) => e.error_code(),
        }
    }
}

/// The persisted geometry columns of one patch, with invariants restored.
pub(crate) fn geometry_row(patch: &LayoutPatch) -> Row {
    let g = patch.geometry.sanitized();
    let mut row = Row::new();
    row.insert("position_x".into(), Value::from(g.position_x));
    row.insert("position_y".into(), Value::from(g.position_y));
    row.insert("width".into(), Value::from(g.width));
    row.insert("height".into(), Value::from(g.height));
    row.insert("scale".into(), Value::from(g.scale));
    row.insert("rotation".into(), Value::from(g.rotation));
    row.insert("z_index".into(), Value::from(g.z_index));
    row
}

/// Persist the geometry of every patch. Returns the number of tiles written.
///
/// # Errors
///
/// `InvalidGeometry` for the first non-finite or non-positive box, or
/// `NotFound` for the first unknown tile; in both cases nothing is written.
/// A store error otherwise.
pub async fn save_layout(state: &AppState, gallery: Gallery, patches: &[LayoutPatch]) -> Result<usize, LayoutError> {
    if let Some(bad) = patches.iter().find(|p| !p.geometry.is_valid()) {
        return Err(LayoutError::InvalidGeometry(bad.id));
    }
    let table = Table::for_gallery(gallery);
    for patch in patches {
        store::get_by_id(state.rows.as_ref(), table, patch.id).await?;
    }
    for patch in patches {
        state.rows.update(table, patch.id, geometry_row(patch)).await?;
    }
    info!(gallery = gallery.as_str(), count = patches.len(), "layout saved");
    Ok(patches.len())
}

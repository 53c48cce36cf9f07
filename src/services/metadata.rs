//! Metadata service: validated save of a tile's textual fields.
//!
//! The same `MetadataEdit` rules the panel runs in the browser are run again
//! here, so a client that skips them gets the identical field messages back.

#[cfg(test)]
#[path = "metadata_test.rs"]
mod metadata_test;

use editor::metadata::{FieldErrors, MetadataEdit};
use editor::tile::{Gallery, Tile};
use tracing::info;
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::services::tile::{TileError, get_tile};
use crate::state::AppState;
use crate::store::{StoreError, Table};

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata failed validation: {0}")]
    Invalid(FieldErrors),
    #[error("tile not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Tile(TileError),
}

impl From<StoreError> for MetadataError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Tile(TileError::Store(other)),
        }
    }
}

impl From<TileError> for MetadataError {
    fn from(err: TileError) -> Self {
        match err {
            TileError::NotFound(id) => Self::NotFound(id),
            other => Self::Tile(other),
        }
    }
}

impl ErrorCode for MetadataError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "E_INVALID_METADATA",
            Self::NotFound(_) => "E_TILE_NOT_FOUND",
            Self::Tile(e) => e.error_code(),
        }
    }
}

/// Validate `edit`, write its patch, and return the updated tile.
///
/// # Errors
///
/// `Invalid` with per-field messages (nothing is written), `NotFound` for an
/// unknown tile, or a store error.
pub async fn save_metadata(
    state: &AppState,
    gallery: Gallery,
    id: Uuid,
    edit: &MetadataEdit,
) -> Result<Tile, MetadataError> {
    edit.validate().map_err(MetadataError::Invalid)?;
    let patch = edit.to_patch(gallery);
    let fields = patch.len();
    state.rows.update(Table::for_gallery(gallery), id, patch).await?;
    info!(gallery = gallery.as_str(), tile_id = %id, fields, "metadata saved");
    Ok(get_tile(state, gallery, id).await?)
}

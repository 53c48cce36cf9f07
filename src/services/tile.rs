//! Tile service: listing, draft toggle, and delete.
//!
//! DESIGN
//! ======
//! Tiles are decoded from row-store rows with the editor's `Tile` type, so
//! the admin UI and the service agree on field names. Delete removes the
//! row first and the stored image second. An object-store failure during
//! delete is logged and does not fail the request.

#[cfg(test)]
#[path = "tile_test.rs"]
mod tile_test;

use editor::tile::{Gallery, PHOTO_CATEGORIES, Tile};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::state::AppState;
use crate::store::{self, Query, Row, SortDir, StoreError, Table};

pub const MAX_CATEGORY_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum TileError {
    #[error("tile not found: {0}")]
    NotFound(Uuid),
    #[error("invalid category: {0:?}")]
    InvalidCategory(String),
    #[error("stored row is not a tile: {0}")]
    Decode(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TileError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl ErrorCode for TileError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_TILE_NOT_FOUND",
            Self::InvalidCategory(_) => "E_INVALID_CATEGORY",
            Self::Decode(_) => "E_TILE_DECODE",
            Self::Store(e) => e.error_code(),
        }
    }
}

// =============================================================================
// ROW CODEC
// =============================================================================

/// Decode a row into a tile.
///
/// # Errors
///
/// Returns `Decode` when required columns are missing or mistyped.
pub fn tile_from_row(row: Row) -> Result<Tile, TileError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| TileError::Decode(e.to_string()))
}

/// Encode a tile as a full row.
///
/// # Errors
///
/// Returns `Decode` if the tile does not serialize to an object.
pub fn tile_to_row(tile: &Tile) -> Result<Row, TileError> {
    match serde_json::to_value(tile) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(TileError::Decode(format!("expected object, got {other}"))),
        Err(e) => Err(TileError::Decode(e.to_string())),
    }
}

/// Check a category name for `gallery`.
///
/// Photos use a fixed set. Artwork categories are free-form labels but must
/// be usable as a storage path segment.
///
/// # Errors
///
/// Returns `InvalidCategory` when the name is not acceptable.
pub fn validate_category(gallery: Gallery, category: &str) -> Result<(), TileError> {
    let ok = match gallery {
        Gallery::Photos => PHOTO_CATEGORIES.contains(&category),
        Gallery::Artworks => {
            !category.is_empty()
                && category.len() <= MAX_CATEGORY_LEN
                && category.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
    };
    if ok { Ok(()) } else { Err(TileError::InvalidCategory(category.to_owned())) }
}

/// Category used when a request names none.
#[must_use]
pub fn default_category(gallery: Gallery) -> Option<&'static str> {
    match gallery {
        Gallery::Photos => None,
        Gallery::Artworks => Some("sketches"),
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// Tiles of a gallery, optionally one category, in drawing order.
///
/// # Errors
///
/// Returns a store error or a decode error for a malformed row.
pub async fn list_tiles(state: &AppState, gallery: Gallery, category: Option<&str>) -> Result<Vec<Tile>, TileError> {
    let mut query = Query::new();
    if let Some(category) = category {
        validate_category(gallery, category)?;
        query = query.eq("category", category);
    }
    let query = query.order_by("z_index", SortDir::Asc).order_by("display_order", SortDir::Asc);
    let rows = state.rows.select(Table::for_gallery(gallery), &query).await?;
    rows.into_iter().map(tile_from_row).collect()
}

/// Tiles of one category in slot order, the tie-break order for z planning.
///
/// # Errors
///
/// Returns a store or decode error.
pub async fn category_tiles(state: &AppState, gallery: Gallery, category: &str) -> Result<Vec<Tile>, TileError> {
    let query = Query::new().eq("category", category).order_by("display_order", SortDir::Asc);
    let rows = state.rows.select(Table::for_gallery(gallery), &query).await?;
    rows.into_iter().map(tile_from_row).collect()
}

/// # Errors
///
/// Returns `NotFound` when no tile has `id`.
pub async fn get_tile(state: &AppState, gallery: Gallery, id: Uuid) -> Result<Tile, TileError> {
    let row = store::get_by_id(state.rows.as_ref(), Table::for_gallery(gallery), id).await?;
    tile_from_row(row)
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Publish or hide a tile.
///
/// # Errors
///
/// Returns `NotFound` when no tile has `id`.
pub async fn set_draft(state: &AppState, gallery: Gallery, id: Uuid, is_draft: bool) -> Result<Tile, TileError> {
    let mut patch = Row::new();
    patch.insert("is_draft".into(), Value::Bool(is_draft));
    state.rows.update(Table::for_gallery(gallery), id, patch).await?;
    info!(gallery = gallery.as_str(), tile_id = %id, is_draft, "tile draft state changed");
    get_tile(state, gallery, id).await
}

/// Delete the tile row, then its stored image (best effort).
///
/// # Errors
///
/// Returns `NotFound` when no tile has `id`, or a store error.
pub async fn delete_tile(state: &AppState, gallery: Gallery, id: Uuid) -> Result<Tile, TileError> {
    let tile = get_tile(state, gallery, id).await?;
    state.rows.delete(Table::for_gallery(gallery), id).await?;

    let bucket = state.bucket(gallery);
    match state.objects.object_path(bucket, &tile.image_url) {
        Some(path) => {
            if let Err(e) = state.objects.remove(bucket, &path).await {
                warn!(gallery = gallery.as_str(), tile_id = %id, %path, error = %e, "stored image not removed");
            }
        }
        None => warn!(gallery = gallery.as_str(), tile_id = %id, url = %tile.image_url, "image url outside bucket; skipped"),
    }

    info!(gallery = gallery.as_str(), category = %tile.category, tile_id = %id, "tile deleted");
    Ok(tile)
}

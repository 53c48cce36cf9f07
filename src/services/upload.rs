//! Upload service: store an image and create its tile.
//!
//! DESIGN
//! ======
//! The object is written first under a timestamped path. An object that
//! already exists is a skip, not a failure, so re-running a migration over
//! the same directory is harmless.
//!
//! The tile row is placed in the next grid slot of its category. Slot
//! selection and insert run under the gallery's upload lock, and the store
//! rejects a duplicate `(category, display_order)`; on that conflict the slot
//! is recomputed, up to `MAX_PLACEMENT_ATTEMPTS` times. When no row can be
//! placed the stored object is removed again.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use editor::placement::{next_slot, title_from_file_name};
use editor::tile::{Gallery, Tile};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::services::tile::{TileError, tile_from_row, tile_to_row, validate_category};
use crate::state::AppState;
use crate::storage::{StorageError, content_type_for, upload_path};
use crate::store::{Query, SortDir, StoreError, Table};

pub const MAX_PLACEMENT_ATTEMPTS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),
    #[error("upload body is empty")]
    EmptyBody,
    #[error("no free display slot after {0} attempts")]
    PlacementExhausted(usize),
    #[error(transparent)]
    Storage(StorageError),
    #[error(transparent)]
    Tile(#[from] TileError),
}

impl From<StoreError> for UploadError {
    fn from(err: StoreError) -> Self {
        Self::Tile(TileError::from(err))
    }
}

impl ErrorCode for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFileName(_) => "E_INVALID_FILE_NAME",
            Self::EmptyBody => "E_EMPTY_UPLOAD",
            Self::PlacementExhausted(_) => "E_PLACEMENT_EXHAUSTED",
            Self::Storage(e) => e.error_code(),
            Self::Tile(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::PlacementExhausted(_) => true,
            Self::Storage(e) => e.retryable(),
            _ => false,
        }
    }
}

/// What an upload did.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Created(Tile),
    /// An object already existed at `path`; nothing was written.
    Skipped { path: String },
}

/// A bare file name: no separators, no leading dot.
fn check_file_name(file_name: &str) -> Result<(), UploadError> {
    let ok = !file_name.is_empty()
        && !file_name.starts_with('.')
        && !file_name.contains(['/', '\\'])
        && !file_name.chars().any(char::is_control);
    if ok { Ok(()) } else { Err(UploadError::InvalidFileName(file_name.to_owned())) }
}

async fn max_column(state: &AppState, table: Table, category: &str, column: &str) -> Result<Option<i64>, StoreError> {
    let query = Query::new().eq("category", category).order_by(column, SortDir::Desc).limit(1);
    let rows = state.rows.select(table, &query).await?;
    Ok(rows.first().and_then(|row| row.get(column)).and_then(Value::as_i64))
}

/// Store `bytes` and create a tile for it in the next slot of `category`.
///
/// # Errors
///
/// Validation errors for the category, file name, or empty body; storage
/// errors other than already-exists; `PlacementExhausted` when every slot
/// attempt conflicted.
pub async fn upload_tile(
    state: &AppState,
    gallery: Gallery,
    category: &str,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<UploadOutcome, UploadError> {
    validate_category(gallery, category)?;
    check_file_name(file_name)?;
    if bytes.is_empty() {
        return Err(UploadError::EmptyBody);
    }

    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let path = upload_path(category, millis, file_name);
    let bucket = state.bucket(gallery);
    let size = bytes.len();
    match state.objects.upload(bucket, &path, bytes, &content_type_for(file_name)).await {
        Ok(()) => {}
        Err(StorageError::AlreadyExists(_)) => {
            info!(gallery = gallery.as_str(), category, %path, "object exists; upload skipped");
            return Ok(UploadOutcome::Skipped { path });
        }
        Err(e) => return Err(UploadError::Storage(e)),
    }
    let image_url = state.objects.public_url(bucket, &path);

    match place_tile(state, gallery, category, file_name, image_url).await {
        Ok(tile) => {
            info!(
                gallery = gallery.as_str(),
                category,
                tile_id = %tile.id,
                display_order = tile.display_order,
                size,
                "tile uploaded"
            );
            Ok(UploadOutcome::Created(tile))
        }
        Err(err) => {
            if let Err(e) = state.objects.remove(bucket, &path).await {
                warn!(gallery = gallery.as_str(), category, %path, error = %e, "orphaned object not removed");
            }
            Err(err)
        }
    }
}

/// Insert a row for `image_url` in the next free slot of `category`.
async fn place_tile(
    state: &AppState,
    gallery: Gallery,
    category: &str,
    file_name: &str,
    image_url: String,
) -> Result<Tile, UploadError> {
    let table = Table::for_gallery(gallery);
    let _guard = state.upload_lock(gallery).lock().await;
    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let slot = next_slot(
            max_column(state, table, category, "display_order").await?,
            max_column(state, table, category, "z_index").await?,
        );
        let tile = Tile {
            id: Uuid::new_v4(),
            category: category.to_owned(),
            title: Some(title_from_file_name(file_name)),
            image_url: image_url.clone(),
            display_order: slot.display_order,
            position_x: slot.position_x,
            position_y: slot.position_y,
            width: slot.width,
            height: slot.height,
            scale: 1.0,
            rotation: 0.0,
            z_index: slot.z_index,
            is_draft: false,
            metadata: Map::new(),
        };
        match state.rows.insert(table, tile_to_row(&tile)?).await {
            Ok(row) => return Ok(tile_from_row(row)?),
            Err(StoreError::Conflict(reason)) => {
                warn!(gallery = gallery.as_str(), category, attempt, %reason, "display slot taken; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(UploadError::PlacementExhausted(MAX_PLACEMENT_ATTEMPTS))
}

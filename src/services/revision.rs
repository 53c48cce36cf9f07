//! Layout revisions: named snapshots of one category's geometry.
//!
//! DESIGN
//! ======
//! A revision stores the `LayoutPatch` of every tile in a category at the
//! time it was taken. Restoring writes those geometries back through the
//! same path as a layout save. Tiles deleted since the snapshot are skipped;
//! tiles added since are left where they are.

#[cfg(test)]
#[path = "revision_test.rs"]
mod revision_test;

use editor::tile::{Gallery, LayoutPatch};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::services::layout::geometry_row;
use crate::services::tile::{TileError, category_tiles, validate_category};
use crate::state::AppState;
use crate::store::{self, Query, Row, SortDir, StoreError, Table};

pub const MAX_REVISION_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRevision {
    pub id: Uuid,
    pub gallery: Gallery,
    pub category: String,
    pub revision_name: String,
    pub layout_data: Vec<LayoutPatch>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Body of a create request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRevision {
    pub category: String,
    pub revision_name: String,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    #[error("revision not found: {0}")]
    NotFound(Uuid),
    #[error("revision name must be 1 to 100 characters")]
    InvalidName,
    #[error("stored revision is malformed: {0}")]
    Decode(String),
    #[error(transparent)]
    Tile(#[from] TileError),
}

impl From<StoreError> for RevisionError {
    fn from(err: StoreError) -> Self {
        Self::Tile(TileError::from(err))
    }
}

impl ErrorCode for RevisionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_REVISION_NOT_FOUND",
            Self::InvalidName => "E_INVALID_REVISION_NAME",
            Self::Decode(_) => "E_REVISION_DECODE",
            Self::Tile(e) => e.error_code(),
        }
    }
}

fn revision_from_row(row: Row) -> Result<LayoutRevision, RevisionError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| RevisionError::Decode(e.to_string()))
}

fn revision_to_row(revision: &LayoutRevision) -> Result<Row, RevisionError> {
    match serde_json::to_value(revision) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(RevisionError::Decode(format!("expected object, got {other}"))),
        Err(e) => Err(RevisionError::Decode(e.to_string())),
    }
}

/// Revisions of one category, newest first.
///
/// # Errors
///
/// Returns `InvalidCategory`, a store error, or a decode error.
pub async fn list_revisions(
    state: &AppState,
    gallery: Gallery,
    category: &str,
) -> Result<Vec<LayoutRevision>, RevisionError> {
    validate_category(gallery, category)?;
    let query = Query::new()
        .eq("gallery", gallery.as_str())
        .eq("category", category)
        .order_by("created_at", SortDir::Desc);
    let rows = state.rows.select(Table::LayoutRevisions, &query).await?;
    rows.into_iter().map(revision_from_row).collect()
}

/// Snapshot the current geometry of `new.category`.
///
/// # Errors
///
/// Returns `InvalidName` for a blank or overlong name, `InvalidCategory`, or
/// a store error.
pub async fn create_revision(
    state: &AppState,
    gallery: Gallery,
    new: NewRevision,
) -> Result<LayoutRevision, RevisionError> {
    let name = new.revision_name.trim();
    if name.is_empty() || name.chars().count() > MAX_REVISION_NAME_LEN {
        return Err(RevisionError::InvalidName);
    }
    validate_category(gallery, &new.category)?;

    let tiles = category_tiles(state, gallery, &new.category).await?;
    let revision = LayoutRevision {
        id: Uuid::new_v4(),
        gallery,
        category: new.category,
        revision_name: name.to_owned(),
        layout_data: tiles.iter().map(|t| LayoutPatch { id: t.id, geometry: t.geometry() }).collect(),
        created_by: new.created_by.filter(|c| !c.trim().is_empty()),
        created_at: OffsetDateTime::now_utc(),
    };
    state.rows.insert(Table::LayoutRevisions, revision_to_row(&revision)?).await?;
    info!(
        gallery = gallery.as_str(),
        category = %revision.category,
        revision_id = %revision.id,
        count = revision.layout_data.len(),
        "layout revision created"
    );
    Ok(revision)
}

/// Write a revision's geometry back. Returns the number of tiles restored.
///
/// # Errors
///
/// Returns `NotFound` when the revision does not exist in `gallery`, or a
/// store error.
pub async fn restore_revision(state: &AppState, gallery: Gallery, id: Uuid) -> Result<usize, RevisionError> {
    let row = match store::get_by_id(state.rows.as_ref(), Table::LayoutRevisions, id).await {
        Ok(row) => row,
        Err(StoreError::NotFound(_)) => return Err(RevisionError::NotFound(id)),
        Err(e) => return Err(e.into()),
    };
    let revision = revision_from_row(row)?;
    if revision.gallery != gallery {
        return Err(RevisionError::NotFound(id));
    }

    let table = Table::for_gallery(gallery);
    let mut restored = 0;
    for patch in &revision.layout_data {
        match state.rows.update(table, patch.id, geometry_row(patch)).await {
            Ok(()) => restored += 1,
            Err(StoreError::NotFound(tile_id)) => {
                warn!(gallery = gallery.as_str(), revision_id = %id, tile_id = %tile_id, "tile gone; skipped");
            }
            Err(e) => return Err(e.into()),
        }
    }
    info!(gallery = gallery.as_str(), category = %revision.category, revision_id = %id, count = restored, "layout revision restored");
    Ok(restored)
}

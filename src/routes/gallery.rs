//! Gallery admin routes. Handlers parse the request, call one service, and
//! map its error enum to a status.

#[cfg(test)]
#[path = "gallery_test.rs"]
mod gallery_test;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use editor::collection::ZDirection;
use editor::metadata::MetadataEdit;
use editor::tile::{Gallery, LayoutPatch, Tile};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::layout::{self, LayoutError};
use crate::services::metadata::{self, MetadataError};
use crate::services::order;
use crate::services::revision::{self, LayoutRevision, NewRevision, RevisionError};
use crate::services::tile::{self, TileError};
use crate::services::upload::{self, UploadError, UploadOutcome};
use crate::state::AppState;
use crate::storage::StorageError;
use crate::store::StoreError;

// =============================================================================
// REQUEST / RESPONSE TYPES
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub category: Option<String>,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LayoutBody {
    pub tiles: Vec<LayoutPatch>,
}

#[derive(Debug, Deserialize)]
pub struct DraftBody {
    pub is_draft: bool,
}

#[derive(Debug, Serialize)]
pub struct ZUpdate {
    pub id: Uuid,
    pub z_index: i64,
}

#[derive(Debug, Serialize)]
pub struct ZOrderResponse {
    pub changed: bool,
    pub updates: Vec<ZUpdate>,
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

fn parse_gallery(raw: &str) -> Result<Gallery, ApiError> {
    Gallery::parse(raw)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "E_UNKNOWN_GALLERY", format!("unknown gallery: {raw}")))
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::InvalidColumn { .. } | StoreError::InvalidRow(_) => StatusCode::BAD_REQUEST,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn tile_status(err: &TileError) -> StatusCode {
    match err {
        TileError::NotFound(_) => StatusCode::NOT_FOUND,
        TileError::InvalidCategory(_) => StatusCode::BAD_REQUEST,
        TileError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        TileError::Store(e) => store_status(e),
    }
}

impl From<TileError> for ApiError {
    fn from(err: TileError) -> Self {
        Self::from_error(tile_status(&err), &err)
    }
}

impl From<LayoutError> for ApiError {
    fn from(err: LayoutError) -> Self {
        let status = match &err {
            LayoutError::InvalidGeometry(_) => StatusCode::BAD_REQUEST,
            LayoutError::NotFound(_) => StatusCode::NOT_FOUND,
            LayoutError::Store(e) => store_status(e),
        };
        Self::from_error(status, &err)
    }
}

impl From<MetadataError> for ApiError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::Invalid(fields) => {
                let api = Self::new(StatusCode::UNPROCESSABLE_ENTITY, "E_INVALID_METADATA", "metadata failed validation");
                api.with_fields(fields)
            }
            MetadataError::Tile(e) => e.into(),
            other @ MetadataError::NotFound(_) => Self::from_error(StatusCode::NOT_FOUND, &other),
        }
    }
}

impl From<RevisionError> for ApiError {
    fn from(err: RevisionError) -> Self {
        let status = match &err {
            RevisionError::NotFound(_) => StatusCode::NOT_FOUND,
            RevisionError::InvalidName => StatusCode::BAD_REQUEST,
            RevisionError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RevisionError::Tile(e) => tile_status(e),
        };
        Self::from_error(status, &err)
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        let status = match &err {
            UploadError::InvalidFileName(_) | UploadError::EmptyBody => StatusCode::BAD_REQUEST,
            UploadError::PlacementExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            UploadError::Storage(StorageError::AlreadyExists(_)) => StatusCode::CONFLICT,
            UploadError::Storage(_) => StatusCode::BAD_GATEWAY,
            UploadError::Tile(e) => tile_status(e),
        };
        Self::from_error(status, &err)
    }
}

/// Category from the query, or the gallery default.
fn resolve_category(gallery: Gallery, category: Option<String>) -> Result<String, ApiError> {
    match category.filter(|c| !c.is_empty()) {
        Some(category) => Ok(category),
        None => tile::default_category(gallery)
            .map(str::to_owned)
            .ok_or_else(|| ApiError::bad_request("category is required")),
    }
}

// =============================================================================
// TILES
// =============================================================================

/// `GET /api/{gallery}/tiles?category=` — tiles in drawing order.
pub async fn list_tiles(
    State(state): State<AppState>,
    Path(gallery): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Tile>>, ApiError> {
    let gallery = parse_gallery(&gallery)?;
    let category = query.category.filter(|c| !c.is_empty());
    Ok(Json(tile::list_tiles(&state, gallery, category.as_deref()).await?))
}

/// `POST /api/{gallery}/tiles/upload?category=&file_name=` — raw file body.
pub async fn upload_tile(
    State(state): State<AppState>,
    Path(gallery): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let gallery = parse_gallery(&gallery)?;
    let category = resolve_category(gallery, query.category)?;
    let outcome = upload::upload_tile(&state, gallery, &category, &query.file_name, body.to_vec()).await?;
    Ok(match outcome {
        UploadOutcome::Created(tile) => (StatusCode::CREATED, Json(tile)).into_response(),
        UploadOutcome::Skipped { path } => Json(json!({ "skipped": true, "path": path })).into_response(),
    })
}

/// `DELETE /api/{gallery}/tiles/{id}` — row, then stored image.
pub async fn delete_tile(
    State(state): State<AppState>,
    Path((gallery, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let gallery = parse_gallery(&gallery)?;
    tile::delete_tile(&state, gallery, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/{gallery}/tiles/{id}/metadata` — validated metadata save.
pub async fn save_metadata(
    State(state): State<AppState>,
    Path((gallery, id)): Path<(String, Uuid)>,
    Json(edit): Json<MetadataEdit>,
) -> Result<Json<Tile>, ApiError> {
    let gallery = parse_gallery(&gallery)?;
    Ok(Json(metadata::save_metadata(&state, gallery, id, &edit).await?))
}

/// `PATCH /api/{gallery}/tiles/{id}/draft`
pub async fn set_draft(
    State(state): State<AppState>,
    Path((gallery, id)): Path<(String, Uuid)>,
    Json(body): Json<DraftBody>,
) -> Result<Json<Tile>, ApiError> {
    let gallery = parse_gallery(&gallery)?;
    Ok(Json(tile::set_draft(&state, gallery, id, body.is_draft).await?))
}

async fn shift(state: &AppState, gallery: &str, id: Uuid, direction: ZDirection) -> Result<Json<ZOrderResponse>, ApiError> {
    let gallery = parse_gallery(gallery)?;
    let change = order::shift_z(state, gallery, id, direction).await?;
    let updates: Vec<ZUpdate> = change
        .map(|c| c.updates.into_iter().map(|(id, z_index)| ZUpdate { id, z_index }).collect())
        .unwrap_or_default();
    Ok(Json(ZOrderResponse { changed: !updates.is_empty(), updates }))
}

/// `POST /api/{gallery}/tiles/{id}/forward`
pub async fn bring_forward(
    State(state): State<AppState>,
    Path((gallery, id)): Path<(String, Uuid)>,
) -> Result<Json<ZOrderResponse>, ApiError> {
    shift(&state, &gallery, id, ZDirection::Forward).await
}

/// `POST /api/{gallery}/tiles/{id}/backward`
pub async fn send_backward(
    State(state): State<AppState>,
    Path((gallery, id)): Path<(String, Uuid)>,
) -> Result<Json<ZOrderResponse>, ApiError> {
    shift(&state, &gallery, id, ZDirection::Backward).await
}

// =============================================================================
// LAYOUT & REVISIONS
// =============================================================================

/// `PUT /api/{gallery}/layout` — batch geometry save, last write wins.
pub async fn save_layout(
    State(state): State<AppState>,
    Path(gallery): Path<String>,
    Json(body): Json<LayoutBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let gallery = parse_gallery(&gallery)?;
    let saved = layout::save_layout(&state, gallery, &body.tiles).await?;
    Ok(Json(json!({ "saved": saved })))
}

/// `GET /api/{gallery}/revisions?category=` — newest first.
pub async fn list_revisions(
    State(state): State<AppState>,
    Path(gallery): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<LayoutRevision>>, ApiError> {
    let gallery = parse_gallery(&gallery)?;
    let category = resolve_category(gallery, query.category)?;
    Ok(Json(revision::list_revisions(&state, gallery, &category).await?))
}

/// `POST /api/{gallery}/revisions`
pub async fn create_revision(
    State(state): State<AppState>,
    Path(gallery): Path<String>,
    Json(body): Json<NewRevision>,
) -> Result<(StatusCode, Json<LayoutRevision>), ApiError> {
    let gallery = parse_gallery(&gallery)?;
    let created = revision::create_revision(&state, gallery, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `POST /api/{gallery}/revisions/{id}/restore`
pub async fn restore_revision(
    State(state): State<AppState>,
    Path((gallery, id)): Path<(String, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let gallery = parse_gallery(&gallery)?;
    let restored = revision::restore_revision(&state, gallery, id).await?;
    Ok(Json(json!({ "restored": restored })))
}

//! Row store: the persistence seam for gallery rows and layout revisions.
//!
//! DESIGN
//! ======
//! Rows travel as JSON objects keyed by column name, the same shape the
//! editor's `Tile` serializes to. The trait exposes exactly the four
//! operations the services need: filtered select, insert, update by id, and
//! delete by id. Column names are checked against a per-table allowlist
//! before any backend sees them, so the Postgres backend can splice them
//! into SQL safely.
//!
//! SYSTEM CONTEXT
//! ==============
//! `PgRowStore` serves production. `MemoryRowStore` backs tests and
//! `ROW_STORE=memory` local runs, and enforces the same unique
//! `(category, display_order)` rule as the database so placement retries
//! are exercised in tests.

pub mod memory;
pub mod postgres;


use async_trait::async_trait;
use editor::tile::Gallery;
use serde_json::{Map, Value};
use uuid::Uuid;

/// One row as a JSON object.
pub type Row = Map<String, Value>;

// =============================================================================
// TABLES
// =============================================================================

const TILE_COLUMNS: &[&str] = &[
    "id",
    "category",
    "title",
    "image_url",
    "display_order",
    "position_x",
    "position_y",
    "width",
    "height",
    "scale",
    "rotation",
    "z_index",
    "is_draft",
    "tags",
    "created_at",
    "updated_at",
];

const PHOTO_COLUMNS: &[&str] = &[
    "description",
    "caption",
    "photographer_name",
    "date_taken",
    "device_used",
    "year",
    "credits",
    "camera_lens",
    "project_visibility",
    "external_links",
    "video_thumbnail_url",
];

const ARTWORK_COLUMNS: &[&str] = &[
    "description",
    "creation_date",
    "dimension_preset",
    "dimension_unit",
    "custom_width",
    "custom_height",
    "pencil_grades",
    "charcoal_types",
    "paper_type",
    "time_taken",
    "copyright",
    "external_link",
];

const REVISION_COLUMNS: &[&str] =
    &["id", "gallery", "category", "revision_name", "layout_data", "created_by", "created_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Photos,
    Artworks,
    LayoutRevisions,
}

impl Table {
    #[must_use]
    pub fn for_gallery(gallery: Gallery) -> Self {
        match gallery {
            Gallery::Photos => Self::Photos,
            Gallery::Artworks => Self::Artworks,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Photos => "photos",
            Self::Artworks => "artworks",
            Self::LayoutRevisions => "layout_revisions",
        }
    }

    /// Whether rows carry a tile layout (and the unique display slot).
    #[must_use]
    pub fn holds_tiles(self) -> bool {
        !matches!(self, Self::LayoutRevisions)
    }

    #[must_use]
    pub fn has_column(self, column: &str) -> bool {
        match self {
            Self::Photos => TILE_COLUMNS.contains(&column) || PHOTO_COLUMNS.contains(&column),
            Self::Artworks => TILE_COLUMNS.contains(&column) || ARTWORK_COLUMNS.contains(&column),
            Self::LayoutRevisions => REVISION_COLUMNS.contains(&column),
        }
    }

    /// Check every column name against the allowlist.
    ///
    /// # Errors
    ///
    /// Returns `InvalidColumn` for the first unknown name.
    pub fn check_columns<'a>(self, columns: impl IntoIterator<Item = &'a str>) -> Result<(), StoreError> {
        for column in columns {
            if !self.has_column(column) {
                return Err(StoreError::InvalidColumn { table: self.name(), column: column.to_owned() });
            }
        }
        Ok(())
    }
}

// =============================================================================
// QUERY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Equality filters, ordering, and limit for `select`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order: Vec<(String, SortDir)>,
    pub limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: &str, dir: SortDir) -> Self {
        self.order.push((column.to_owned(), dir));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Every column this query mentions.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|(c, _)| c.as_str()).chain(self.order.iter().map(|(c, _)| c.as_str()))
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("row not found: {0}")]
    NotFound(Uuid),
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("unknown column {column} on {table}")]
    InvalidColumn { table: &'static str, column: String },
    #[error("row is not a valid record: {0}")]
    InvalidRow(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_ROW_NOT_FOUND",
            Self::Conflict(_) => "E_ROW_CONFLICT",
            Self::InvalidColumn { .. } => "E_INVALID_COLUMN",
            Self::InvalidRow(_) => "E_INVALID_ROW",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Database(_))
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Persistence operations over gallery tables.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Rows matching every filter, ordered, limited.
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Insert a row and return it as stored (with defaults filled in).
    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError>;

    /// Overwrite the given columns of the row with `id`.
    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<(), StoreError>;

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), StoreError>;
}

/// Fetch one row by id.
///
/// # Errors
///
/// Returns `NotFound` when no row has `id`.
pub async fn get_by_id(store: &dyn RowStore, table: Table, id: Uuid) -> Result<Row, StoreError> {
    let query = Query::new().eq("id", id.to_string()).limit(1);
    store.select(table, &query).await?.into_iter().next().ok_or(StoreError::NotFound(id))
}

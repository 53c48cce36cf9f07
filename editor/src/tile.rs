//! Tile model: the persisted photo/artwork record, its geometry, and sparse updates.
//!
//! `Tile` mirrors one row of the `photos` or `artworks` table. The layout
//! columns are typed; every other column (caption, photographer, materials,
//! timestamps, ...) rides along in the flattened `metadata` map so the editor
//! round-trips rows it does not understand.
//!
//! `PartialTile` is the unit of change flowing out of the engine. Only the
//! fields that a gesture touched are present.

#[cfg(test)]
#[path = "tile_test.rs"]
mod tile_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::consts::ROTATE_STEP_DEG;
use crate::snap::clamp_scale;

/// Unique identifier for a tile.
pub type TileId = Uuid;

/// Which gallery a tile belongs to. Each gallery is stored in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gallery {
    /// Photography: `selected`, `commissioned`, `editorial`, `personal`.
    Photos,
    /// Pencil and charcoal artwork.
    Artworks,
}

impl Gallery {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photos => "photos",
            Self::Artworks => "artworks",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "photos" => Some(Self::Photos),
            "artworks" => Some(Self::Artworks),
            _ => None,
        }
    }
}

/// Known photo categories. Artworks use free-form categories.
pub const PHOTO_CATEGORIES: [&str; 4] = ["selected", "commissioned", "editorial", "personal"];

fn default_scale() -> f64 {
    1.0
}

/// A positioned tile as stored in the row store and held by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub category: String,
    #[serde(default)]
    pub title: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub display_order: i64,
    /// Left edge in canvas pixels.
    #[serde(default)]
    pub position_x: f64,
    /// Top edge in canvas pixels.
    #[serde(default)]
    pub position_y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Uniform scale factor around the tile center (1.0 = 100%).
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order; higher values draw in front.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default)]
    pub is_draft: bool,
    /// All remaining columns, untouched by the layout engine.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Tile {
    /// The layout fields of this tile.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        Geometry {
            position_x: self.position_x,
            position_y: self.position_y,
            width: self.width,
            height: self.height,
            scale: self.scale,
            rotation: self.rotation,
            z_index: self.z_index,
        }
    }

    /// Rotation after one rotate action, wrapped into `[0, 360)`.
    #[must_use]
    pub fn next_rotation(&self) -> f64 {
        (self.rotation + ROTATE_STEP_DEG).rem_euclid(360.0)
    }

    /// Apply a sparse update in place.
    pub fn apply(&mut self, partial: &PartialTile) {
        if let Some(x) = partial.position_x {
            self.position_x = x;
        }
        if let Some(y) = partial.position_y {
            self.position_y = y;
        }
        if let Some(w) = partial.width {
            self.width = w;
        }
        if let Some(h) = partial.height {
            self.height = h;
        }
        if let Some(s) = partial.scale {
            self.scale = s;
        }
        if let Some(r) = partial.rotation {
            self.rotation = r;
        }
        if let Some(z) = partial.z_index {
            self.z_index = z;
        }
        if let Some(d) = partial.is_draft {
            self.is_draft = d;
        }
        if let Some(ref fields) = partial.metadata {
            for (k, v) in fields {
                match k.as_str() {
                    "title" => self.title = v.as_str().map(str::to_owned),
                    _ => {
                        self.metadata.insert(k.clone(), v.clone());
                    }
                }
            }
        }
    }

    /// String metadata field, if present and non-null.
    #[must_use]
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// The persisted layout fields of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub rotation: f64,
    pub z_index: i64,
}

impl Geometry {
    /// Whether every float field is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.position_x, self.position_y, self.width, self.height, self.scale, self.rotation]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Whether the geometry can be persisted: finite, with a positive box.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Re-establish the tile invariants: scale in range, rotation wrapped
    /// into `[0, 360)`.
    ///
    /// Width and height are left alone. The resize floor applies to width
    /// only, and height follows the aspect ratio, so a wide tile may
    /// legitimately be shorter than `MIN_TILE_SIZE`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self { scale: clamp_scale(self.scale), rotation: self.rotation.rem_euclid(360.0), ..self }
    }
}

/// One tile's geometry as sent by a layout save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPatch {
    pub id: TileId,
    #[serde(flatten)]
    pub geometry: Geometry,
}

/// Sparse update for a tile. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialTile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    /// Metadata columns to overwrite. `null` values clear the column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl PartialTile {
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { position_x: Some(x), position_y: Some(y), ..Default::default() }
    }

    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Default::default() }
    }

    #[must_use]
    pub fn scale(scale: f64) -> Self {
        Self { scale: Some(scale), ..Default::default() }
    }

    #[must_use]
    pub fn rotation(rotation: f64) -> Self {
        Self { rotation: Some(rotation), ..Default::default() }
    }

    #[must_use]
    pub fn z_index(z: i64) -> Self {
        Self { z_index: Some(z), ..Default::default() }
    }

    #[must_use]
    pub fn metadata(fields: Map<String, Value>) -> Self {
        Self { metadata: Some(fields), ..Default::default() }
    }
}

impl From<Geometry> for PartialTile {
    fn from(g: Geometry) -> Self {
        Self {
            position_x: Some(g.position_x),
            position_y: Some(g.position_y),
            width: Some(g.width),
            height: Some(g.height),
            scale: Some(g.scale),
            rotation: Some(g.rotation),
            z_index: Some(g.z_index),
            ..Default::default()
        }
    }
}

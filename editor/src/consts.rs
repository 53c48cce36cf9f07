//! Shared numeric constants for the editor crate.

// ── Scale ───────────────────────────────────────────────────────

/// Smallest scale factor a tile may carry.
pub const MIN_SCALE: f64 = 0.5;

/// Largest scale factor a tile may carry.
pub const MAX_SCALE: f64 = 3.0;

/// Horizontal drag distance, in pixels, that adds 1.0x to the anchor scale.
pub const SCALE_DRAG_PX: f64 = 200.0;

/// Wheel delta units per 1.0x of scale change.
pub const WHEEL_SCALE_DIVISOR: f64 = 1000.0;

/// How long the scale handle must be held before scaling activates.
pub const SCALE_HOLD_MS: u32 = 500;

// ── Geometry ────────────────────────────────────────────────────

/// Floor for tile width and height during resize, in pixels.
pub const MIN_TILE_SIZE: f64 = 100.0;

/// Degrees added by one rotate action.
pub const ROTATE_STEP_DEG: f64 = 90.0;

/// Default snap grid size in pixels.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

// ── Presentation ────────────────────────────────────────────────

/// Opacity of a tile while it is being dragged, resized, or scaled.
pub const ACTIVE_OPACITY: f64 = 0.7;

/// Stacking order of a tile while a gesture is active on it.
pub const ACTIVE_Z_INDEX: i64 = 9999;

// ── Placement ───────────────────────────────────────────────────

/// Tiles per row in the initial upload grid.
pub const GRID_COLUMNS: i64 = 3;

/// Width of a freshly uploaded tile.
pub const PLACEMENT_TILE_WIDTH: f64 = 300.0;

/// Height of a freshly uploaded tile.
pub const PLACEMENT_TILE_HEIGHT: f64 = 400.0;

/// Gap between tiles in the initial upload grid.
pub const PLACEMENT_GAP: f64 = 20.0;

// ── History ─────────────────────────────────────────────────────

/// Snapshots kept in the undo stack before the oldest is dropped.
pub const MAX_HISTORY: usize = 50;

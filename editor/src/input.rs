//! Input model: editor mode, tile handles, mouse buttons, and the gesture state machine.
//!
//! `UiState` carries the settings that shape every gesture (mode, snapping,
//! grid size) plus selection and hover. `InputState` is the gesture being
//! tracked between pointer-down and pointer-up. Each active variant holds the
//! anchor captured at gesture start, so every move is computed from the
//! anchor rather than accumulated from previous moves.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::DEFAULT_GRID_SIZE;
use crate::geom::Point;
use crate::tile::TileId;

/// Whether the canvas accepts edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Tiles can be moved, resized, scaled, and rotated.
    #[default]
    Edit,
    /// Read-only rendering as visitors see it.
    Preview,
}

/// Which part of a tile received the pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// The tile body; starts a drag.
    Body,
    /// The bottom-right corner; starts an aspect-locked resize.
    Resize,
    /// The top-right hold-to-scale knob.
    Scale,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: EditorMode,
    /// Round positions and sizes to `grid_size` multiples.
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub selected_id: Option<TileId>,
    pub hovered_id: Option<TileId>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: EditorMode::Edit,
            snap_to_grid: false,
            grid_size: DEFAULT_GRID_SIZE,
            selected_id: None,
            hovered_id: None,
        }
    }
}

impl UiState {
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.mode == EditorMode::Edit
    }
}

/// Internal state for the gesture state machine.
///
/// At most one gesture is active per editor, which makes drag, resize, and
/// scale mutually exclusive.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Moving a tile with the mouse or a single touch.
    Dragging {
        id: TileId,
        /// Client position of the pointer at gesture start.
        anchor: Point,
        orig_x: f64,
        orig_y: f64,
        /// Whether window-level listeners were requested for this drag.
        captured: bool,
    },
    /// Resizing a tile from its corner handle.
    Resizing {
        id: TileId,
        anchor: Point,
        orig_w: f64,
        orig_h: f64,
    },
    /// Scale handle pressed; waiting for the hold timer to fire.
    ScaleHold {
        id: TileId,
        anchor: Point,
    },
    /// Hold elapsed; horizontal drag now scales the tile.
    Scaling {
        id: TileId,
        anchor: Point,
        orig_scale: f64,
    },
    /// Two-finger pinch on a tile.
    Pinching {
        id: TileId,
        start_distance: f64,
        orig_scale: f64,
    },
}

impl InputState {
    /// The tile this gesture acts on, if any.
    #[must_use]
    pub fn tile_id(&self) -> Option<TileId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. }
            | Self::Resizing { id, .. }
            | Self::ScaleHold { id, .. }
            | Self::Scaling { id, .. }
            | Self::Pinching { id, .. } => Some(*id),
        }
    }

    /// Whether the gesture currently changes geometry on pointer moves.
    ///
    /// A pending scale hold is not active yet: the tile keeps its normal
    /// appearance until the hold timer fires.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle | Self::ScaleHold { .. })
    }

    /// Whether this gesture holds window-level move/up listeners.
    #[must_use]
    pub fn holds_window(&self) -> bool {
        match self {
            Self::Dragging { captured, .. } => *captured,
            Self::Resizing { .. } | Self::Scaling { .. } => true,
            Self::Idle | Self::ScaleHold { .. } | Self::Pinching { .. } => false,
        }
    }
}

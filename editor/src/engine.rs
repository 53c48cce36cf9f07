//! Editor engine: pointer, touch, and wheel input turned into tile updates.
//!
//! DESIGN
//! ======
//! `EditorCore` owns the collection, UI state, the active gesture, and the
//! undo history. Every handler is synchronous and returns a list of
//! [`Action`]s for the host: tile updates to mirror into the view, and
//! requests the host must fulfil (capture window events, arm a hold timer,
//! open the metadata panel, confirm a delete).
//!
//! Geometry is computed from the anchor captured at gesture start, never
//! accumulated move by move, so a burst of pointer events cannot drift.
//! Nothing here persists anything; the host saves `layout_patches()` when
//! the admin presses save.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::collection::{Collection, ZDirection};
use crate::consts::{
    ACTIVE_OPACITY, ACTIVE_Z_INDEX, MIN_TILE_SIZE, SCALE_DRAG_PX, SCALE_HOLD_MS, WHEEL_SCALE_DIVISOR,
};
use crate::geom::Point;
use crate::history::History;
use crate::input::{Button, EditorMode, Handle, InputState, UiState, WheelDelta};
use crate::snap::{clamp_scale, snap_if};
use crate::tile::{Geometry, LayoutPatch, PartialTile, Tile, TileId};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A tile changed locally; mirror `fields` into the view.
    TileUpdated { id: TileId, fields: PartialTile },
    /// A tile became the selection.
    Selected { id: TileId },
    /// Attach window-level mouse move/up listeners for the gesture.
    CaptureWindow,
    /// Detach the window-level listeners.
    ReleaseWindow,
    /// Arm a one-shot timer; call `on_hold_elapsed` when it fires.
    StartHoldTimer { ms: u32 },
    /// Disarm the pending hold timer.
    CancelHoldTimer,
    /// Open the metadata panel for a tile.
    EditRequested { id: TileId },
    /// Ask the host to confirm and perform a delete.
    DeleteRequested { id: TileId },
    /// The whole layout was replaced (undo/redo); re-read every tile.
    LayoutReplaced,
}

/// How the host should draw one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileStyle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub z_index: i64,
    /// CSS transform applied around the tile center.
    pub transform: String,
}

/// Core editor state. Free of browser types so it can be tested natively.
pub struct EditorCore {
    pub collection: Collection,
    pub ui: UiState,
    pub input: InputState,
    /// Geometry-only entries; metadata edits are never rolled back.
    history: History<Vec<LayoutPatch>>,
    /// Geometry of the gesture's tile when the gesture began.
    gesture_start: Option<Geometry>,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self {
            collection: Collection::new(),
            ui: UiState::default(),
            input: InputState::default(),
            history: History::new(Vec::new()),
            gesture_start: None,
        }
    }
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the collection with tiles loaded for a category.
    pub fn load_tiles(&mut self, tiles: Vec<Tile>) {
        self.collection.load(tiles);
        self.input = InputState::Idle;
        self.gesture_start = None;
        self.history.reset(self.collection.layout());
        if let Some(id) = self.ui.selected_id
            && self.collection.get(&id).is_none()
        {
            self.ui.selected_id = None;
        }
    }

    /// Add a freshly uploaded tile.
    pub fn add_tile(&mut self, tile: Tile) {
        self.collection.insert(tile);
        self.history.push(self.collection.layout());
    }

    /// Drop a tile after the host confirmed its deletion.
    ///
    /// History restarts here: undo must not resurrect a deleted row.
    pub fn remove_tile(&mut self, id: &TileId) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.tile_id() == Some(*id) {
            actions = self.finish_gesture();
        }
        self.collection.remove(id);
        if self.ui.selected_id == Some(*id) {
            self.ui.selected_id = None;
        }
        if self.ui.hovered_id == Some(*id) {
            self.ui.hovered_id = None;
        }
        self.history.reset(self.collection.layout());
        actions
    }

    /// Mirror saved metadata into local state (optimistic sync from the panel).
    pub fn apply_metadata(&mut self, id: &TileId, fields: PartialTile) -> Vec<Action> {
        if !self.collection.apply_partial(id, &fields) {
            return Vec::new();
        }
        vec![Action::TileUpdated { id: *id, fields }]
    }

    // --- Settings ---

    /// Switch between edit and preview. Leaving edit mode ends any gesture.
    pub fn set_mode(&mut self, mode: EditorMode) -> Vec<Action> {
        self.ui.mode = mode;
        if mode == EditorMode::Preview {
            return self.finish_gesture();
        }
        Vec::new()
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.ui.snap_to_grid = enabled;
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.ui.grid_size = grid_size;
    }

    // --- Hover ---

    pub fn on_pointer_enter(&mut self, id: TileId) {
        self.ui.hovered_id = Some(id);
    }

    pub fn on_pointer_leave(&mut self, id: TileId) {
        if self.ui.hovered_id == Some(id) {
            self.ui.hovered_id = None;
        }
    }

    // --- Mouse ---

    /// Pointer-down on a tile part. Starts a drag, resize, or scale hold.
    ///
    /// Ignored outside edit mode, for non-primary buttons, for unknown tiles,
    /// and while another gesture is in progress.
    pub fn on_pointer_down(&mut self, id: TileId, handle: Handle, client: Point, button: Button) -> Vec<Action> {
        if !self.ui.is_editing() || button != Button::Primary || !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        let Some(tile) = self.collection.get(&id) else {
            return Vec::new();
        };
        let start = tile.geometry();

        match handle {
            Handle::Body => {
                self.input = InputState::Dragging {
                    id,
                    anchor: client,
                    orig_x: start.position_x,
                    orig_y: start.position_y,
                    captured: true,
                };
                self.gesture_start = Some(start);
                self.ui.selected_id = Some(id);
                vec![Action::Selected { id }, Action::CaptureWindow]
            }
            Handle::Resize => {
                self.input = InputState::Resizing { id, anchor: client, orig_w: start.width, orig_h: start.height };
                self.gesture_start = Some(start);
                vec![Action::CaptureWindow]
            }
            Handle::Scale => {
                self.input = InputState::ScaleHold { id, anchor: client };
                vec![Action::StartHoldTimer { ms: SCALE_HOLD_MS }]
            }
        }
    }

    /// The hold timer armed by a scale-handle press fired.
    ///
    /// Scaling activates anchored at the press position and the tile's
    /// current scale. A stale timer (hold already released) is ignored.
    pub fn on_hold_elapsed(&mut self) -> Vec<Action> {
        let InputState::ScaleHold { id, anchor } = self.input else {
            return Vec::new();
        };
        let Some(tile) = self.collection.get(&id) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        self.gesture_start = Some(tile.geometry());
        self.input = InputState::Scaling { id, anchor, orig_scale: tile.scale };
        vec![Action::CaptureWindow]
    }

    /// Window-level mouse move during a captured gesture.
    pub fn on_pointer_move(&mut self, client: Point) -> Vec<Action> {
        if !self.input.holds_window() {
            return Vec::new();
        }
        match self.input {
            InputState::Dragging { id, anchor, orig_x, orig_y, .. } => self.drag_to(id, anchor, orig_x, orig_y, client),
            InputState::Resizing { id, anchor, orig_w, orig_h } => {
                let dx = client.x - anchor.x;
                let aspect = if orig_w > 0.0 { orig_h / orig_w } else { 1.0 };
                let width = (orig_w + dx).max(MIN_TILE_SIZE);
                let height = width * aspect;
                let fields = PartialTile::size(
                    snap_if(width, self.ui.snap_to_grid, self.ui.grid_size).max(MIN_TILE_SIZE),
                    snap_if(height, self.ui.snap_to_grid, self.ui.grid_size),
                );
                self.update(id, fields)
            }
            InputState::Scaling { id, anchor, orig_scale } => {
                let dx = client.x - anchor.x;
                let scale = clamp_scale(orig_scale * (1.0 + dx / SCALE_DRAG_PX));
                self.update(id, PartialTile::scale(scale))
            }
            InputState::Idle | InputState::ScaleHold { .. } | InputState::Pinching { .. } => Vec::new(),
        }
    }

    /// Mouse-up anywhere: ends the gesture and releases window listeners.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Pinching { .. })
            || matches!(self.input, InputState::Dragging { captured: false, .. })
        {
            return Vec::new();
        }
        self.finish_gesture()
    }

    /// Wheel over a hovered tile adjusts its scale directly.
    pub fn on_wheel(&mut self, id: TileId, delta: WheelDelta) -> Vec<Action> {
        if !self.ui.is_editing() || self.ui.hovered_id != Some(id) {
            return Vec::new();
        }
        let Some(tile) = self.collection.get(&id) else {
            return Vec::new();
        };
        let scale = clamp_scale(tile.scale - delta.dy / WHEEL_SCALE_DIVISOR);
        let actions = self.update(id, PartialTile::scale(scale));
        if !actions.is_empty() && matches!(self.input, InputState::Idle) {
            self.history.push(self.collection.layout());
        }
        actions
    }

    // --- Touch ---

    /// Touch start on a tile. Two touches begin a pinch, one touch a drag.
    pub fn on_touch_start(&mut self, id: TileId, touches: &[Point]) -> Vec<Action> {
        if !self.ui.is_editing() {
            return Vec::new();
        }
        let Some(tile) = self.collection.get(&id) else {
            return Vec::new();
        };
        let start = tile.geometry();

        match touches {
            [a, b] => {
                // A second finger may join a single-touch drag on the same tile.
                let joinable = match self.input {
                    InputState::Idle => true,
                    InputState::Dragging { id: drag_id, captured: false, .. } => drag_id == id,
                    _ => false,
                };
                if !joinable {
                    return Vec::new();
                }
                self.input = InputState::Pinching { id, start_distance: a.distance(*b), orig_scale: start.scale };
                if self.gesture_start.is_none() {
                    self.gesture_start = Some(start);
                }
                Vec::new()
            }
            [only] => {
                if !matches!(self.input, InputState::Idle) {
                    return Vec::new();
                }
                self.input = InputState::Dragging {
                    id,
                    anchor: *only,
                    orig_x: start.position_x,
                    orig_y: start.position_y,
                    captured: false,
                };
                self.gesture_start = Some(start);
                self.ui.selected_id = Some(id);
                vec![Action::Selected { id }]
            }
            _ => Vec::new(),
        }
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        if !self.ui.is_editing() {
            return Vec::new();
        }
        match (touches, &self.input) {
            ([a, b], InputState::Pinching { id, start_distance, orig_scale }) => {
                if *start_distance <= 0.0 {
                    return Vec::new();
                }
                let scale = clamp_scale(orig_scale * (a.distance(*b) / start_distance));
                let id = *id;
                self.update(id, PartialTile::scale(scale))
            }
            ([only], InputState::Dragging { id, anchor, orig_x, orig_y, captured: false }) => {
                let (id, anchor, orig_x, orig_y) = (*id, *anchor, *orig_x, *orig_y);
                self.drag_to(id, anchor, orig_x, orig_y, *only)
            }
            _ => Vec::new(),
        }
    }

    pub fn on_touch_end(&mut self) -> Vec<Action> {
        match self.input {
            InputState::Pinching { .. } | InputState::Dragging { captured: false, .. } => self.finish_gesture(),
            _ => Vec::new(),
        }
    }

    // --- Discrete actions ---

    /// Rotate a tile by 90 degrees.
    pub fn rotate(&mut self, id: TileId) -> Vec<Action> {
        if !self.ui.is_editing() {
            return Vec::new();
        }
        let Some(tile) = self.collection.get(&id) else {
            return Vec::new();
        };
        let actions = self.update(id, PartialTile::rotation(tile.next_rotation()));
        self.history.push(self.collection.layout());
        actions
    }

    pub fn bring_forward(&mut self, id: TileId) -> Vec<Action> {
        self.shift_z(id, ZDirection::Forward)
    }

    pub fn send_backward(&mut self, id: TileId) -> Vec<Action> {
        self.shift_z(id, ZDirection::Backward)
    }

    pub fn request_edit(&mut self, id: TileId) -> Vec<Action> {
        if !self.ui.is_editing() || self.collection.get(&id).is_none() {
            return Vec::new();
        }
        vec![Action::EditRequested { id }]
    }

    pub fn request_delete(&mut self, id: TileId) -> Vec<Action> {
        if !self.ui.is_editing() || self.collection.get(&id).is_none() {
            return Vec::new();
        }
        vec![Action::DeleteRequested { id }]
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        let Some(layout) = self.history.undo() else {
            return Vec::new();
        };
        self.collection.restore_layout(&layout);
        vec![Action::LayoutReplaced]
    }

    pub fn redo(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        let Some(layout) = self.history.redo() else {
            return Vec::new();
        };
        self.collection.restore_layout(&layout);
        vec![Action::LayoutReplaced]
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Teardown ---

    /// End whatever gesture is in progress. Called on unmount so window
    /// listeners and timers never outlive the editor.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        self.finish_gesture()
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<TileId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn tile(&self, id: &TileId) -> Option<&Tile> {
        self.collection.get(id)
    }

    /// Geometry of every tile, ready for a layout save.
    #[must_use]
    pub fn layout_patches(&self) -> Vec<LayoutPatch> {
        self.collection.layout()
    }

    /// Presentation of one tile, reflecting any gesture in progress.
    #[must_use]
    pub fn tile_style(&self, id: &TileId) -> Option<TileStyle> {
        let tile = self.collection.get(id)?;
        let active = self.input.is_active() && self.input.tile_id() == Some(*id);
        Some(TileStyle {
            left: tile.position_x,
            top: tile.position_y,
            width: tile.width,
            height: tile.height,
            opacity: if active { ACTIVE_OPACITY } else { 1.0 },
            z_index: if active { ACTIVE_Z_INDEX } else { tile.z_index },
            transform: format!("scale({}) rotate({}deg)", tile.scale, tile.rotation),
        })
    }

    // --- Internals ---

    fn drag_to(&mut self, id: TileId, anchor: Point, orig_x: f64, orig_y: f64, client: Point) -> Vec<Action> {
        let delta = client.delta_from(anchor);
        let x = snap_if(orig_x + delta.x, self.ui.snap_to_grid, self.ui.grid_size);
        let y = snap_if(orig_y + delta.y, self.ui.snap_to_grid, self.ui.grid_size);
        self.update(id, PartialTile::position(x, y))
    }

    fn update(&mut self, id: TileId, fields: PartialTile) -> Vec<Action> {
        if !self.collection.apply_partial(&id, &fields) {
            return Vec::new();
        }
        vec![Action::TileUpdated { id, fields }]
    }

    fn shift_z(&mut self, id: TileId, direction: ZDirection) -> Vec<Action> {
        if !self.ui.is_editing() {
            return Vec::new();
        }
        let Some(change) = self.collection.shift(&id, direction) else {
            return Vec::new();
        };
        self.history.push(self.collection.layout());
        change
            .updates
            .into_iter()
            .map(|(id, z)| Action::TileUpdated { id, fields: PartialTile::z_index(z) })
            .collect()
    }

    fn finish_gesture(&mut self) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        let start = self.gesture_start.take();
        let mut actions = Vec::new();

        if state.holds_window() {
            actions.push(Action::ReleaseWindow);
        }
        if matches!(state, InputState::ScaleHold { .. }) {
            actions.push(Action::CancelHoldTimer);
        }

        if let (Some(id), Some(start)) = (state.tile_id(), start)
            && let Some(tile) = self.collection.get(&id)
            && tile.geometry() != start
        {
            self.history.push(self.collection.layout());
        }
        actions
    }
}

/// Dimension readout shown under a selected tile, e.g. `300 × 400 | 1.00x`.
#[must_use]
pub fn dimension_label(tile: &Tile) -> String {
    format!("{} × {} | {:.2}x", tile.width.round(), tile.height.round(), tile.scale)
}

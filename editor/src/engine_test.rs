#![allow(clippy::float_cmp)]

use serde_json::{Map, json};
use uuid::Uuid;

use super::*;
use crate::input::Handle;

// =============================================================
// Helpers
// =============================================================

fn make_tile(x: f64, y: f64, w: f64, h: f64, z: i64) -> Tile {
    Tile {
        id: Uuid::new_v4(),
        category: "selected".into(),
        title: None,
        image_url: "https://cdn.example/selected/a.jpg".into(),
        display_order: 0,
        position_x: x,
        position_y: y,
        width: w,
        height: h,
        scale: 1.0,
        rotation: 0.0,
        z_index: z,
        is_draft: false,
        metadata: Map::new(),
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn core_with(tiles: Vec<Tile>) -> EditorCore {
    let mut core = EditorCore::new();
    core.load_tiles(tiles);
    core
}

fn single() -> (EditorCore, TileId) {
    let tile = make_tile(100.0, 100.0, 300.0, 400.0, 0);
    let id = tile.id;
    (core_with(vec![tile]), id)
}

fn geometry(core: &EditorCore, id: &TileId) -> Geometry {
    core.tile(id).map(Tile::geometry).unwrap()
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_moves_by_pointer_delta() {
    let (mut core, id) = single();
    let actions = core.on_pointer_down(id, Handle::Body, pt(500.0, 500.0), Button::Primary);
    assert_eq!(actions, vec![Action::Selected { id }, Action::CaptureWindow]);
    assert_eq!(core.selection(), Some(id));

    let actions = core.on_pointer_move(pt(553.0, 488.0));
    assert_eq!(actions, vec![Action::TileUpdated { id, fields: PartialTile::position(153.0, 88.0) }]);
}

#[test]
fn drag_snaps_to_grid_when_enabled() {
    let (mut core, id) = single();
    core.set_snap_to_grid(true);
    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(pt(53.0, -12.0));
    let g = geometry(&core, &id);
    assert_eq!((g.position_x, g.position_y), (160.0, 80.0));
}

#[test]
fn drag_is_computed_from_anchor_not_accumulated() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    for step in 1..=10 {
        core.on_pointer_move(pt(f64::from(step), 0.0));
    }
    core.on_pointer_move(pt(5.0, 5.0));
    let g = geometry(&core, &id);
    assert_eq!((g.position_x, g.position_y), (105.0, 105.0));
}

#[test]
fn drag_release_restores_appearance_and_releases_window() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    let style = core.tile_style(&id).unwrap();
    assert_eq!(style.opacity, 0.7);
    assert_eq!(style.z_index, 9999);

    core.on_pointer_move(pt(10.0, 0.0));
    let actions = core.on_pointer_up();
    assert_eq!(actions, vec![Action::ReleaseWindow]);
    assert!(matches!(core.input, InputState::Idle));

    let style = core.tile_style(&id).unwrap();
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.z_index, 0);
    assert_eq!(style.left, 110.0);
}

#[test]
fn non_primary_button_is_ignored() {
    let (mut core, id) = single();
    assert!(core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Secondary).is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn pointer_down_on_unknown_tile_is_ignored() {
    let (mut core, _) = single();
    assert!(core.on_pointer_down(Uuid::new_v4(), Handle::Body, pt(0.0, 0.0), Button::Primary).is_empty());
}

#[test]
fn move_without_gesture_does_nothing() {
    let (mut core, _) = single();
    assert!(core.on_pointer_move(pt(10.0, 10.0)).is_empty());
    assert!(core.on_pointer_up().is_empty());
}

// =============================================================
// Resize
// =============================================================

#[test]
fn resize_locks_aspect_ratio() {
    let (mut core, id) = single();
    let actions = core.on_pointer_down(id, Handle::Resize, pt(400.0, 500.0), Button::Primary);
    assert_eq!(actions, vec![Action::CaptureWindow]);
    core.on_pointer_move(pt(460.0, 900.0));
    let g = geometry(&core, &id);
    assert_eq!(g.width, 360.0);
    assert_eq!(g.height, 480.0);
    assert_eq!((g.position_x, g.position_y), (100.0, 100.0));
}

#[test]
fn resize_floors_width_at_minimum() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Resize, pt(400.0, 500.0), Button::Primary);
    core.on_pointer_move(pt(0.0, 500.0));
    let g = geometry(&core, &id);
    assert_eq!(g.width, 100.0);
    assert!((g.height - 400.0 / 3.0).abs() < 1e-9);
}

#[test]
fn resize_snaps_both_dimensions() {
    let (mut core, id) = single();
    core.set_snap_to_grid(true);
    core.on_pointer_down(id, Handle::Resize, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(pt(33.0, 0.0));
    let g = geometry(&core, &id);
    // 333 -> 340; height 444 -> 440.
    assert_eq!(g.width, 340.0);
    assert_eq!(g.height, 440.0);
}

// =============================================================
// Scale hold
// =============================================================

#[test]
fn scale_handle_arms_hold_timer() {
    let (mut core, id) = single();
    let actions = core.on_pointer_down(id, Handle::Scale, pt(10.0, 10.0), Button::Primary);
    assert_eq!(actions, vec![Action::StartHoldTimer { ms: 500 }]);
    assert!(matches!(core.input, InputState::ScaleHold { .. }));
    // Not active until the hold elapses.
    assert_eq!(core.tile_style(&id).unwrap().opacity, 1.0);
}

#[test]
fn moves_before_hold_elapses_do_not_scale() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Scale, pt(10.0, 10.0), Button::Primary);
    assert!(core.on_pointer_move(pt(200.0, 10.0)).is_empty());
    assert_eq!(geometry(&core, &id).scale, 1.0);
}

#[test]
fn release_before_hold_cancels_timer() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Scale, pt(10.0, 10.0), Button::Primary);
    let actions = core.on_pointer_up();
    assert_eq!(actions, vec![Action::CancelHoldTimer]);
    assert!(core.on_hold_elapsed().is_empty());
    assert_eq!(geometry(&core, &id).scale, 1.0);
}

#[test]
fn hold_then_drag_scales_from_press_anchor() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Scale, pt(10.0, 10.0), Button::Primary);
    assert_eq!(core.on_hold_elapsed(), vec![Action::CaptureWindow]);
    core.on_pointer_move(pt(110.0, 10.0));
    assert_eq!(geometry(&core, &id).scale, 1.5);
    assert_eq!(core.tile_style(&id).unwrap().z_index, 9999);
}

#[test]
fn hold_scale_is_clamped() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Scale, pt(0.0, 0.0), Button::Primary);
    core.on_hold_elapsed();
    core.on_pointer_move(pt(2000.0, 0.0));
    assert_eq!(geometry(&core, &id).scale, 3.0);
    core.on_pointer_move(pt(-2000.0, 0.0));
    assert_eq!(geometry(&core, &id).scale, 0.5);
    assert_eq!(core.on_pointer_up(), vec![Action::ReleaseWindow]);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_up_on_hovered_tile_grows_scale() {
    let (mut core, id) = single();
    core.on_pointer_enter(id);
    let actions = core.on_wheel(id, WheelDelta { dx: 0.0, dy: -200.0 });
    assert_eq!(actions, vec![Action::TileUpdated { id, fields: PartialTile::scale(1.2) }]);
}

#[test]
fn wheel_requires_hover() {
    let (mut core, id) = single();
    assert!(core.on_wheel(id, WheelDelta { dx: 0.0, dy: -200.0 }).is_empty());
    core.on_pointer_enter(id);
    core.on_pointer_leave(id);
    assert!(core.on_wheel(id, WheelDelta { dx: 0.0, dy: -200.0 }).is_empty());
}

#[test]
fn wheel_scale_is_clamped() {
    let (mut core, id) = single();
    core.on_pointer_enter(id);
    core.on_wheel(id, WheelDelta { dx: 0.0, dy: 5000.0 });
    assert_eq!(geometry(&core, &id).scale, 0.5);
}

// =============================================================
// Touch
// =============================================================

#[test]
fn pinch_scales_by_distance_ratio() {
    let (mut core, id) = single();
    core.on_touch_start(id, &[pt(0.0, 0.0), pt(100.0, 0.0)]);
    core.on_touch_move(&[pt(0.0, 0.0), pt(150.0, 0.0)]);
    assert_eq!(geometry(&core, &id).scale, 1.5);
    core.on_touch_move(&[pt(0.0, 0.0), pt(1000.0, 0.0)]);
    assert_eq!(geometry(&core, &id).scale, 3.0);
    assert!(core.on_touch_end().is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn pinch_with_zero_start_distance_is_ignored() {
    let (mut core, id) = single();
    core.on_touch_start(id, &[pt(5.0, 5.0), pt(5.0, 5.0)]);
    assert!(core.on_touch_move(&[pt(0.0, 0.0), pt(100.0, 0.0)]).is_empty());
    assert_eq!(geometry(&core, &id).scale, 1.0);
}

#[test]
fn single_touch_drags_without_window_capture() {
    let (mut core, id) = single();
    let actions = core.on_touch_start(id, &[pt(0.0, 0.0)]);
    assert_eq!(actions, vec![Action::Selected { id }]);
    core.on_touch_move(&[pt(20.0, 30.0)]);
    let g = geometry(&core, &id);
    assert_eq!((g.position_x, g.position_y), (120.0, 130.0));
    // Synthetic mouse-up must not end a touch drag.
    assert!(core.on_pointer_up().is_empty());
    assert!(core.on_touch_end().is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn second_finger_turns_drag_into_pinch() {
    let (mut core, id) = single();
    core.on_touch_start(id, &[pt(0.0, 0.0)]);
    core.on_touch_start(id, &[pt(0.0, 0.0), pt(50.0, 0.0)]);
    assert!(matches!(core.input, InputState::Pinching { .. }));
    core.on_touch_move(&[pt(0.0, 0.0), pt(100.0, 0.0)]);
    assert_eq!(geometry(&core, &id).scale, 2.0);
}

// =============================================================
// Exclusivity / mode
// =============================================================

#[test]
fn second_gesture_is_refused_while_one_is_active() {
    let a = make_tile(0.0, 0.0, 300.0, 400.0, 0);
    let b = make_tile(500.0, 0.0, 300.0, 400.0, 1);
    let (ida, idb) = (a.id, b.id);
    let mut core = core_with(vec![a, b]);

    core.on_pointer_down(ida, Handle::Body, pt(0.0, 0.0), Button::Primary);
    assert!(core.on_pointer_down(ida, Handle::Resize, pt(0.0, 0.0), Button::Primary).is_empty());
    assert!(core.on_pointer_down(idb, Handle::Scale, pt(0.0, 0.0), Button::Primary).is_empty());
    assert!(core.on_touch_start(idb, &[pt(0.0, 0.0)]).is_empty());
    assert!(matches!(core.input, InputState::Dragging { .. }));
}

#[test]
fn preview_mode_ignores_all_input() {
    let (mut core, id) = single();
    core.set_mode(EditorMode::Preview);
    core.on_pointer_enter(id);
    assert!(core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary).is_empty());
    assert!(core.on_wheel(id, WheelDelta { dx: 0.0, dy: -100.0 }).is_empty());
    assert!(core.on_touch_start(id, &[pt(0.0, 0.0)]).is_empty());
    assert!(core.rotate(id).is_empty());
    assert!(core.bring_forward(id).is_empty());
    assert!(core.request_edit(id).is_empty());
    assert!(core.request_delete(id).is_empty());
}

#[test]
fn switching_to_preview_ends_gesture() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Resize, pt(0.0, 0.0), Button::Primary);
    assert_eq!(core.set_mode(EditorMode::Preview), vec![Action::ReleaseWindow]);
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn cancel_gesture_releases_listeners_and_timers() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Scale, pt(0.0, 0.0), Button::Primary);
    assert_eq!(core.cancel_gesture(), vec![Action::CancelHoldTimer]);

    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    assert_eq!(core.cancel_gesture(), vec![Action::ReleaseWindow]);
    assert!(core.cancel_gesture().is_empty());
}

// =============================================================
// Discrete actions
// =============================================================

#[test]
fn rotate_steps_ninety_degrees() {
    let (mut core, id) = single();
    for expected in [90.0, 180.0, 270.0, 0.0] {
        let actions = core.rotate(id);
        assert_eq!(actions, vec![Action::TileUpdated { id, fields: PartialTile::rotation(expected) }]);
    }
}

#[test]
fn bring_forward_swaps_with_neighbour() {
    let a = make_tile(0.0, 0.0, 100.0, 100.0, 1);
    let b = make_tile(0.0, 0.0, 100.0, 100.0, 2);
    let (ida, idb) = (a.id, b.id);
    let mut core = core_with(vec![a, b]);

    let actions = core.bring_forward(ida);
    assert_eq!(
        actions,
        vec![
            Action::TileUpdated { id: ida, fields: PartialTile::z_index(2) },
            Action::TileUpdated { id: idb, fields: PartialTile::z_index(1) },
        ]
    );
    assert!(core.bring_forward(ida).is_empty());
}

#[test]
fn send_backward_at_bottom_is_noop() {
    let (mut core, id) = single();
    assert!(core.send_backward(id).is_empty());
}

#[test]
fn requests_are_forwarded_to_host() {
    let (mut core, id) = single();
    assert_eq!(core.request_edit(id), vec![Action::EditRequested { id }]);
    assert_eq!(core.request_delete(id), vec![Action::DeleteRequested { id }]);
    assert!(core.request_edit(Uuid::new_v4()).is_empty());
}

#[test]
fn apply_metadata_updates_local_tile() {
    let (mut core, id) = single();
    let mut fields = Map::new();
    fields.insert("title".into(), json!("Harvest"));
    fields.insert("caption".into(), json!("Late light"));
    let actions = core.apply_metadata(&id, PartialTile::metadata(fields));
    assert_eq!(actions.len(), 1);
    let tile = core.tile(&id).unwrap();
    assert_eq!(tile.title.as_deref(), Some("Harvest"));
    assert_eq!(tile.meta_str("caption"), Some("Late light"));
}

#[test]
fn remove_tile_clears_selection_and_history() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(pt(10.0, 0.0));
    core.on_pointer_up();
    assert!(core.can_undo());

    core.remove_tile(&id);
    assert!(core.selection().is_none());
    assert!(core.tile(&id).is_none());
    assert!(!core.can_undo());
}

// =============================================================
// History
// =============================================================

#[test]
fn undo_and_redo_a_drag() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(pt(50.0, 0.0));
    core.on_pointer_up();

    assert_eq!(core.undo(), vec![Action::LayoutReplaced]);
    assert_eq!(geometry(&core, &id).position_x, 100.0);
    assert_eq!(core.redo(), vec![Action::LayoutReplaced]);
    assert_eq!(geometry(&core, &id).position_x, 150.0);
}

#[test]
fn undo_keeps_metadata_saved_after_a_drag() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(pt(50.0, 0.0));
    core.on_pointer_up();

    let mut fields = Map::new();
    fields.insert("caption".into(), json!("saved caption"));
    core.apply_metadata(&id, PartialTile::metadata(fields));

    assert_eq!(core.undo(), vec![Action::LayoutReplaced]);
    assert_eq!(geometry(&core, &id).position_x, 100.0);
    assert_eq!(core.tile(&id).unwrap().meta_str("caption"), Some("saved caption"));

    core.redo();
    assert_eq!(geometry(&core, &id).position_x, 150.0);
    assert_eq!(core.tile(&id).unwrap().meta_str("caption"), Some("saved caption"));
}

#[test]
fn undo_after_upload_keeps_the_new_tile() {
    let (mut core, id) = single();
    core.rotate(id);
    let added = make_tile(400.0, 0.0, 300.0, 400.0, 1);
    let added_id = added.id;
    core.add_tile(added);

    core.undo();
    assert!(core.tile(&added_id).is_some());
    core.undo();
    assert_eq!(geometry(&core, &id).rotation, 0.0);
}

#[test]
fn click_without_movement_adds_no_history() {
    let (mut core, id) = single();
    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_up();
    assert!(!core.can_undo());
}

#[test]
fn undo_is_refused_mid_gesture() {
    let (mut core, id) = single();
    core.rotate(id);
    core.on_pointer_down(id, Handle::Body, pt(0.0, 0.0), Button::Primary);
    assert!(core.undo().is_empty());
}

// =============================================================
// Queries
// =============================================================

#[test]
fn tile_style_transform_composes_scale_and_rotation() {
    let mut tile = make_tile(10.0, 20.0, 300.0, 400.0, 3);
    tile.scale = 1.5;
    tile.rotation = 90.0;
    let id = tile.id;
    let core = core_with(vec![tile]);
    let style = core.tile_style(&id).unwrap();
    assert_eq!(style.transform, "scale(1.5) rotate(90deg)");
    assert_eq!((style.left, style.top), (10.0, 20.0));
    assert_eq!(style.z_index, 3);
}

#[test]
fn layout_patches_cover_every_tile() {
    let a = make_tile(0.0, 0.0, 100.0, 100.0, 0);
    let b = make_tile(5.0, 5.0, 100.0, 100.0, 1);
    let core = core_with(vec![a.clone(), b.clone()]);
    let patches = core.layout_patches();
    assert_eq!(patches.len(), 2);
    assert_eq!(patches[1], LayoutPatch { id: b.id, geometry: b.geometry() });
}

#[test]
fn dimension_label_rounds_size_and_formats_scale() {
    let mut tile = make_tile(0.0, 0.0, 300.4, 399.6, 0);
    tile.scale = 1.25;
    assert_eq!(dimension_label(&tile), "300 × 400 | 1.25x");
}

use serde_json::{Map, json};
use uuid::Uuid;

use super::*;
use crate::collection::Collection;

fn make_tile() -> Tile {
    let mut metadata = Map::new();
    metadata.insert("caption".into(), json!("Original caption"));
    Tile {
        id: Uuid::new_v4(),
        category: "editorial".into(),
        title: Some("Harbour".into()),
        image_url: "u".into(),
        display_order: 0,
        position_x: 0.0,
        position_y: 0.0,
        width: 300.0,
        height: 400.0,
        scale: 1.0,
        rotation: 0.0,
        z_index: 0,
        is_draft: false,
        metadata,
    }
}

#[test]
fn open_seeds_form_from_tile() {
    let tile = make_tile();
    let panel = MetadataPanel::open(Gallery::Photos, &tile);
    assert_eq!(panel.tile_id(), tile.id);
    assert_eq!(panel.form().title, "Harbour");
    assert_eq!(panel.form().caption, "Original caption");
    assert!(!panel.is_saving());
}

#[test]
fn invalid_form_blocks_save_without_request() {
    let mut panel = MetadataPanel::open(Gallery::Photos, &make_tile());
    panel.edit(|f| f.caption = "a".repeat(501));
    let start = panel.begin_save();
    assert_eq!(start, SaveStart::Blocked(Toast::error("Please fix validation errors")));
    assert!(!panel.is_saving());
    assert_eq!(panel.errors().get("caption"), Some("Caption must be 500 characters or less"));
}

#[test]
fn valid_form_submits_and_sets_saving() {
    let tile = make_tile();
    let mut panel = MetadataPanel::open(Gallery::Photos, &tile);
    panel.edit(|f| f.caption = "New caption".into());
    let SaveStart::Submit { id, gallery, body } = panel.begin_save() else {
        panic!("expected submit");
    };
    assert_eq!(id, tile.id);
    assert_eq!(gallery, Gallery::Photos);
    assert_eq!(body.caption, "New caption");
    assert!(panel.is_saving());
}

#[test]
fn double_submit_is_refused() {
    let mut panel = MetadataPanel::open(Gallery::Photos, &make_tile());
    assert!(matches!(panel.begin_save(), SaveStart::Submit { .. }));
    assert_eq!(panel.begin_save(), SaveStart::Busy);
}

#[test]
fn fixing_errors_clears_them_on_next_save() {
    let mut panel = MetadataPanel::open(Gallery::Photos, &make_tile());
    panel.edit(|f| f.date_taken = "yesterday".into());
    assert!(matches!(panel.begin_save(), SaveStart::Blocked(_)));
    panel.edit(|f| f.date_taken = "2024-05-12".into());
    assert!(matches!(panel.begin_save(), SaveStart::Submit { .. }));
    assert!(panel.errors().is_empty());
}

#[test]
fn successful_save_returns_patch_for_parent_sync() {
    let tile = make_tile();
    let mut collection = Collection::new();
    collection.insert(tile.clone());

    let mut panel = MetadataPanel::open(Gallery::Photos, &tile);
    panel.edit(|f| f.caption = "  Dusk  ".into());
    panel.begin_save();
    let SaveOutcome::Saved { id, patch, toast } = panel.finish_save(Ok(())) else {
        panic!("expected saved");
    };
    assert_eq!(toast, Toast::success("Changes saved successfully"));
    assert!(!panel.is_saving());

    assert!(collection.apply_partial(&id, &patch));
    assert_eq!(collection.get(&id).unwrap().meta_str("caption"), Some("Dusk"));
}

#[test]
fn failed_save_keeps_values_and_reports_message() {
    let mut panel = MetadataPanel::open(Gallery::Photos, &make_tile());
    panel.edit(|f| f.caption = "Keep me".into());
    panel.begin_save();
    let outcome = panel.finish_save(Err("connection reset".into()));
    assert_eq!(outcome, SaveOutcome::Failed(Toast::error("Failed to save changes: connection reset")));
    assert!(!panel.is_saving());
    assert_eq!(panel.form().caption, "Keep me");
}

#[test]
fn finish_without_begin_is_ignored() {
    let mut panel = MetadataPanel::open(Gallery::Photos, &make_tile());
    assert_eq!(panel.finish_save(Ok(())), SaveOutcome::Ignored);
}

#[test]
fn escape_closes_unless_saving() {
    let mut panel = MetadataPanel::open(Gallery::Photos, &make_tile());
    let escape = Key("Escape".into());
    assert!(panel.on_key(&escape));
    assert!(!panel.on_key(&Key("a".into())));

    panel.begin_save();
    assert!(!panel.on_key(&escape));
    assert!(!panel.cancel());
    assert!(!panel.edit(|f| f.caption = "late".into()));
}

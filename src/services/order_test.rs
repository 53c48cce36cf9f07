use super::*;
use crate::state::test_helpers::{seed_tile, test_app_state};

async fn z_of(state: &AppState, id: Uuid) -> i64 {
    get_tile(state, Gallery::Photos, id).await.unwrap().z_index
}

#[tokio::test]
async fn bring_forward_swaps_with_next_higher() {
    let (state, _, _) = test_app_state();
    let a = seed_tile(&state, Gallery::Photos, "selected", 0, 1).await;
    let b = seed_tile(&state, Gallery::Photos, "selected", 1, 2).await;
    let c = seed_tile(&state, Gallery::Photos, "selected", 2, 3).await;

    let change = shift_z(&state, Gallery::Photos, a.id, ZDirection::Forward).await.unwrap().unwrap();
    assert_eq!(change.updates, vec![(a.id, 2), (b.id, 1)]);
    assert_eq!(z_of(&state, a.id).await, 2);
    assert_eq!(z_of(&state, b.id).await, 1);
    assert_eq!(z_of(&state, c.id).await, 3);
}

#[tokio::test]
async fn send_backward_on_bottom_tile_is_no_op() {
    let (state, _, _) = test_app_state();
    let a = seed_tile(&state, Gallery::Photos, "selected", 0, 1).await;
    seed_tile(&state, Gallery::Photos, "selected", 1, 2).await;

    assert_eq!(shift_z(&state, Gallery::Photos, a.id, ZDirection::Backward).await.unwrap(), None);
    assert_eq!(z_of(&state, a.id).await, 1);
}

#[tokio::test]
async fn equal_z_moves_target_past_neighbour() {
    let (state, _, _) = test_app_state();
    let a = seed_tile(&state, Gallery::Photos, "selected", 0, 5).await;
    let b = seed_tile(&state, Gallery::Photos, "selected", 1, 5).await;

    let change = shift_z(&state, Gallery::Photos, a.id, ZDirection::Forward).await.unwrap().unwrap();
    assert_eq!(change.updates, vec![(a.id, 6)]);
    assert_eq!(z_of(&state, b.id).await, 5);
}

#[tokio::test]
async fn other_categories_are_not_neighbours() {
    let (state, _, _) = test_app_state();
    let a = seed_tile(&state, Gallery::Photos, "selected", 0, 1).await;
    let other = seed_tile(&state, Gallery::Photos, "personal", 0, 2).await;

    assert_eq!(shift_z(&state, Gallery::Photos, a.id, ZDirection::Forward).await.unwrap(), None);
    assert_eq!(z_of(&state, other.id).await, 2);
}

#[tokio::test]
async fn unknown_tile_is_not_found() {
    let (state, _, _) = test_app_state();
    let err = shift_z(&state, Gallery::Photos, Uuid::new_v4(), ZDirection::Forward).await.unwrap_err();
    assert!(matches!(err, TileError::NotFound(_)));
}

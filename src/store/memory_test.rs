use serde_json::json;

use super::*;
use crate::store::get_by_id;

fn tile_row(category: &str, order: i64, z: i64) -> Row {
    let Value::Object(row) = json!({
        "id": Uuid::new_v4().to_string(),
        "category": category,
        "image_url": "u",
        "display_order": order,
        "z_index": z,
    }) else {
        return Row::new();
    };
    row
}

#[tokio::test]
async fn insert_then_select_by_filter() {
    let store = MemoryRowStore::new();
    store.insert(Table::Photos, tile_row("selected", 0, 0)).await.unwrap();
    store.insert(Table::Photos, tile_row("personal", 0, 0)).await.unwrap();

    let rows = store.select(Table::Photos, &Query::new().eq("category", "selected")).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["category"], json!("selected"));
}

#[tokio::test]
async fn insert_assigns_missing_id() {
    let store = MemoryRowStore::new();
    let mut row = tile_row("selected", 0, 0);
    row.remove("id");
    let stored = store.insert(Table::Photos, row).await.unwrap();
    assert!(stored["id"].as_str().is_some_and(|s| Uuid::parse_str(s).is_ok()));
}

#[tokio::test]
async fn select_orders_and_limits() {
    let store = MemoryRowStore::new();
    for (order, z) in [(0, 5), (1, 2), (2, 9)] {
        store.insert(Table::Artworks, tile_row("sketches", order, z)).await.unwrap();
    }
    let q = Query::new().eq("category", "sketches").order_by("z_index", SortDir::Desc).limit(1);
    let rows = store.select(Table::Artworks, &q).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["z_index"], json!(9));
}

#[tokio::test]
async fn numeric_filters_match_across_int_and_float() {
    let store = MemoryRowStore::new();
    store.insert(Table::Photos, tile_row("selected", 3, 0)).await.unwrap();
    let rows = store.select(Table::Photos, &Query::new().eq("display_order", 3.0)).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn duplicate_display_slot_conflicts() {
    let store = MemoryRowStore::new();
    store.insert(Table::Photos, tile_row("selected", 4, 0)).await.unwrap();
    let err = store.insert(Table::Photos, tile_row("selected", 4, 1)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    // Same order in another category is fine.
    store.insert(Table::Photos, tile_row("editorial", 4, 1)).await.unwrap();
}

#[tokio::test]
async fn update_merges_patch() {
    let store = MemoryRowStore::new();
    let row = store.insert(Table::Photos, tile_row("selected", 0, 0)).await.unwrap();
    let id = Uuid::parse_str(row["id"].as_str().unwrap()).unwrap();

    let Value::Object(patch) = json!({ "position_x": 40.0, "caption": "Dusk" }) else {
        return;
    };
    store.update(Table::Photos, id, patch).await.unwrap();

    let stored = get_by_id(&store, Table::Photos, id).await.unwrap();
    assert_eq!(stored["position_x"], json!(40.0));
    assert_eq!(stored["caption"], json!("Dusk"));
    assert_eq!(stored["category"], json!("selected"));
}

#[tokio::test]
async fn update_missing_row_is_not_found() {
    let store = MemoryRowStore::new();
    let id = Uuid::new_v4();
    let err = store.update(Table::Photos, id, Row::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn unknown_columns_are_rejected() {
    let store = MemoryRowStore::new();
    let mut row = tile_row("selected", 0, 0);
    row.insert("creation_date".into(), json!("2024-01-01"));
    let err = store.insert(Table::Photos, row).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidColumn { .. }));

    let err = store.select(Table::Photos, &Query::new().eq("nope", 1)).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidColumn { .. }));
}

#[tokio::test]
async fn delete_removes_row() {
    let store = MemoryRowStore::new();
    let row = store.insert(Table::Photos, tile_row("selected", 0, 0)).await.unwrap();
    let id = Uuid::parse_str(row["id"].as_str().unwrap()).unwrap();
    store.delete(Table::Photos, id).await.unwrap();
    assert!(matches!(get_by_id(&store, Table::Photos, id).await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete(Table::Photos, id).await, Err(StoreError::NotFound(_))));
}

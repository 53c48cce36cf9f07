//! In-process row store for tests and local development.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Query, Row, RowStore, SortDir, StoreError, Table};

/// Rows per table, in insertion order.
#[derive(Default)]
pub struct MemoryRowStore {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
}

impl MemoryRowStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Order JSON scalars: null first, then booleans, numbers, strings.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().unwrap_or(0.0).total_cmp(&y.as_f64().unwrap_or(0.0))
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Numbers compare by value so `3` matches `3.0`.
fn cell_matches(row: &Row, column: &str, expected: &Value) -> bool {
    match (row.get(column), expected) {
        (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(actual), _) => actual == expected,
        (None, Value::Null) => true,
        (None, _) => false,
    }
}

/// Enforce unique `(category, display_order)` among tile rows.
fn check_display_slot(rows: &[Row], candidate: &Row) -> Result<(), StoreError> {
    let (Some(category), Some(order)) = (candidate.get("category"), candidate.get("display_order")) else {
        return Ok(());
    };
    let taken = rows.iter().any(|other| {
        row_id(other) != row_id(candidate)
            && cell_matches(other, "category", category)
            && cell_matches(other, "display_order", order)
    });
    if taken {
        return Err(StoreError::Conflict(format!("display_order {order} already used in category {category}")));
    }
    Ok(())
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
        table.check_columns(query.columns())?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|(col, val)| cell_matches(row, col, val)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Stable sort keeps insertion order among equal keys.
        rows.sort_by(|a, b| {
            query.order.iter().fold(Ordering::Equal, |acc, (col, dir)| {
                acc.then_with(|| {
                    let ord = compare(a.get(col), b.get(col));
                    match dir {
                        SortDir::Asc => ord,
                        SortDir::Desc => ord.reverse(),
                    }
                })
            })
        });
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, StoreError> {
        table.check_columns(row.keys().map(String::as_str))?;
        if row_id(&row).is_none() {
            row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        }
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        if let Some(id) = row_id(&row)
            && rows.iter().any(|r| row_id(r) == Some(id))
        {
            return Err(StoreError::Conflict(format!("duplicate id {id}")));
        }
        if table.holds_tiles() {
            check_display_slot(rows, &row)?;
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<(), StoreError> {
        table.check_columns(patch.keys().map(String::as_str))?;
        let key = id.to_string();
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        let index = rows.iter().position(|r| row_id(r) == Some(key.as_str())).ok_or(StoreError::NotFound(id))?;

        let mut merged = rows[index].clone();
        merged.extend(patch);
        if table.holds_tiles() {
            check_display_slot(rows, &merged)?;
        }
        rows[index] = merged;
        Ok(())
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), StoreError> {
        let key = id.to_string();
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        let index = rows.iter().position(|r| row_id(r) == Some(key.as_str())).ok_or(StoreError::NotFound(id))?;
        rows.remove(index);
        Ok(())
    }
}

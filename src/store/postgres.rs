//! Postgres row store.
//!
//! Rows are converted with `to_jsonb` on the way out and
//! `jsonb_populate_record` on the way in, so one code path serves every
//! table and column types come from the schema rather than from Rust.
//! Identifiers are spliced into SQL only after `Table::check_columns`
//! accepted them; values are always bound.

#[cfg(test)]
#[path = "postgres_test.rs"]
mod postgres_test;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{Query, Row, RowStore, StoreError, Table};

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgRowStore {
    pool: PgPool,
}

impl PgRowStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err
        && db.code().as_deref() == Some(UNIQUE_VIOLATION)
    {
        return StoreError::Conflict(db.message().to_owned());
    }
    StoreError::Database(err)
}

pub(crate) fn select_sql(table: Table, query: &Query) -> String {
    let name = table.name();
    let mut sql = format!("SELECT to_jsonb(t) FROM {name} AS t");
    for (i, (column, _)) in query.filters.iter().enumerate() {
        let keyword = if i == 0 { "WHERE" } else { "AND" };
        sql.push_str(&format!(" {keyword} to_jsonb(t) -> '{column}' = ${}", i + 1));
    }
    if !query.order.is_empty() {
        let terms: Vec<String> = query.order.iter().map(|(c, d)| format!("t.{c} {}", d.sql())).collect();
        sql.push_str(&format!(" ORDER BY {}", terms.join(", ")));
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    sql
}

pub(crate) fn insert_sql(table: Table, columns: &[&str]) -> String {
    let name = table.name();
    let list = columns.join(", ");
    format!("INSERT INTO {name} AS t ({list}) SELECT {list} FROM jsonb_populate_record(NULL::{name}, $1) RETURNING to_jsonb(t)")
}

pub(crate) fn update_sql(table: Table, columns: &[&str]) -> String {
    let name = table.name();
    let sets: Vec<String> = columns.iter().map(|c| format!("{c} = r.{c}")).collect();
    format!(
        "UPDATE {name} AS t SET {} FROM jsonb_populate_record(NULL::{name}, $1) AS r WHERE t.id = $2",
        sets.join(", ")
    )
}

#[async_trait]
impl RowStore for PgRowStore {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, StoreError> {
        table.check_columns(query.columns())?;
        let sql = select_sql(table, query);
        let mut q = sqlx::query_scalar::<_, Json<Value>>(&sql);
        for (_, value) in &query.filters {
            q = q.bind(Json(value.clone()));
        }
        let rows = q.fetch_all(&self.pool).await.map_err(map_db_error)?;
        rows.into_iter()
            .map(|Json(value)| match value {
                Value::Object(row) => Ok(row),
                other => Err(StoreError::InvalidRow(other.to_string())),
            })
            .collect()
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        table.check_columns(columns.iter().copied())?;
        if columns.is_empty() {
            return Err(StoreError::InvalidRow("empty row".into()));
        }
        let sql = insert_sql(table, &columns);
        let Json(stored) = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(Json(Value::Object(row.clone())))
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        match stored {
            Value::Object(stored) => Ok(stored),
            other => Err(StoreError::InvalidRow(other.to_string())),
        }
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<(), StoreError> {
        let columns: Vec<&str> = patch.keys().map(String::as_str).filter(|c| *c != "id").collect();
        table.check_columns(columns.iter().copied())?;
        if columns.is_empty() {
            return Ok(());
        }
        let sql = update_sql(table, &columns);
        let result = sqlx::query(&sql)
            .bind(Json(Value::Object(patch.clone())))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await.map_err(map_db_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

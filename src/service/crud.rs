//! Generic CRUD and join execution against SQLite.

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::model::Record;
use crate::service::ReferenceService;
use crate::sql::{bind_params, count_by_id, delete, insert, select_all, select_by_id, select_join, update_column, QueryBuf};
use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqlitePool, SqliteRow};
use std::sync::Arc;

#[derive(Clone)]
pub struct CrudService {
    pool: SqlitePool,
    catalog: Arc<Catalog>,
}

impl CrudService {
    pub fn new(pool: SqlitePool, catalog: Arc<Catalog>) -> Self {
        CrudService { pool, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Every row of `table` in storage order.
    pub async fn list_all(&self, table: &str) -> Result<Vec<Value>, AppError> {
        let t = self.catalog.table(table)?;
        let q = select_all(t);
        Self::query_many(&self.pool, &q).await
    }

    pub async fn get_one(&self, table: &str, id: &str) -> Result<Value, AppError> {
        let t = self.catalog.table(table)?;
        let q = select_by_id(t, id)?;
        Self::query_optional(&self.pool, &q)
            .await?
            .ok_or_else(|| AppError::NotFound("Not found.".into()))
    }

    /// Insert one row over exactly the supplied columns. The existence check and the
    /// INSERT share a transaction; a unique violation from storage is still reported as a conflict.
    pub async fn insert(&self, table: &str, attributes: &[(String, Value)]) -> Result<(), AppError> {
        let t = self.catalog.table(table)?;
        let pk = t.primary_key()?;
        let id = attributes
            .iter()
            .find(|(col, _)| col == pk)
            .and_then(|(_, v)| v.as_str())
            .ok_or_else(|| AppError::Validation(format!("{} is required", pk)))?;
        let insert_q = insert(t, attributes)?;
        let count_q = count_by_id(t, id)?;

        let mut tx = self.pool.begin().await?;
        if Self::count(&mut *tx, &count_q).await? > 0 {
            return Err(AppError::Conflict("Data already exists".into()));
        }
        Self::execute(&mut *tx, &insert_q).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert a typed record. Junction records go through the reference path.
    pub async fn insert_record(&self, record: Record) -> Result<(), AppError> {
        if let Record::ProductMaterial(link) = &record {
            return ReferenceService::new(self.pool.clone(), self.catalog.clone())
                .add_reference(record.table(), &link.pid, &link.mid)
                .await;
        }
        let table = record.table();
        let attributes = record.into_attributes()?;
        self.insert(table, &attributes).await
    }

    /// Change one column of an existing row.
    pub async fn update(&self, table: &str, id: &str, column: &str, value: &Value) -> Result<(), AppError> {
        let t = self.catalog.table(table)?;
        let update_q = update_column(t, id, column, value)?;
        let count_q = count_by_id(t, id)?;

        let mut tx = self.pool.begin().await?;
        if Self::count(&mut *tx, &count_q).await? == 0 {
            return Err(AppError::NotFound("No data found".into()));
        }
        Self::execute(&mut *tx, &update_q).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Delete by id. Cascades and null-outs declared in the catalog run inside the statement.
    pub async fn delete(&self, table: &str, id: &str) -> Result<(), AppError> {
        let t = self.catalog.table(table)?;
        let q = delete(t, id)?;
        let affected = Self::execute(&self.pool, &q).await?;
        if affected == 0 {
            return Err(AppError::NotFound("No data is being deleted.".into()));
        }
        Ok(())
    }

    /// Rows of `tables[0]` enriched with the name of each referenced row in `tables[1..]`.
    pub async fn list_with_references(
        &self,
        tables: &[String],
        filters: &[(String, Value)],
    ) -> Result<Vec<Value>, AppError> {
        let (first, rest) = match tables {
            [first, rest @ ..] if !rest.is_empty() => (first, rest),
            _ => return Err(AppError::Validation("at least two tables are required".into())),
        };
        let primary = self.catalog.table(first)?;
        let references = rest
            .iter()
            .map(|name| self.catalog.table(name))
            .collect::<Result<Vec<_>, _>>()?;
        let q = select_join(primary, &references, filters)?;
        Self::query_many(&self.pool, &q).await
    }

    async fn query_many<'c, E>(executor: E, q: &QueryBuf) -> Result<Vec<Value>, AppError>
    where
        E: sqlx::Executor<'c, Database = Sqlite>,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(sqlx::query(&q.sql), &q.params).fetch_all(executor).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_optional<'c, E>(executor: E, q: &QueryBuf) -> Result<Option<Value>, AppError>
    where
        E: sqlx::Executor<'c, Database = Sqlite>,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query(&q.sql), &q.params).fetch_optional(executor).await?;
        Ok(row.as_ref().map(row_to_json))
    }

    async fn count<'c, E>(executor: E, q: &QueryBuf) -> Result<i64, AppError>
    where
        E: sqlx::Executor<'c, Database = Sqlite>,
    {
        use sqlx::Row;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query(&q.sql), &q.params).fetch_one(executor).await?;
        Ok(row.try_get::<i64, _>("count")?)
    }

    async fn execute<'c, E>(executor: E, q: &QueryBuf) -> Result<u64, AppError>
    where
        E: sqlx::Executor<'c, Database = Sqlite>,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let done = bind_params(sqlx::query(&q.sql), &q.params).execute(executor).await?;
        Ok(done.rows_affected())
    }
}

pub(crate) fn row_to_json(row: &SqliteRow) -> Value {
    use sqlx::{Column, Row};
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        map.insert(col.name().to_string(), cell_to_value(row, col.ordinal()));
    }
    Value::Object(map)
}

fn cell_to_value(row: &SqliteRow, idx: usize) -> Value {
    use sqlx::{Row, TypeInfo, ValueRef};
    let storage_class = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return Value::Null,
    };
    match storage_class.as_str() {
        "INTEGER" => row
            .try_get::<i64, _>(idx)
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::Null),
        "REAL" => row
            .try_get::<f64, _>(idx)
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<String, _>(idx)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

//! Many-to-many links through junction tables.

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::sql::{bind_params, insert_reference};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReferenceService {
    pool: SqlitePool,
    catalog: Arc<Catalog>,
}

impl ReferenceService {
    pub fn new(pool: SqlitePool, catalog: Arc<Catalog>) -> Self {
        ReferenceService { pool, catalog }
    }

    /// Insert one junction row. Parents are not checked here; a missing parent
    /// fails the storage foreign key and surfaces as a validation error.
    pub async fn add_reference(&self, junction: &str, primary_id: &str, referenced_id: &str) -> Result<(), AppError> {
        let t = self.catalog.table(junction)?;
        let q = insert_reference(t, primary_id, referenced_id)?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        bind_params(sqlx::query(&q.sql), &q.params)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// One independent insert per referenced id, in order. A failure is reported
    /// in its own slot and does not undo or stop the others.
    pub async fn add_references(
        &self,
        junction: &str,
        primary_id: &str,
        referenced_ids: &[String],
    ) -> Vec<Result<(), AppError>> {
        let mut results = Vec::with_capacity(referenced_ids.len());
        for referenced_id in referenced_ids {
            let result = self.add_reference(junction, primary_id, referenced_id).await;
            if let Err(e) = &result {
                tracing::warn!(junction, primary_id, referenced_id = %referenced_id, error = %e, "reference not added");
            }
            results.push(result);
        }
        results
    }
}

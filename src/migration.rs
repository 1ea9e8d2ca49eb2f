//! Apply the catalog to the database: one idempotent CREATE TABLE per table.

use crate::catalog::{Catalog, TableDef};
use crate::error::AppError;
use sqlx::SqlitePool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// CREATE TABLE IF NOT EXISTS with column checks, primary key and foreign keys.
pub fn create_table_sql(table: &TableDef) -> String {
    let mut defs: Vec<String> = Vec::new();
    for c in &table.columns {
        let mut def = format!("{} {}", quote(&c.name), c.sql_type.as_sql());
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(ref d) = c.default {
            def.push_str(" DEFAULT ");
            def.push_str(d);
        }
        if let Some(ref ch) = c.check {
            def.push_str(&format!(" CHECK ({})", ch));
        }
        defs.push(def);
    }
    if let Some(pk) = &table.primary_key {
        defs.push(format!("PRIMARY KEY ({})", quote(pk)));
    }
    for fk in &table.foreign_keys {
        defs.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
            quote(&fk.column),
            quote(&fk.references_table),
            quote(&fk.references_column),
            fk.on_delete.as_sql(),
            fk.on_update.as_sql()
        ));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(&table.name),
        defs.join(",\n  ")
    )
}

/// Create every catalog table in declaration order, in one transaction. Safe to run on every start.
pub async fn apply_migrations(pool: &SqlitePool, catalog: &Catalog) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for t in catalog.tables() {
        let sql = create_table_sql(t);
        tracing::debug!(sql = %sql, "ddl");
        sqlx::query(&sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(tables = catalog.tables().len(), "schema ready");
    Ok(())
}

/// Catalog tables absent from the database, compared case-insensitively.
pub async fn missing_tables(pool: &SqlitePool, catalog: &Catalog) -> Result<Vec<String>, AppError> {
    let present: Vec<String> = sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
        .fetch_all(pool)
        .await?;
    Ok(catalog
        .tables()
        .iter()
        .filter(|t| !present.iter().any(|p| p.eq_ignore_ascii_case(&t.name)))
        .map(|t| t.name.clone())
        .collect())
}

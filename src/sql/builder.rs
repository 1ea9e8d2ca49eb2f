//! Builds parameterized SELECT, INSERT, UPDATE, DELETE and join queries from catalog tables.

use crate::catalog::TableDef;
use crate::error::CatalogError;
use serde_json::Value;
use std::collections::HashSet;

/// Quote identifier for SQLite (safe: only from the catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn qualified(table: &str, column: &str) -> String {
    format!("{}.{}", quoted(table), quoted(column))
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> &'static str {
        self.params.push(v);
        "?"
    }
}

/// Every row in storage order.
pub fn select_all(table: &TableDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT * FROM {} ORDER BY rowid", quoted(&table.name));
    q
}

pub fn select_by_id(table: &TableDef, id: &str) -> Result<QueryBuf, CatalogError> {
    let pk = table.primary_key()?;
    let mut q = QueryBuf::new();
    let ph = q.push_param(Value::String(id.to_string()));
    q.sql = format!("SELECT * FROM {} WHERE {} = {}", quoted(&table.name), quoted(pk), ph);
    Ok(q)
}

/// `SELECT COUNT(*) AS count ...` by primary key.
pub fn count_by_id(table: &TableDef, id: &str) -> Result<QueryBuf, CatalogError> {
    let pk = table.primary_key()?;
    let mut q = QueryBuf::new();
    let ph = q.push_param(Value::String(id.to_string()));
    q.sql = format!(
        "SELECT COUNT(*) AS count FROM {} WHERE {} = {}",
        quoted(&table.name),
        quoted(pk),
        ph
    );
    Ok(q)
}

/// INSERT over exactly the given columns, in the given order. Every column must be declared.
pub fn insert(table: &TableDef, attributes: &[(String, Value)]) -> Result<QueryBuf, CatalogError> {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(attributes.len());
    let mut placeholders = Vec::with_capacity(attributes.len());
    for (name, value) in attributes {
        let c = table.column(name)?;
        cols.push(quoted(&c.name));
        placeholders.push(q.push_param(value.clone()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(&table.name),
        cols.join(", "),
        placeholders.join(", ")
    );
    Ok(q)
}

/// Single-column UPDATE keyed by primary key.
pub fn update_column(table: &TableDef, id: &str, column: &str, value: &Value) -> Result<QueryBuf, CatalogError> {
    let pk = table.primary_key()?;
    let c = table.column(column)?;
    let mut q = QueryBuf::new();
    let set_ph = q.push_param(value.clone());
    let id_ph = q.push_param(Value::String(id.to_string()));
    q.sql = format!(
        "UPDATE {} SET {} = {} WHERE {} = {}",
        quoted(&table.name),
        quoted(&c.name),
        set_ph,
        quoted(pk),
        id_ph
    );
    Ok(q)
}

pub fn delete(table: &TableDef, id: &str) -> Result<QueryBuf, CatalogError> {
    let pk = table.primary_key()?;
    let mut q = QueryBuf::new();
    let ph = q.push_param(Value::String(id.to_string()));
    q.sql = format!("DELETE FROM {} WHERE {} = {}", quoted(&table.name), quoted(pk), ph);
    Ok(q)
}

/// One junction row: (primary side, referenced side).
pub fn insert_reference(junction: &TableDef, primary_id: &str, referenced_id: &str) -> Result<QueryBuf, CatalogError> {
    let (primary, referenced) = junction.junction_columns()?;
    let mut q = QueryBuf::new();
    let p = q.push_param(Value::String(primary_id.to_string()));
    let r = q.push_param(Value::String(referenced_id.to_string()));
    q.sql = format!(
        "INSERT INTO {} ({}, {}) VALUES ({}, {})",
        quoted(&junction.name),
        quoted(&primary.column),
        quoted(&referenced.column),
        p,
        r
    );
    Ok(q)
}

/// Primary rows enriched with `<singular>_name` of each referenced table.
/// Join predicates come from the primary table's declared foreign keys; filters
/// are equality predicates on primary columns.
pub fn select_join(
    primary: &TableDef,
    references: &[&TableDef],
    filters: &[(String, Value)],
) -> Result<QueryBuf, CatalogError> {
    let mut q = QueryBuf::new();
    let mut seen = HashSet::from([primary.name.to_ascii_lowercase()]);
    let mut select_parts = vec![format!("{}.*", quoted(&primary.name))];
    let mut from_parts = vec![quoted(&primary.name)];
    let mut where_parts = Vec::new();

    for reference in references {
        if !seen.insert(reference.name.to_ascii_lowercase()) {
            return Err(CatalogError::DuplicateTable(reference.name.clone()));
        }
        let fk = primary
            .foreign_key_to(&reference.name)
            .ok_or_else(|| CatalogError::NoForeignKey {
                from: primary.name.clone(),
                to: reference.name.clone(),
            })?;
        let name_col = reference.column("name")?;
        select_parts.push(format!(
            "{} AS {}",
            qualified(&reference.name, &name_col.name),
            quoted(&format!("{}_name", reference.singular))
        ));
        from_parts.push(quoted(&reference.name));
        where_parts.push(format!(
            "{} = {}",
            qualified(&reference.name, &fk.references_column),
            qualified(&primary.name, &fk.column)
        ));
    }

    for (col, val) in filters {
        let c = primary.column(col)?;
        let ph = q.push_param(val.clone());
        where_parts.push(format!("{} = {}", qualified(&primary.name, &c.name), ph));
    }

    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}.rowid",
        select_parts.join(", "),
        from_parts.join(", "),
        where_clause,
        quoted(&primary.name)
    );
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::furniture::{FURNITURE_MATERIALS, MATERIALS, PRODUCTS, STORES, SUPPLIERS};
    use crate::catalog::Catalog;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::furniture().unwrap()
    }

    #[test]
    fn join_materials_with_suppliers_uses_declared_column() {
        let c = catalog();
        let q = select_join(c.table(MATERIALS).unwrap(), &[c.table(SUPPLIERS).unwrap()], &[]).unwrap();
        assert_eq!(
            q.sql,
            "SELECT \"Materials\".*, \"Suppliers\".\"name\" AS \"supplier_name\" \
             FROM \"Materials\", \"Suppliers\" \
             WHERE \"Suppliers\".\"id\" = \"Materials\".\"sid\" ORDER BY \"Materials\".rowid"
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn join_filters_are_bound_not_interpolated() {
        let c = catalog();
        let filters = vec![("name".to_string(), json!("Oak'; --"))];
        let q = select_join(c.table(MATERIALS).unwrap(), &[c.table(SUPPLIERS).unwrap()], &filters).unwrap();
        assert!(q.sql.ends_with("AND \"Materials\".\"name\" = ? ORDER BY \"Materials\".rowid"));
        assert_eq!(q.params, vec![json!("Oak'; --")]);
    }

    #[test]
    fn join_rejects_table_without_edge() {
        let c = catalog();
        let err = select_join(c.table(SUPPLIERS).unwrap(), &[c.table(MATERIALS).unwrap()], &[]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::NoForeignKey {
                from: SUPPLIERS.into(),
                to: MATERIALS.into()
            }
        );
    }

    #[test]
    fn join_rejects_unknown_filter_column_and_repeated_table() {
        let c = catalog();
        let m = c.table(MATERIALS).unwrap();
        let s = c.table(SUPPLIERS).unwrap();
        let filters = vec![("1=1 OR name".to_string(), json!(1))];
        assert!(matches!(
            select_join(m, &[s], &filters),
            Err(CatalogError::UnknownColumn { .. })
        ));
        assert!(matches!(select_join(m, &[s, s], &[]), Err(CatalogError::DuplicateTable(_))));
    }

    #[test]
    fn insert_keeps_caller_column_order() {
        let c = catalog();
        let attrs = vec![
            ("name".to_string(), json!("Acme")),
            ("id".to_string(), json!("s_1")),
        ];
        let q = insert(c.table(SUPPLIERS).unwrap(), &attrs).unwrap();
        assert_eq!(q.sql, "INSERT INTO \"Suppliers\" (\"name\", \"id\") VALUES (?, ?)");
        assert_eq!(q.params, vec![json!("Acme"), json!("s_1")]);
    }

    #[test]
    fn insert_rejects_undeclared_column() {
        let c = catalog();
        let attrs = vec![("id); DROP TABLE Stores; --".to_string(), json!("x"))];
        assert!(matches!(
            insert(c.table(STORES).unwrap(), &attrs),
            Err(CatalogError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn update_sets_one_column_by_id() {
        let c = catalog();
        let q = update_column(c.table(PRODUCTS).unwrap(), "p_1", "color", &json!("red")).unwrap();
        assert_eq!(q.sql, "UPDATE \"Products\" SET \"color\" = ? WHERE \"id\" = ?");
        assert_eq!(q.params, vec![json!("red"), json!("p_1")]);
    }

    #[test]
    fn keyed_statements_require_primary_key() {
        let c = catalog();
        let fm = c.table(FURNITURE_MATERIALS).unwrap();
        assert!(matches!(delete(fm, "x"), Err(CatalogError::NoPrimaryKey(_))));
        assert!(matches!(select_by_id(fm, "x"), Err(CatalogError::NoPrimaryKey(_))));
    }

    #[test]
    fn reference_insert_uses_junction_edges() {
        let c = catalog();
        let q = insert_reference(c.table(FURNITURE_MATERIALS).unwrap(), "p_1", "m_1").unwrap();
        assert_eq!(q.sql, "INSERT INTO \"Furniture_Materials\" (\"pid\", \"mid\") VALUES (?, ?)");
        assert!(matches!(
            insert_reference(c.table(MATERIALS).unwrap(), "a", "b"),
            Err(CatalogError::NotJunction(_))
        ));
    }
}

//! Catalog validation: identifiers and referential integrity of declared edges.

use crate::catalog::TableDef;
use crate::error::CatalogError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static identifier regex"))
}

fn check_identifier(name: &str) -> Result<(), CatalogError> {
    if identifier_re().is_match(name) {
        Ok(())
    } else {
        Err(CatalogError::InvalidIdentifier(name.to_string()))
    }
}

pub fn validate(tables: &[TableDef]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for t in tables {
        check_identifier(&t.name)?;
        check_identifier(&t.singular)?;
        if !seen.insert(t.name.to_ascii_lowercase()) {
            return Err(CatalogError::DuplicateTable(t.name.clone()));
        }
        for c in &t.columns {
            check_identifier(&c.name)?;
        }
        if let Some(pk) = &t.primary_key {
            t.column(pk)?;
        }
    }

    for t in tables {
        for fk in &t.foreign_keys {
            t.column(&fk.column)?;
            let target = tables
                .iter()
                .find(|o| o.name.eq_ignore_ascii_case(&fk.references_table))
                .ok_or_else(|| CatalogError::DanglingForeignKey {
                    table: t.name.clone(),
                    column: fk.column.clone(),
                    target: fk.references_table.clone(),
                })?;
            target.column(&fk.references_column)?;
        }
    }
    Ok(())
}

//! Schema catalog: the only source of identifiers interpolated into SQL.

pub mod furniture;
mod types;
mod validator;

pub use types::*;
pub use validator::validate;

use crate::error::CatalogError;

#[derive(Clone, Debug)]
pub struct Catalog {
    tables: Vec<TableDef>,
}

impl Catalog {
    pub fn new(tables: Vec<TableDef>) -> Result<Self, CatalogError> {
        validate(&tables)?;
        Ok(Catalog { tables })
    }

    /// The furniture store schema.
    pub fn furniture() -> Result<Self, CatalogError> {
        Self::new(furniture::tables())
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    /// Table by name, case-insensitive.
    pub fn table(&self, name: &str) -> Result<&TableDef, CatalogError> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::UnknownTable(name.to_string()))
    }
}

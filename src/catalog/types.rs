//! Table, column and foreign-key declarations.

use crate::error::CatalogError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Real,
    Integer,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Real => "REAL",
            SqlType::Integer => "INTEGER",
        }
    }
}

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FkAction {
    NoAction,
    Cascade,
    SetNull,
}

impl FkAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            FkAction::NoAction => "NO ACTION",
            FkAction::Cascade => "CASCADE",
            FkAction::SetNull => "SET NULL",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: SqlType,
    pub nullable: bool,
    /// Literal SQL default (e.g. `0`).
    pub default: Option<String>,
    /// Column-level CHECK expression.
    pub check: Option<String>,
    /// Stripped from rows returned to HTTP clients.
    pub hidden: bool,
}

impl ColumnDef {
    pub fn new(name: &str, sql_type: SqlType) -> Self {
        ColumnDef {
            name: name.to_string(),
            sql_type,
            nullable: true,
            default: None,
            check: None,
            hidden: false,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, SqlType::Text)
    }

    pub fn real(name: &str) -> Self {
        Self::new(name, SqlType::Real)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, SqlType::Integer)
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default_value(mut self, sql: &str) -> Self {
        self.default = Some(sql.to_string());
        self
    }

    pub fn check(mut self, expression: &str) -> Self {
        self.check = Some(expression.to_string());
        self
    }

    /// CHECK (<name> IN ('a', 'b', ...)).
    pub fn one_of(self, values: &[&str]) -> Self {
        let list = values
            .iter()
            .map(|v| format!("'{}'", v.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(", ");
        let expr = format!("{} IN ({})", self.name, list);
        self.check(&expr)
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
    pub on_delete: FkAction,
    pub on_update: FkAction,
}

impl ForeignKey {
    pub fn new(column: &str, references_table: &str) -> Self {
        ForeignKey {
            column: column.to_string(),
            references_table: references_table.to_string(),
            references_column: "id".to_string(),
            on_delete: FkAction::NoAction,
            on_update: FkAction::NoAction,
        }
    }

    pub fn on_delete(mut self, action: FkAction) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: FkAction) -> Self {
        self.on_update = action;
        self
    }
}

#[derive(Clone, Debug)]
pub struct TableDef {
    pub name: String,
    /// Singular noun used for enrichment aliases (`<singular>_name`).
    pub singular: String,
    pub primary_key: Option<String>,
    pub columns: Vec<ColumnDef>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDef {
    /// Entity table keyed by a TEXT `id` column, which is prepended to `columns`.
    pub fn entity(name: &str, singular: &str, columns: Vec<ColumnDef>) -> Self {
        let mut all = vec![ColumnDef::text("id").not_null()];
        all.extend(columns);
        TableDef {
            name: name.to_string(),
            singular: singular.to_string(),
            primary_key: Some("id".to_string()),
            columns: all,
            foreign_keys: Vec::new(),
        }
    }

    /// Table without identity whose rows link two parents.
    pub fn junction(name: &str, singular: &str, primary: ForeignKey, referenced: ForeignKey) -> Self {
        TableDef {
            name: name.to_string(),
            singular: singular.to_string(),
            primary_key: None,
            columns: vec![ColumnDef::text(&primary.column), ColumnDef::text(&referenced.column)],
            foreign_keys: vec![primary, referenced],
        }
    }

    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn hide_column(mut self, name: &str) -> Self {
        for c in self.columns.iter_mut().filter(|c| c.name == name) {
            c.hidden = true;
        }
        self
    }

    pub fn column(&self, name: &str) -> Result<&ColumnDef, CatalogError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CatalogError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    pub fn primary_key(&self) -> Result<&str, CatalogError> {
        self.primary_key
            .as_deref()
            .ok_or_else(|| CatalogError::NoPrimaryKey(self.name.clone()))
    }

    /// Declared edge from this table to `target` (table name, case-insensitive).
    pub fn foreign_key_to(&self, target: &str) -> Option<&ForeignKey> {
        self.foreign_keys
            .iter()
            .find(|fk| fk.references_table.eq_ignore_ascii_case(target))
    }

    /// (primary side, referenced side) columns of a junction table.
    pub fn junction_columns(&self) -> Result<(&ForeignKey, &ForeignKey), CatalogError> {
        match (self.primary_key.as_ref(), self.foreign_keys.as_slice()) {
            (None, [primary, referenced]) => Ok((primary, referenced)),
            _ => Err(CatalogError::NotJunction(self.name.clone())),
        }
    }

    pub fn hidden_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter(|c| c.hidden).map(|c| c.name.as_str())
    }
}

//! Convert serde_json::Value to types that sqlx can bind to SQLite.

use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

/// A value that can be bound to a SQLite statement.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    I64(i64),
    F64(f64),
    Text(String),
}

impl BindValue {
    /// Booleans bind as 0/1; arrays and objects bind as their JSON text.
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::I64(i64::from(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::I64(i)
                } else {
                    BindValue::F64(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => BindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => BindValue::Text(v.to_string()),
        }
    }
}

pub fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for p in params {
        query = match BindValue::from_json(p) {
            BindValue::Null => query.bind(Option::<String>::None),
            BindValue::I64(n) => query.bind(n),
            BindValue::F64(n) => query.bind(n),
            BindValue::Text(s) => query.bind(s),
        };
    }
    query
}

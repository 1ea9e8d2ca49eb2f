//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Schema catalog lookups and catalog consistency.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("unknown column '{column}' in table {table}")]
    UnknownColumn { table: String, column: String },
    #[error("table {0} has no primary key")]
    NoPrimaryKey(String),
    #[error("table {0} is not a junction table")]
    NotJunction(String),
    #[error("no foreign key from {from} to {to}")]
    NoForeignKey { from: String, to: String },
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("duplicate table '{0}'")]
    DuplicateTable(String),
    #[error("foreign key {table}.{column} references unknown table '{target}'")]
    DanglingForeignKey {
        table: String,
        column: String,
        target: String,
    },
}

/// Operation errors. Each variant maps to one literal status code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Db(sqlx::Error),
}

impl From<sqlx::Error> for AppError {
    /// Constraint violations raised by the engine are client errors; everything else is a storage failure.
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.kind() {
                ErrorKind::UniqueViolation => return AppError::Conflict(db.message().to_string()),
                ErrorKind::ForeignKeyViolation | ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    return AppError::Validation(db.message().to_string())
                }
                _ => {}
            }
        }
        AppError::Db(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Catalog(_)
            | AppError::Conflict(_)
            | AppError::Validation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize, serde::Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Body of every successful mutation: `{ "success": "...", "status": 200 }`.
#[derive(Serialize, Deserialize, Debug)]
pub struct SuccessBody {
    pub success: String,
    pub status: u16,
    /// Id of the row created by `add-data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

pub fn success(message: impl Into<String>) -> (StatusCode, Json<SuccessBody>) {
    (
        StatusCode::OK,
        Json(SuccessBody {
            success: message.into(),
            status: StatusCode::OK.as_u16(),
            id: None,
        }),
    )
}

/// Rows for GET responses, with the given columns removed from every object.
pub fn rows_without(rows: Vec<serde_json::Value>, hidden: &[&str]) -> Vec<serde_json::Value> {
    rows.into_iter()
        .map(|mut row| {
            if let Some(obj) = row.as_object_mut() {
                for col in hidden {
                    obj.remove(*col);
                }
            }
            row
        })
        .collect()
}

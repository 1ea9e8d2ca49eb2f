//! Data handlers: list/join, read, add, add reference, update, delete.

use crate::error::AppError;
use crate::model::Record;
use crate::response::{rows_without, success, SuccessBody};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

fn json_body<T: serde::de::DeserializeOwned>(payload: Result<Json<Value>, JsonRejection>) -> Result<T, AppError> {
    let Json(value) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    serde_json::from_value(value).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Column named by a legacy change key `<rowId>_<column>`.
pub fn column_from_change_key<'a>(id: &str, key: &'a str) -> Result<&'a str, AppError> {
    key.strip_prefix(id)
        .and_then(|rest| rest.strip_prefix('_'))
        .filter(|column| !column.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("change key '{}' does not belong to row '{}'", key, id)))
}

/// Split GET params into ordered `table<N>` names and column filters.
fn split_join_params(params: Vec<(String, String)>) -> (Vec<String>, Vec<(String, Value)>) {
    let mut tables: Vec<(u32, String)> = Vec::new();
    let mut filters = Vec::new();
    for (k, v) in params {
        match k.strip_prefix("table").and_then(|n| n.parse::<u32>().ok()) {
            Some(n) => tables.push((n, v)),
            None => filters.push((k, Value::String(v))),
        }
    }
    tables.sort_by_key(|(n, _)| *n);
    (tables.into_iter().map(|(_, t)| t).collect(), filters)
}

pub async fn list(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, AppError> {
    let crud = state.crud();
    let (rows, tables) = if params.is_empty() {
        (crud.list_all(&table).await?, vec![table])
    } else {
        let (tables, filters) = split_join_params(params);
        (crud.list_with_references(&tables, &filters).await?, tables)
    };
    let mut hidden: Vec<&str> = Vec::new();
    for name in &tables {
        hidden.extend(state.catalog.table(name)?.hidden_columns());
    }
    Ok(Json(rows_without(rows, &hidden)))
}

pub async fn read(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let row = state.crud().get_one(&table, &id).await?;
    let hidden: Vec<&str> = state.catalog.table(&table)?.hidden_columns().collect();
    let mut rows = rows_without(vec![row], &hidden);
    Ok(Json(rows.pop().unwrap_or(Value::Null)))
}

#[derive(Deserialize)]
struct AddDataBody {
    table: Option<String>,
    attribute: Option<Value>,
}

/// `POST /api/add-data`. An attribute object without `id` gets a generated one.
pub async fn add_data(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessBody>), AppError> {
    let body: AddDataBody = json_body(payload)?;
    let (Some(table), Some(Value::Object(mut attribute))) = (body.table, body.attribute) else {
        return Err(AppError::BadRequest("No table or attribute is provided.".into()));
    };
    let t = state.catalog.table(&table)?;
    if let Ok(pk) = t.primary_key() {
        if !attribute.contains_key(pk) {
            let mut with_id = serde_json::Map::new();
            with_id.insert(pk.to_string(), Value::String(state.ids.next_id(&t.name)));
            with_id.extend(attribute);
            attribute = with_id;
        }
    }
    let record = Record::from_attributes(t, Value::Object(attribute))?;
    let id = record.id().map(str::to_string);
    state.crud().insert_record(record).await?;
    let (status, Json(mut body)) = success("Successfully appended data.");
    body.id = id;
    Ok((status, Json(body)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceAttribute {
    id: String,
    reference_id: String,
}

#[derive(Deserialize)]
struct AddReferenceBody {
    table: Option<String>,
    attribute: Option<ReferenceAttribute>,
}

/// `POST /api/add-reference-data`
pub async fn add_reference_data(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessBody>), AppError> {
    let body: AddReferenceBody = json_body(payload)?;
    let (Some(table), Some(attribute)) = (body.table, body.attribute) else {
        return Err(AppError::BadRequest("No table or attribute is provided.".into()));
    };
    state
        .references()
        .add_reference(&table, &attribute.id, &attribute.reference_id)
        .await?;
    Ok(success("Successfully appended reference."))
}

#[derive(Deserialize)]
struct DeleteBody {
    table: Option<String>,
    id: Option<String>,
}

/// `DELETE /api/delete-data`
pub async fn delete_data(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessBody>), AppError> {
    let body: DeleteBody = json_body(payload)?;
    let (Some(table), Some(id)) = (body.table, body.id) else {
        return Err(AppError::BadRequest("No table or ID is provided.".into()));
    };
    state.crud().delete(&table, &id).await?;
    Ok(success("Successfully removed data."))
}

#[derive(Deserialize)]
struct UpdateAttribute {
    id: String,
    data: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
struct UpdateBody {
    table: Option<String>,
    attribute: Option<UpdateAttribute>,
}

/// `PUT /api/update-data`. `data` must carry exactly one `<rowId>_<column>` key.
pub async fn update_data(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessBody>), AppError> {
    let body: UpdateBody = json_body(payload)?;
    let (Some(table), Some(attribute)) = (body.table, body.attribute) else {
        return Err(AppError::BadRequest("No table or attribute is provided.".into()));
    };
    if attribute.data.len() != 1 {
        return Err(AppError::BadRequest("exactly one column may change per update".into()));
    }
    let Some((key, value)) = attribute.data.iter().next() else {
        return Err(AppError::BadRequest("exactly one column may change per update".into()));
    };
    let column = column_from_change_key(&attribute.id, key)?;
    state.crud().update(&table, &attribute.id, column, value).await?;
    Ok(success("Successfully updated data."))
}

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use common::test_state;
use furniture_api::{app, connect, AppState, Catalog};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    app(test_state().await, 64 * 1024)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn add(app: &Router, table: &str, attribute: Value) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/add-data",
        Some(json!({"table": table, "attribute": attribute})),
    )
    .await
}

#[tokio::test]
async fn scenario_supplier_material_join_over_http() {
    let app = test_app().await;
    let (status, body) = add(&app, "suppliers", json!({"id": "s_1", "name": "Acme"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], "Successfully appended data.");
    assert_eq!(body["status"], 200);

    let (status, _) = add(
        &app,
        "materials",
        json!({"id": "m_1", "sid": "s_1", "name": "Oak", "price": 10, "qty": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, rows) = send(
        &app,
        Method::GET,
        "/api/materials?table0=Materials&table1=Suppliers",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Oak");
    assert_eq!(rows[0]["supplier_name"], "Acme");
    assert!(rows[0].get("sid").is_none());
}

#[tokio::test]
async fn list_strips_hidden_reference_columns() {
    let app = test_app().await;
    add(&app, "suppliers", json!({"id": "s_1", "name": "Acme"})).await;
    add(&app, "materials", json!({"id": "m_1", "sid": "s_1", "name": "Oak"})).await;

    let (status, rows) = send(&app, Method::GET, "/api/materials", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows[0]["id"], "m_1");
    assert!(rows[0].get("sid").is_none());

    let (status, row) = send(&app, Method::GET, "/api/materials/m_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["name"], "Oak");
    assert!(row.get("sid").is_none());
}

#[tokio::test]
async fn add_data_without_id_gets_generated_one() {
    let app = test_app().await;
    let (status, body) = add(&app, "stores", json!({"name": "Downtown"})).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("s_"));

    let (status, row) = send(&app, Method::GET, &format!("/api/stores/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["name"], "Downtown");
}

#[tokio::test]
async fn add_data_accepts_numeric_text_from_forms() {
    let app = test_app().await;
    let (status, body) = add(
        &app,
        "materials",
        json!({"id": "m_1", "name": "Oak", "price": "10", "qty": "5"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (_, row) = send(&app, Method::GET, "/api/materials/m_1", None).await;
    assert_eq!(row["price"].as_f64(), Some(10.0));
    assert_eq!(row["qty"], json!(5));

    let (status, body) = add(
        &app,
        "products",
        json!({"id": "p_1", "name": "Chair", "size": "2", "is_saleable": "1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (_, row) = send(&app, Method::GET, "/api/products/p_1", None).await;
    assert_eq!(row["size"].as_f64(), Some(2.0));
    assert_eq!(row["is_saleable"], json!(1));

    let (status, body) = add(&app, "materials", json!({"id": "m_2", "name": "Pine", "qty": "lots"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn explicit_null_overrides_column_default() {
    let app = test_app().await;
    add(&app, "materials", json!({"id": "m_1", "name": "Oak", "price": null})).await;
    let (_, row) = send(&app, Method::GET, "/api/materials/m_1", None).await;
    assert_eq!(row["price"], Value::Null);
    assert_eq!(row["qty"], json!(0));
}

#[tokio::test]
async fn duplicate_add_is_400_with_error_body() {
    let app = test_app().await;
    add(&app, "stores", json!({"id": "s_1", "name": "Downtown"})).await;
    let (status, body) = add(&app, "stores", json!({"id": "s_1", "name": "Uptown"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Data already exists", "status": 400}));
}

#[tokio::test]
async fn invalid_enum_and_unknown_column_are_400() {
    let app = test_app().await;
    let (status, body) = add(
        &app,
        "customers",
        json!({"id": "c_1", "name": "Ann", "email": "a@x.io", "payment": "cash"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _) = add(&app, "stores", json!({"id": "s_1", "name": "A", "rating": 5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_body_fields_are_400() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::POST, "/api/add-data", Some(json!({"table": "stores"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No table or attribute is provided.");

    let (status, body) = send(&app, Method::DELETE, "/api/delete-data", Some(json!({"table": "stores"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No table or ID is provided.");
}

#[tokio::test]
async fn unknown_table_is_400() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/orders", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown table 'orders'");
}

#[tokio::test]
async fn update_uses_legacy_change_key() {
    let app = test_app().await;
    add(&app, "products", json!({"id": "p_1", "name": "Chair", "color": "red"})).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/update-data",
        Some(json!({"table": "products", "attribute": {"id": "p_1", "data": {"p_1_color": "blue"}}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], "Successfully updated data.");

    let (_, row) = send(&app, Method::GET, "/api/products/p_1", None).await;
    assert_eq!(row["color"], "blue");
    assert_eq!(row["name"], "Chair");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/update-data",
        Some(json!({"table": "products", "attribute": {"id": "p_1", "data": {"p_1_color": "x", "p_1_name": "y"}}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/update-data",
        Some(json!({"table": "products", "attribute": {"id": "p_9", "data": {"p_9_color": "x"}}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_read_is_404() {
    let app = test_app().await;
    add(&app, "stores", json!({"id": "s_1", "name": "Downtown"})).await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/delete-data",
        Some(json!({"table": "stores", "id": "s_1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], "Successfully removed data.");

    let (status, _) = send(&app, Method::GET, "/api/stores/s_1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/delete-data",
        Some(json!({"table": "stores", "id": "s_1"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn add_reference_links_product_and_material() {
    let app = test_app().await;
    add(&app, "products", json!({"id": "p_1", "name": "Chair"})).await;
    add(&app, "materials", json!({"id": "m_1", "name": "Oak"})).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/add-reference-data",
        Some(json!({"table": "furniture_materials", "attribute": {"id": "p_1", "referenceId": "m_1"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], "Successfully appended reference.");

    let (_, rows) = send(&app, Method::GET, "/api/furniture_materials", None).await;
    assert_eq!(rows, json!([{"pid": "p_1"}]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/add-reference-data",
        Some(json!({"table": "furniture_materials", "attribute": {"id": "p_1", "referenceId": "m_404"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_name_and_version() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], "furniture-api");
}

#[tokio::test]
async fn ready_checks_every_catalog_table() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "tables": 6}));

    let pool = connect("sqlite::memory:").await.unwrap();
    let bare = furniture_api::app(AppState::new(pool, Catalog::furniture().unwrap()), 1024);
    let (status, body) = send(&bare, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["missing"].as_array().unwrap().len(), 6);
}

#![allow(dead_code)]

use furniture_api::{apply_migrations, connect, AppState, Catalog};
use serde_json::{json, Value};

pub async fn test_state() -> AppState {
    let pool = connect("sqlite::memory:").await.unwrap();
    let catalog = Catalog::furniture().unwrap();
    apply_migrations(&pool, &catalog).await.unwrap();
    AppState::new(pool, catalog)
}

pub fn attrs(value: Value) -> Vec<(String, Value)> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        other => panic!("expected object, got {other}"),
    }
}

pub async fn seed_supplier_and_material(state: &AppState) {
    let crud = state.crud();
    crud.insert("Suppliers", &attrs(json!({"id": "s_1", "name": "Acme"})))
        .await
        .unwrap();
    crud.insert(
        "Materials",
        &attrs(json!({"id": "m_1", "sid": "s_1", "name": "Oak", "price": 10, "qty": 5})),
    )
    .await
    .unwrap();
}

//! Data routes under `/api`.
//! The fixed `add-data`-style paths are POST/PUT/DELETE only, so they never clash with `GET /:table`.

use crate::handlers::data::{add_data, add_reference_data, delete_data, list, read, update_data};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

pub fn api_routes(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/add-data", post(add_data))
        .route("/add-reference-data", post(add_reference_data))
        .route("/delete-data", delete(delete_data))
        .route("/update-data", put(update_data))
        .route("/:table", get(list))
        .route("/:table/:id", get(read))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

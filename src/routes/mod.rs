mod api;
mod common;

pub use api::api_routes;
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;

/// Full application: `/api/...` data routes plus health and readiness.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", api_routes(state, body_limit))
}

//! Operational routes: liveness and schema readiness.

use crate::migration::missing_tables;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    name: &'static str,
    version: &'static str,
}

/// Readiness: storage reachable and every catalog table present.
#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    tables: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    let tables = state.catalog.tables().len();
    match missing_tables(&state.pool, &state.catalog).await {
        Ok(missing) if missing.is_empty() => (
            StatusCode::OK,
            Json(ReadyBody {
                status: "ok",
                tables,
                missing,
                error: None,
            }),
        ),
        Ok(missing) => {
            tracing::warn!(?missing, "schema incomplete");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyBody {
                    status: "degraded",
                    tables,
                    missing,
                    error: None,
                }),
            )
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                tables,
                missing: Vec::new(),
                error: Some(e.to_string()),
            }),
        ),
    }
}

/// GET /health, GET /ready.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state)
}

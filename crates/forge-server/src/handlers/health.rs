//! Health check

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (database, cache) = state.data.health().await;
    let database = match database {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            false
        }
    };

    // A missing cache slows reads down but loses nothing
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let label = match (database, cache) {
        (true, true) => "ok",
        (true, false) => "degraded",
        _ => "unavailable",
    };

    (
        status,
        Json(json!({
            "status": label,
            "database": database,
            "cache": cache,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

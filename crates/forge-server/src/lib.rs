//! FORGE data service
//!
//! Member system profiles and hangar inventories, persisted in SQLite and
//! served through a cache-aside layer, with fleet-wide aggregation on top.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod services;
pub mod storage;

use axum::{
    routing::{get, patch, put},
    Router,
};
use services::DataAccess;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DataAccess>,
}

impl AppState {
    pub fn new(data: DataAccess) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles/me", put(handlers::profiles::save))
        .route(
            "/profiles/me/peripherals",
            patch(handlers::profiles::save_peripherals),
        )
        .route("/profiles/:id", get(handlers::profiles::get))
        .route("/hangars/me", put(handlers::hangars::upload))
        .route("/hangars/:id", get(handlers::hangars::get))
        .route("/hangars/:id/summary", get(handlers::hangars::summary))
        .route("/fleet", get(handlers::fleet::aggregate))
        .route("/fleet/models", get(handlers::fleet::models))
        .route("/fleet/models/:model/owners", get(handlers::fleet::owners))
}

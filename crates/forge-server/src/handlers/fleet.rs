//! Fleet-wide handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use forge_core::{FleetAggregate, ShipOwner};
use serde::Serialize;
use std::collections::BTreeSet;

pub async fn aggregate(
    State(state): State<AppState>,
) -> Result<Json<FleetAggregate>, ApiError> {
    Ok(Json(state.data.get_fleet_aggregate().await?))
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    models: BTreeSet<String>,
}

pub async fn models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    let models = state.data.get_distinct_models().await?;
    Ok(Json(ModelsResponse { models }))
}

#[derive(Debug, Serialize)]
pub struct OwnersResponse {
    model: String,
    owners: Vec<ShipOwner>,
}

pub async fn owners(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<OwnersResponse>, ApiError> {
    let owners = state.data.get_owners(&model).await?;
    Ok(Json(OwnersResponse { model, owners }))
}

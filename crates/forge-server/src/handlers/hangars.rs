//! Hangar handlers

use super::ApiError;
use crate::extractors::Identity;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use forge_core::{InventoryRecord, InventorySummary, UserId};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HangarResponse {
    owner_id: UserId,
    ships: Vec<InventoryRecord>,
}

pub async fn get(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
) -> Result<Json<HangarResponse>, ApiError> {
    let ships = state.data.get_inventory(owner_id).await?;
    Ok(Json(HangarResponse { owner_id, ships }))
}

pub async fn summary(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
) -> Result<Json<InventorySummary>, ApiError> {
    Ok(Json(state.data.get_inventory_summary(owner_id).await?))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    saved: usize,
}

/// Body is the raw export document, as pasted or read from the attached file.
/// Encoding problems are reported by the export parser like any other defect.
pub async fn upload(
    State(state): State<AppState>,
    Identity(owner_id): Identity,
    document: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    let saved = state.data.save_inventory(owner_id, document).await?;
    Ok(Json(UploadResponse { saved }))
}

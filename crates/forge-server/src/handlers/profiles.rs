//! System profile handlers

use super::ApiError;
use crate::extractors::Identity;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use forge_core::{Peripherals, ProfileRecord, SystemSpecs, UserId};
use serde::Deserialize;

pub async fn get(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<ProfileRecord>, ApiError> {
    state
        .data
        .get_profile(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No system profile for {}", user_id)))
}

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    #[serde(flatten)]
    specs: SystemSpecs,
    #[serde(default)]
    peripherals: Option<Peripherals>,
}

pub async fn save(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(req): Json<SaveProfileRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .data
        .save_profile(user_id, &req.specs, req.peripherals.as_ref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn save_peripherals(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(peripherals): Json<Peripherals>,
) -> Result<StatusCode, ApiError> {
    if state.data.save_peripherals(user_id, &peripherals).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(
            "Save system specifications before adding input devices",
        ))
    }
}

//! Profile handlers — CRUD on `/profiles`. A user has at most one profile.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use socialgraph::{validate_new_profile, validate_profile_patch, Profile};
use socialgraph_api::{ChangeProfileRequest, CreateProfileRequest};

use crate::{error::AppError, storage::ProfileFilter};

use super::AppState;

/// `GET /profiles`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, AppError> {
    let profiles = state.storage.profiles().find_many(None).await?;
    Ok(Json(profiles))
}

/// `GET /profiles/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    state
        .storage
        .profiles()
        .find_one(&ProfileFilter::Id(id.clone()))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("profile {id} not found")))
}

/// `POST /profiles` — 404 if the user does not exist, 400 (`conflict`) if it
/// already has a profile.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_new_profile(&req)?;
    let profile = state.engine.create_profile(req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `PATCH /profiles/{id}` — the owning user cannot be changed.
pub async fn change(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChangeProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    validate_profile_patch(&req)?;
    let profile = state.storage.profiles().change(&id, req).await?;
    Ok(Json(profile))
}

/// `DELETE /profiles/{id}` — returns the deleted profile.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile = state.storage.profiles().delete(&id).await?;
    Ok(Json(profile))
}

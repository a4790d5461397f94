//! Post handlers — CRUD on `/posts`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use socialgraph::{validate_new_post, validate_post_patch, Post};
use socialgraph_api::{ChangePostRequest, CreatePostRequest};

use crate::{error::AppError, storage::PostFilter};

use super::AppState;

/// `GET /posts`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    let posts = state.storage.posts().find_many(None).await?;
    Ok(Json(posts))
}

/// `GET /posts/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    state
        .storage
        .posts()
        .find_one(&PostFilter::Id(id.clone()))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))
}

/// `POST /posts` — the owning user must exist (404 otherwise).
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_new_post(&req)?;
    let post = state.engine.create_post(req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// `PATCH /posts/{id}` — change title or content.
pub async fn change(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChangePostRequest>,
) -> Result<Json<Post>, AppError> {
    validate_post_patch(&req)?;
    let post = state.storage.posts().change(&id, req).await?;
    Ok(Json(post))
}

/// `DELETE /posts/{id}` — returns the deleted post.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let post = state.storage.posts().delete(&id).await?;
    Ok(Json(post))
}

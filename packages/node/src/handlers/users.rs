//! User handlers — CRUD on `/users` plus the subscription endpoints
//! `POST /users/{id}/subscribeTo`, `POST /users/{id}/unsubscribeFrom` and
//! `GET /users/{id}/subscribers`.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use socialgraph::{validate_new_user, validate_user_patch, User, UserPatch};
use socialgraph_api::{ChangeUserRequest, CreateUserRequest, SubscribeRequest};

use crate::{
    engine::CascadeReport,
    error::AppError,
    storage::UserFilter,
};

use super::AppState;

pub const CASCADE_POSTS_HEADER: &str = "x-cascade-posts";
pub const CASCADE_FOLLOWERS_HEADER: &str = "x-cascade-followers";
pub const CASCADE_FAILURES_HEADER: &str = "x-cascade-failures";

/// `GET /users` — all users in id order.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.storage.users().find_many(None).await?;
    Ok(Json(users))
}

/// `GET /users/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.require_user(&id).await?))
}

/// `POST /users` — create a user with an empty subscription list.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_new_user(&req)?;
    let user = state.storage.users().create(req).await?;
    tracing::debug!(user = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PATCH /users/{id}` — change name or email.
///
/// An unknown id is reported as a store error (400) carrying the store's
/// message.
pub async fn change(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChangeUserRequest>,
) -> Result<Json<User>, AppError> {
    let patch = UserPatch::from(req);
    validate_user_patch(&patch)?;
    let user = state.storage.users().change(&id, patch).await?;
    Ok(Json(user))
}

/// `DELETE /users/{id}` — delete the user, its profile and posts, and remove
/// it from every subscription list.
///
/// Returns the deleted user. Cleanup counts are reported in the
/// `x-cascade-*` headers; failed cleanup steps do not fail the request.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.engine.delete_user_cascade(&id).await?;
    let headers = cascade_headers(&report);
    Ok((headers, Json(report.user)))
}

fn cascade_headers(report: &CascadeReport) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CASCADE_POSTS_HEADER, HeaderValue::from(report.posts_removed()));
    headers.insert(
        CASCADE_FOLLOWERS_HEADER,
        HeaderValue::from(report.followers_updated()),
    );
    headers.insert(CASCADE_FAILURES_HEADER, HeaderValue::from(report.failures()));
    headers
}

/// `POST /users/{id}/subscribeTo` — user `id` subscribes to `userId`.
///
/// Returns the subscriber's updated record.
pub async fn subscribe_to(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<User>, AppError> {
    require_target(&req)?;
    let user = state.engine.subscribe(&id, &req.user_id).await?;
    Ok(Json(user))
}

/// `POST /users/{id}/unsubscribeFrom` — user `id` drops its subscription to
/// `userId`.
pub async fn unsubscribe_from(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<User>, AppError> {
    require_target(&req)?;
    let user = state.engine.unsubscribe(&id, &req.user_id).await?;
    Ok(Json(user))
}

fn require_target(req: &SubscribeRequest) -> Result<(), AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("userId must not be empty".into()));
    }
    Ok(())
}

/// `GET /users/{id}/subscribers` — users whose subscription list contains `id`.
pub async fn subscribers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, AppError> {
    state.require_user(&id).await?;
    let users = state
        .storage
        .users()
        .find_many(Some(&UserFilter::SubscribedTo(id)))
        .await?;
    Ok(Json(users))
}

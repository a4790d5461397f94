//! Assembles the Axum [`Router`] from all handler modules.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    config::NodeConfig,
    handlers::{health, posts, profiles, users, AppState},
    storage::Storage,
};

/// Build the complete application router with shared state.
pub fn build_router(storage: Arc<dyn Storage>, config: NodeConfig) -> Router {
    let state = AppState::new(storage, config);

    Router::new()
        .route("/health", get(health::health))
        // Users
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get_by_id)
                .patch(users::change)
                .delete(users::delete),
        )
        .route("/users/{id}/subscribeTo", post(users::subscribe_to))
        .route("/users/{id}/unsubscribeFrom", post(users::unsubscribe_from))
        .route("/users/{id}/subscribers", get(users::subscribers))
        // Posts
        .route("/posts", get(posts::list).post(posts::create))
        .route(
            "/posts/{id}",
            get(posts::get_by_id)
                .patch(posts::change)
                .delete(posts::delete),
        )
        // Profiles
        .route("/profiles", get(profiles::list).post(profiles::create))
        .route(
            "/profiles/{id}",
            get(profiles::get_by_id)
                .patch(profiles::change)
                .delete(profiles::delete),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

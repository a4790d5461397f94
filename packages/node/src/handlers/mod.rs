//! HTTP request handlers for all SocialGraph endpoints.
//!
//! Each submodule covers one resource. Handlers are async functions that
//! receive Axum extractors and return `Result<impl IntoResponse, AppError>`.
//!
//! Single-record reads and writes go straight to storage. Anything that
//! touches more than one record or depends on the owning user (subscriptions,
//! user deletion, post and profile creation) goes through the [`Engine`].

pub mod health;
pub mod posts;
pub mod profiles;
pub mod users;

use std::sync::Arc;

use socialgraph::User;

use crate::{
    config::NodeConfig,
    engine::Engine,
    error::AppError,
    storage::{Storage, UserFilter},
};

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub engine: Arc<Engine>,
    pub config: NodeConfig,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: NodeConfig) -> Self {
        Self {
            engine: Arc::new(Engine::new(Arc::clone(&storage))),
            storage,
            config,
        }
    }

    /// Load user `id` or fail with 404.
    pub(crate) async fn require_user(&self, id: &str) -> Result<User, AppError> {
        self.storage
            .users()
            .find_one(&UserFilter::Id(id.to_string()))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))
    }
}

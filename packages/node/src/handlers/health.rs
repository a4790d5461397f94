//! `GET /health` — record counts and a subscription-graph audit.

use axum::{extract::State, Json};
use socialgraph::SubscriptionGraph;
use socialgraph_api::{CollectionCounts, HealthResponse};

use crate::error::AppError;

use super::AppState;

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let users = state.storage.users().find_many(None).await?;
    let posts = state.storage.posts().find_many(None).await?;
    let profiles = state.storage.profiles().find_many(None).await?;

    let counts = CollectionCounts {
        users: users.len(),
        posts: posts.len(),
        profiles: profiles.len(),
    };
    let audit = SubscriptionGraph::from_users(users).audit();
    if !audit.is_clean() {
        tracing::warn!(
            asymmetric = audit.asymmetric_edges.len(),
            self_edges = audit.self_edges.len(),
            dangling = audit.dangling_edges.len(),
            "subscription graph is inconsistent"
        );
    }

    Ok(Json(HealthResponse::new(state.config.name.clone(), counts, audit)))
}

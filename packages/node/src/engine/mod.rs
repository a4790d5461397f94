//! Referential-integrity engines.
//!
//! The [`Engine`] owns the rules that span more than one record:
//!
//! - [`Engine::subscribe`] / [`Engine::unsubscribe`] keep the two-sided
//!   subscription bookkeeping in step (see [`subscriptions`]).
//! - [`Engine::delete_user_cascade`] removes a user together with its
//!   profile, its posts and every reference to it in other users'
//!   subscription lists (see [`cascade`]).
//! - [`Engine::create_post`] / [`Engine::create_profile`] check the owning
//!   user and insert in one step, so no record is created for a user a
//!   concurrent cascade is removing (see [`owned`]).
//!
//! # Consistency model
//!
//! The store is atomic per call only. Every graph-mutating operation and
//! every creation of a user-owned record runs while holding a process-wide
//! write gate, so two read-modify-write cycles on the same
//! `subscribedToUserIds` list never interleave inside one node.
//! Across the individual writes of one operation there is still no
//! transaction: a subscribe whose second write fails is undone by a
//! compensating write, and a cascade reports each failed cleanup step in its
//! [`CascadeReport`] instead of failing.

pub mod cascade;
pub mod owned;
pub mod subscriptions;

use std::sync::Arc;

use tokio::sync::Mutex;

use socialgraph::User;

use crate::storage::{Storage, StorageError, UserFilter};

pub use cascade::{CascadeReport, ItemOutcome};

/// Typed failure of an engine operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A referenced user does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The requested edge change contradicts the current edge state
    /// (duplicate edge, missing edge, self-subscription).
    #[error("{0}")]
    Conflict(String),

    /// Any other store failure, message preserved.
    #[error("{0}")]
    Store(String),
}

impl From<StorageError> for EngineError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(msg) => EngineError::NotFound(msg),
            other => EngineError::Store(other.to_string()),
        }
    }
}

/// Entry point for every operation that must keep several records consistent.
pub struct Engine {
    storage: Arc<dyn Storage>,
    gate: Mutex<()>,
}

impl Engine {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            gate: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    async fn require_user(&self, id: &str) -> Result<User, EngineError> {
        self.storage
            .users()
            .find_one(&UserFilter::Id(id.to_string()))
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {id} not found")))
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

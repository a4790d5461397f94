//! Creation of records owned by a user (posts, profiles).
//!
//! The owner check and the insert run under the write gate, so they cannot
//! interleave with a cascade delete of the same user.

use socialgraph::{NewPost, NewProfile, Post, Profile};

use crate::storage::{ProfileFilter, StorageError};

use super::{Engine, EngineError};

impl Engine {
    /// Create a post for an existing user.
    ///
    /// Fails with [`EngineError::NotFound`] if `data.user_id` does not exist.
    pub async fn create_post(&self, data: NewPost) -> Result<Post, EngineError> {
        let _gate = self.gate.lock().await;
        self.require_user(&data.user_id).await?;
        let post = self.storage.posts().create(data).await?;
        tracing::debug!(post = %post.id, user = %post.user_id, "post created");
        Ok(post)
    }

    /// Create the profile of an existing user.
    ///
    /// Fails with [`EngineError::NotFound`] if `data.user_id` does not exist
    /// and with [`EngineError::Conflict`] if the user already has a profile.
    pub async fn create_profile(&self, data: NewProfile) -> Result<Profile, EngineError> {
        let _gate = self.gate.lock().await;
        self.require_user(&data.user_id).await?;

        let existing = self
            .storage
            .profiles()
            .find_one(&ProfileFilter::UserId(data.user_id.clone()))
            .await?;
        if let Some(existing) = existing {
            return Err(EngineError::Conflict(format!(
                "user {} already has profile {}",
                data.user_id, existing.id
            )));
        }

        // The store enforces the same rule for writers outside this process.
        let profile = self
            .storage
            .profiles()
            .create(data)
            .await
            .map_err(|e| match e {
                StorageError::Conflict(msg) => EngineError::Conflict(msg),
                other => other.into(),
            })?;
        tracing::debug!(profile = %profile.id, user = %profile.user_id, "profile created");
        Ok(profile)
    }
}

//! User deletion with cleanup of everything that refers to the user.

use serde::Serialize;
use socialgraph::{User, UserPatch};

use crate::storage::{PostFilter, ProfileFilter, StorageError, UserFilter};

use super::{subscriptions::without, Engine, EngineError};

/// Outcome of one cleanup write issued by a cascade delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    /// Id of the record the write targeted.
    pub id: String,
    /// `None` on success, the store's message otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemOutcome {
    fn from_result<T>(id: &str, result: Result<T, StorageError>) -> Self {
        Self {
            id: id.to_string(),
            error: result.err().map(|e| e.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything a cascade delete did after removing the user record.
///
/// Cleanup failures do not fail the operation; they are listed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    /// The deleted user, as it was just before deletion.
    pub user: User,
    /// One entry per profile owned by the user (normally zero or one).
    pub profiles: Vec<ItemOutcome>,
    /// One entry per post owned by the user.
    pub posts: Vec<ItemOutcome>,
    /// One entry per other user whose list referenced the deleted user.
    pub followers: Vec<ItemOutcome>,
    /// Lookups (followers, posts or profiles) that failed outright.
    pub lookup_errors: Vec<String>,
}

impl CascadeReport {
    fn new(user: User) -> Self {
        Self {
            user,
            profiles: Vec::new(),
            posts: Vec::new(),
            followers: Vec::new(),
            lookup_errors: Vec::new(),
        }
    }

    pub fn posts_removed(&self) -> usize {
        self.posts.iter().filter(|o| o.succeeded()).count()
    }

    pub fn profiles_removed(&self) -> usize {
        self.profiles.iter().filter(|o| o.succeeded()).count()
    }

    pub fn followers_updated(&self) -> usize {
        self.followers.iter().filter(|o| o.succeeded()).count()
    }

    /// Number of failed cleanup writes and lookups.
    pub fn failures(&self) -> usize {
        self.profiles.iter().filter(|o| !o.succeeded()).count()
            + self.posts.iter().filter(|o| !o.succeeded()).count()
            + self.followers.iter().filter(|o| !o.succeeded()).count()
            + self.lookup_errors.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures() == 0
    }
}

impl Engine {
    /// Delete user `user_id` and restore referential integrity around it.
    ///
    /// Steps, each a separate store call:
    ///
    /// 1. delete the user (a failure here fails the whole operation and no
    ///    other step runs);
    /// 2. find the users whose subscription lists contain the id;
    /// 3. find the user's posts;
    /// 4. find the user's profiles;
    /// 5. delete each profile;
    /// 6. delete each post;
    /// 7. rewrite each list from step 2 without the id.
    ///
    /// Steps 5–7 run one at a time; each outcome is recorded in the returned
    /// [`CascadeReport`].
    pub async fn delete_user_cascade(&self, user_id: &str) -> Result<CascadeReport, EngineError> {
        let _gate = self.gate.lock().await;
        let users = self.storage.users();
        let posts = self.storage.posts();
        let profiles = self.storage.profiles();

        let deleted = users.delete(user_id).await?;
        let mut report = CascadeReport::new(deleted);
        let id = report.user.id.clone();

        let followers = users
            .find_many(Some(&UserFilter::SubscribedTo(id.clone())))
            .await
            .unwrap_or_else(|e| {
                report.lookup_errors.push(format!("followers: {e}"));
                Vec::new()
            });
        let owned_posts = posts
            .find_many(Some(&PostFilter::UserId(id.clone())))
            .await
            .unwrap_or_else(|e| {
                report.lookup_errors.push(format!("posts: {e}"));
                Vec::new()
            });
        let owned_profiles = profiles
            .find_many(Some(&ProfileFilter::UserId(id.clone())))
            .await
            .unwrap_or_else(|e| {
                report.lookup_errors.push(format!("profiles: {e}"));
                Vec::new()
            });

        for profile in &owned_profiles {
            let result = profiles.delete(&profile.id).await;
            report.profiles.push(ItemOutcome::from_result(&profile.id, result));
        }

        for post in &owned_posts {
            let result = posts.delete(&post.id).await;
            report.posts.push(ItemOutcome::from_result(&post.id, result));
        }

        for follower in &followers {
            let remaining = without(&follower.subscribed_to_user_ids, &id);
            let result = users
                .change(&follower.id, UserPatch::subscriptions(remaining))
                .await;
            report.followers.push(ItemOutcome::from_result(&follower.id, result));
        }

        if report.is_complete() {
            tracing::debug!(
                user = %id,
                posts = report.posts.len(),
                followers = report.followers.len(),
                "user deleted"
            );
        } else {
            tracing::warn!(
                user = %id,
                failures = report.failures(),
                "user deleted with incomplete cleanup: {:?}",
                report
            );
        }

        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

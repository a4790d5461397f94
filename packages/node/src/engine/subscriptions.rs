//! Subscribe / unsubscribe with two-sided bookkeeping.
//!
//! A subscription of A to B is recorded twice: B's id in A's list and A's id
//! in B's list. Because both directions share the same two entries, once A
//! and B are connected either way a second subscribe between them (in either
//! direction) is a duplicate.

use socialgraph::{User, UserPatch};

use super::{Engine, EngineError};

impl Engine {
    /// Subscribe `subscriber_id` to `target_id`.
    ///
    /// Fails with [`EngineError::NotFound`] if either user is missing and
    /// with [`EngineError::Conflict`] for a self-subscription or an edge that
    /// already exists. On success returns the subscriber's updated record.
    pub async fn subscribe(
        &self,
        subscriber_id: &str,
        target_id: &str,
    ) -> Result<User, EngineError> {
        let _gate = self.gate.lock().await;
        let (subscriber, target) = self.load_pair(subscriber_id, target_id).await?;

        if subscriber.id == target.id {
            return Err(EngineError::Conflict(format!(
                "user {subscriber_id} cannot subscribe to itself"
            )));
        }
        if subscriber.is_subscribed_to(&target.id) {
            return Err(EngineError::Conflict(format!(
                "user {subscriber_id} is already subscribed to {target_id}"
            )));
        }

        let mut subscriber_list = subscriber.subscribed_to_user_ids.clone();
        subscriber_list.push(target.id.clone());

        // A half-recorded edge may already carry the reciprocal entry; it is
        // completed rather than duplicated (see DESIGN.md, "Half-recorded
        // edges").
        let mut target_list = target.subscribed_to_user_ids.clone();
        if !target.is_subscribed_to(&subscriber.id) {
            target_list.push(subscriber.id.clone());
        }

        let updated = self
            .write_both(&subscriber, subscriber_list, &target, target_list)
            .await?;
        tracing::debug!(subscriber = %subscriber.id, target = %target.id, "subscribed");
        Ok(updated)
    }

    /// Remove the subscription of `subscriber_id` to `target_id`.
    ///
    /// Both sides of the edge must be recorded; a half-recorded edge is
    /// reported as [`EngineError::Conflict`] and left untouched. On success
    /// returns the subscriber's updated record.
    pub async fn unsubscribe(
        &self,
        subscriber_id: &str,
        target_id: &str,
    ) -> Result<User, EngineError> {
        let _gate = self.gate.lock().await;
        let (subscriber, target) = self.load_pair(subscriber_id, target_id).await?;

        if !subscriber.is_subscribed_to(&target.id) || !target.is_subscribed_to(&subscriber.id) {
            return Err(EngineError::Conflict(format!(
                "user {subscriber_id} is not subscribed to {target_id}"
            )));
        }

        let subscriber_list = without(&subscriber.subscribed_to_user_ids, &target.id);
        let target_list = without(&target.subscribed_to_user_ids, &subscriber.id);

        let updated = self
            .write_both(&subscriber, subscriber_list, &target, target_list)
            .await?;
        tracing::debug!(subscriber = %subscriber.id, target = %target.id, "unsubscribed");
        Ok(updated)
    }

    async fn load_pair(
        &self,
        subscriber_id: &str,
        target_id: &str,
    ) -> Result<(User, User), EngineError> {
        let subscriber = self.require_user(subscriber_id).await?;
        let target = self.require_user(target_id).await?;
        Ok((subscriber, target))
    }

    /// Write the subscriber's list, then the target's list.
    ///
    /// If the second write fails the subscriber's previous list is written
    /// back before the error is returned.
    async fn write_both(
        &self,
        subscriber: &User,
        subscriber_list: Vec<String>,
        target: &User,
        target_list: Vec<String>,
    ) -> Result<User, EngineError> {
        let users = self.storage.users();
        let updated = users
            .change(&subscriber.id, UserPatch::subscriptions(subscriber_list))
            .await?;

        if let Err(e) = users
            .change(&target.id, UserPatch::subscriptions(target_list))
            .await
        {
            let restore = UserPatch::subscriptions(subscriber.subscribed_to_user_ids.clone());
            if let Err(undo) = users.change(&subscriber.id, restore).await {
                tracing::error!(
                    subscriber = %subscriber.id,
                    target = %target.id,
                    "edge left one-sided: {undo}"
                );
            }
            return Err(EngineError::Store(e.to_string()));
        }

        Ok(updated)
    }
}

pub(super) fn without(ids: &[String], id: &str) -> Vec<String> {
    ids.iter().filter(|s| *s != id).cloned().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Request bodies for the user and subscription endpoints.

use serde::{Deserialize, Serialize};
use socialgraph::UserPatch;

/// Body of `POST /users`.
pub type CreateUserRequest = socialgraph::NewUser;

/// Body of `PATCH /users/{id}`.
///
/// Only the profile fields are accepted. The subscription list is owned by
/// the subscribe/unsubscribe endpoints and cannot be patched directly;
/// unknown fields such as `subscribedToUserIds` are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangeUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<ChangeUserRequest> for UserPatch {
    fn from(req: ChangeUserRequest) -> Self {
        UserPatch {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            subscribed_to_user_ids: None,
        }
    }
}

/// Body of `POST /users/{id}/subscribeTo` and `POST /users/{id}/unsubscribeFrom`.
///
/// `userId` names the target; the subscriber is the `{id}` path parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub user_id: String,
}

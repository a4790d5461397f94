//! Entity types for the SocialGraph service.
//!
//! This module defines the three stored records, [`User`], [`Post`] and
//! [`Profile`], together with the payloads used to create them
//! ([`NewUser`], [`NewPost`], [`NewProfile`]) and to partially update them
//! ([`UserPatch`], [`PostPatch`], [`ProfilePatch`]).
//!
//! All types serialise with camelCase field names (`subscribedToUserIds`,
//! `userId`, ...) so the JSON wire format matches the public HTTP API.

use serde::{Deserialize, Serialize};

/// Generate a fresh record identifier (UUIDv7, creation-ordered).
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user.
///
/// `subscribed_to_user_ids` holds both sides of every subscription edge the
/// user takes part in: when A subscribes to B, B's id is appended to A's list
/// and A's id is appended to B's list. A user's own id never appears in its
/// list.
///
/// # Example
///
/// ```json
/// {
///   "id": "019526b2-f68a-7c3e-a0b4-1d2e3f4a5b6c",
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "email": "ada@example.com",
///   "subscribedToUserIds": []
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub subscribed_to_user_ids: Vec<String>,
}

impl User {
    /// Build a user from a creation payload. The subscription list starts empty.
    pub fn new(id: impl Into<String>, data: NewUser) -> Self {
        Self {
            id: id.into(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            subscribed_to_user_ids: Vec::new(),
        }
    }

    /// `true` if `id` is recorded in this user's subscription list.
    pub fn is_subscribed_to(&self, id: &str) -> bool {
        self.subscribed_to_user_ids.iter().any(|s| s == id)
    }

    /// Apply the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.subscribed_to_user_ids {
            self.subscribed_to_user_ids = v;
        }
    }
}

/// Creation payload for a [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Partial update for a [`User`]. Absent fields are left unchanged.
///
/// `subscribed_to_user_ids` replaces the whole list when present. It is
/// written only by the subscription and cascade engines; the public
/// `PATCH /users/{id}` body cannot carry it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribed_to_user_ids: Option<Vec<String>>,
}

impl UserPatch {
    /// A patch that replaces only the subscription list.
    pub fn subscriptions(ids: Vec<String>) -> Self {
        Self {
            subscribed_to_user_ids: Some(ids),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// A post owned by a user. The owner must exist when the post is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub user_id: String,
}

impl Post {
    pub fn new(id: impl Into<String>, data: NewPost) -> Self {
        Self {
            id: id.into(),
            title: data.title,
            content: data.content,
            user_id: data.user_id,
        }
    }

    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.content {
            self.content = v;
        }
    }
}

/// Creation payload for a [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: String,
}

/// Partial update for a [`Post`]. The owner cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Optional extended details for a user. At most one profile exists per user.
///
/// `birthday` is a unix timestamp in seconds. `member_type_id` is an opaque
/// reference to a membership tier that this service does not interpret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub avatar: String,
    pub sex: String,
    pub birthday: i64,
    pub country: String,
    pub street: String,
    pub city: String,
    pub member_type_id: String,
    pub user_id: String,
}

impl Profile {
    pub fn new(id: impl Into<String>, data: NewProfile) -> Self {
        Self {
            id: id.into(),
            avatar: data.avatar,
            sex: data.sex,
            birthday: data.birthday,
            country: data.country,
            street: data.street,
            city: data.city,
            member_type_id: data.member_type_id,
            user_id: data.user_id,
        }
    }

    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(v) = patch.avatar {
            self.avatar = v;
        }
        if let Some(v) = patch.sex {
            self.sex = v;
        }
        if let Some(v) = patch.birthday {
            self.birthday = v;
        }
        if let Some(v) = patch.country {
            self.country = v;
        }
        if let Some(v) = patch.street {
            self.street = v;
        }
        if let Some(v) = patch.city {
            self.city = v;
        }
        if let Some(v) = patch.member_type_id {
            self.member_type_id = v;
        }
    }
}

/// Creation payload for a [`Profile`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub avatar: String,
    pub sex: String,
    pub birthday: i64,
    pub country: String,
    pub street: String,
    pub city: String,
    pub member_type_id: String,
    pub user_id: String,
}

/// Partial update for a [`Profile`]. The owning user cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_type_id: Option<String>,
}

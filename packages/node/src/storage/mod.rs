//! Record store for the SocialGraph node.
//!
//! The [`Storage`] trait hands out one [`Collection`] per entity (users,
//! posts, profiles). A collection offers the five primitives everything else
//! is built from: `find_one`, `find_many`, `create`, `change` and `delete`.
//! Each call is atomic on its own; nothing is transactional across calls or
//! across collections. Keeping related records consistent is the job of the
//! engines in [`crate::engine`], not of storage.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryStorage`] | Tests, conformance suite, ephemeral nodes |
//! | [`SqliteStorage`] | Production; durable single-file database |
//!
//! [`MemoryStorage`]: memory::MemoryStorage
//! [`SqliteStorage`]: sqlite::SqliteStorage

pub mod memory;
pub mod sqlite;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use socialgraph::{NewPost, NewProfile, NewUser, Post, PostPatch, Profile, ProfilePatch, User, UserPatch};

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors that storage operations can return.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// The addressed record does not exist (`change` / `delete`).
    #[error("{0}")]
    NotFound(String),

    /// A record with the same key already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An unexpected error in the underlying storage backend.
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    pub(crate) fn missing(collection: &str, id: &str) -> Self {
        StorageError::NotFound(format!("{collection} record {id} not found"))
    }
}

// ---------------------------------------------------------------------------
// Record and filters
// ---------------------------------------------------------------------------

/// A stored entity type.
///
/// Ties an entity to its creation payload, its patch type and the filter
/// used to query it, so that a single generic collection implementation can
/// serve every entity.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type New: Send + 'static;
    type Patch: Send + 'static;
    type Filter: RecordFilter<Self>;

    /// Collection (and SQL table) name, e.g. `"users"`.
    const COLLECTION: &'static str;

    /// At most one record per owning user. `create` of a second one fails
    /// with [`StorageError::Conflict`].
    const UNIQUE_OWNER: bool = false;

    fn id(&self) -> &str;

    /// Id of the owning user, if this entity has one. Stored in an indexed
    /// column by the SQLite backend.
    fn owner_id(&self) -> Option<&str>;

    fn build(id: String, data: Self::New) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch);
}

/// A single `key == value` predicate over a [`Record`].
pub trait RecordFilter<R>: Clone + Debug + Send + Sync + 'static {
    /// Evaluate the predicate in memory.
    fn matches(&self, record: &R) -> bool;

    /// The equivalent SQL `WHERE` clause (with a single `?1` placeholder)
    /// and its bound value.
    fn sql(&self) -> (&'static str, String);
}

/// Predicates over [`User`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(String),
    /// Users whose `subscribedToUserIds` contains the given id.
    SubscribedTo(String),
}

/// Predicates over [`Post`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    Id(String),
    UserId(String),
}

/// Predicates over [`Profile`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFilter {
    Id(String),
    UserId(String),
}

const ID_CLAUSE: &str = "id = ?1";
const OWNER_CLAUSE: &str = "user_id = ?1";

impl RecordFilter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Id(id) => user.id == *id,
            UserFilter::SubscribedTo(id) => user.is_subscribed_to(id),
        }
    }

    fn sql(&self) -> (&'static str, String) {
        match self {
            UserFilter::Id(id) => (ID_CLAUSE, id.clone()),
            UserFilter::SubscribedTo(id) => (
                "EXISTS (SELECT 1 FROM json_each(data, '$.subscribedToUserIds') WHERE value = ?1)",
                id.clone(),
            ),
        }
    }
}

impl RecordFilter<Post> for PostFilter {
    fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::Id(id) => post.id == *id,
            PostFilter::UserId(id) => post.user_id == *id,
        }
    }

    fn sql(&self) -> (&'static str, String) {
        match self {
            PostFilter::Id(id) => (ID_CLAUSE, id.clone()),
            PostFilter::UserId(id) => (OWNER_CLAUSE, id.clone()),
        }
    }
}

impl RecordFilter<Profile> for ProfileFilter {
    fn matches(&self, profile: &Profile) -> bool {
        match self {
            ProfileFilter::Id(id) => profile.id == *id,
            ProfileFilter::UserId(id) => profile.user_id == *id,
        }
    }

    fn sql(&self) -> (&'static str, String) {
        match self {
            ProfileFilter::Id(id) => (ID_CLAUSE, id.clone()),
            ProfileFilter::UserId(id) => (OWNER_CLAUSE, id.clone()),
        }
    }
}

impl Record for User {
    type New = NewUser;
    type Patch = UserPatch;
    type Filter = UserFilter;
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> Option<&str> {
        None
    }

    fn build(id: String, data: NewUser) -> Self {
        User::new(id, data)
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        self.apply(patch);
    }
}

impl Record for Post {
    type New = NewPost;
    type Patch = PostPatch;
    type Filter = PostFilter;
    const COLLECTION: &'static str = "posts";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }

    fn build(id: String, data: NewPost) -> Self {
        Post::new(id, data)
    }

    fn apply_patch(&mut self, patch: PostPatch) {
        self.apply(patch);
    }
}

impl Record for Profile {
    type New = NewProfile;
    type Patch = ProfilePatch;
    type Filter = ProfileFilter;
    const COLLECTION: &'static str = "profiles";
    const UNIQUE_OWNER: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> Option<&str> {
        Some(&self.user_id)
    }

    fn build(id: String, data: NewProfile) -> Self {
        Profile::new(id, data)
    }

    fn apply_patch(&mut self, patch: ProfilePatch) {
        self.apply(patch);
    }
}

// ---------------------------------------------------------------------------
// Collection and Storage traits
// ---------------------------------------------------------------------------

/// CRUD primitives over one entity collection.
///
/// Referential checks (e.g. "the post's owner exists") are the caller's
/// responsibility; `create` stores whatever it is given under a fresh id.
#[async_trait]
pub trait Collection<R: Record>: Send + Sync {
    /// The first record (in id order) matching `filter`, or `None`.
    async fn find_one(&self, filter: &R::Filter) -> Result<Option<R>, StorageError>;

    /// All records matching `filter` (all records when `None`), in id order.
    async fn find_many(&self, filter: Option<&R::Filter>) -> Result<Vec<R>, StorageError>;

    /// Store a new record under a freshly generated UUIDv7 id.
    async fn create(&self, data: R::New) -> Result<R, StorageError>;

    /// Apply `patch` to the record `id` and return its new state.
    /// Returns [`StorageError::NotFound`] if `id` does not exist.
    async fn change(&self, id: &str, patch: R::Patch) -> Result<R, StorageError>;

    /// Remove the record `id` and return its last state.
    /// Returns [`StorageError::NotFound`] if `id` does not exist.
    async fn delete(&self, id: &str) -> Result<R, StorageError>;
}

/// The persistence contract for a SocialGraph node.
///
/// Implementations must be `Send + Sync + 'static` so they can be held in an
/// `Arc<dyn Storage>`.
pub trait Storage: Send + Sync + 'static {
    fn users(&self) -> &dyn Collection<User>;
    fn posts(&self) -> &dyn Collection<Post>;
    fn profiles(&self) -> &dyn Collection<Profile>;
}

// ---------------------------------------------------------------------------
// Contract tests shared by both backends
// ---------------------------------------------------------------------------

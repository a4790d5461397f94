//! In-memory storage implementation.
//!
//! All data is held in RAM behind a [`RwLock`] per collection and is lost
//! when the process exits. Use this for tests, the conformance suite, and
//! ephemeral nodes.
//!
//! Records are stored in a [`BTreeMap`] keyed by UUIDv7 id. Because UUIDv7
//! ids sort lexicographically in creation order, iterating the map yields
//! records oldest-first with no secondary index.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use socialgraph::{Post, Profile, User};

use super::{Collection, Record, RecordFilter, Storage, StorageError};

// ---------------------------------------------------------------------------
// MemoryCollection
// ---------------------------------------------------------------------------

/// Thread-safe, in-memory implementation of [`Collection`] for any [`Record`].
pub struct MemoryCollection<R> {
    records: RwLock<BTreeMap<String, R>>,
}

impl<R: Record> MemoryCollection<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, R>>, StorageError> {
        self.records
            .read()
            .map_err(|_| StorageError::Internal(format!("{} lock poisoned", R::COLLECTION)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, R>>, StorageError> {
        self.records
            .write()
            .map_err(|_| StorageError::Internal(format!("{} lock poisoned", R::COLLECTION)))
    }
}

impl<R: Record> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Collection<R> for MemoryCollection<R> {
    async fn find_one(&self, filter: &R::Filter) -> Result<Option<R>, StorageError> {
        let records = self.read()?;
        Ok(records.values().find(|r| filter.matches(r)).cloned())
    }

    async fn find_many(&self, filter: Option<&R::Filter>) -> Result<Vec<R>, StorageError> {
        let records = self.read()?;
        let result = records
            .values()
            .filter(|r| filter.map_or(true, |f| f.matches(r)))
            .cloned()
            .collect();
        Ok(result)
    }

    async fn create(&self, data: R::New) -> Result<R, StorageError> {
        let record = R::build(socialgraph::new_id(), data);
        let mut records = self.write()?;
        if records.contains_key(record.id()) {
            return Err(StorageError::Conflict(format!(
                "{} record {} already exists",
                R::COLLECTION,
                record.id()
            )));
        }
        if R::UNIQUE_OWNER {
            if let Some(owner) = record.owner_id() {
                if records.values().any(|r| r.owner_id() == Some(owner)) {
                    return Err(StorageError::Conflict(format!(
                        "{} record for user {owner} already exists",
                        R::COLLECTION
                    )));
                }
            }
        }
        records.insert(record.id().to_string(), record.clone());
        Ok(record)
    }

    async fn change(&self, id: &str, patch: R::Patch) -> Result<R, StorageError> {
        let mut records = self.write()?;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StorageError::missing(R::COLLECTION, id))?;
        record.apply_patch(patch);
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<R, StorageError> {
        let mut records = self.write()?;
        records
            .remove(id)
            .ok_or_else(|| StorageError::missing(R::COLLECTION, id))
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Thread-safe, in-memory implementation of [`Storage`].
#[derive(Default)]
pub struct MemoryStorage {
    users: MemoryCollection<User>,
    posts: MemoryCollection<Post>,
    profiles: MemoryCollection<Profile>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn users(&self) -> &dyn Collection<User> {
        &self.users
    }

    fn posts(&self) -> &dyn Collection<Post> {
        &self.posts
    }

    fn profiles(&self) -> &dyn Collection<Profile> {
        &self.profiles
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

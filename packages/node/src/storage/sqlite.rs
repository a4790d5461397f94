//! SQLite-backed storage implementation.
//!
//! Uses `rusqlite` (with bundled SQLite) wrapped in an `Arc<Mutex<Connection>>`
//! to satisfy the `Send + Sync` requirements. All blocking calls are offloaded
//! to a thread-pool via `tokio::task::spawn_blocking`.
//!
//! # Schema
//!
//! One table per collection (`users`, `posts`, `profiles`), each holding the
//! full JSON document plus the columns filters need:
//!
//! - `id` — primary key; UUIDv7, so `ORDER BY id` is creation order.
//! - `user_id` — owning user for posts and profiles, `NULL` for users.
//!   Unique for profiles.
//! - `data` — the record as JSON. Subscription lookups query
//!   `data -> subscribedToUserIds` through `json_each`.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode};
use socialgraph::{Post, Profile, User};

use super::{Collection, Record, RecordFilter, Storage, StorageError};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id       TEXT PRIMARY KEY,
    user_id  TEXT,
    data     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id       TEXT PRIMARY KEY,
    user_id  TEXT,
    data     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts(user_id);

CREATE TABLE IF NOT EXISTS profiles (
    id       TEXT PRIMARY KEY,
    user_id  TEXT,
    data     TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_profiles_user_id_unique ON profiles(user_id);
";

// ---------------------------------------------------------------------------
// Error conversions
// ---------------------------------------------------------------------------

fn map_err(e: rusqlite::Error) -> StorageError {
    match &e {
        rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation => {
            StorageError::Conflict(e.to_string())
        }
        _ => StorageError::Internal(e.to_string()),
    }
}

fn map_json_err(e: serde_json::Error) -> StorageError {
    StorageError::Internal(format!("JSON error: {e}"))
}

/// Run `f` against the shared connection on the blocking thread-pool.
async fn blocking<T, F>(conn: &Arc<Mutex<Connection>>, f: F) -> Result<T, StorageError>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
{
    let conn = Arc::clone(conn);
    tokio::task::spawn_blocking(move || {
        let mut conn = conn
            .lock()
            .map_err(|_| StorageError::Internal("sqlite connection lock poisoned".into()))?;
        f(&mut conn)
    })
    .await
    .map_err(|e| StorageError::Internal(format!("task join error: {e}")))?
}

fn decode<R: Record>(rows: Vec<String>) -> Result<Vec<R>, StorageError> {
    rows.iter()
        .map(|data| serde_json::from_str(data).map_err(map_json_err))
        .collect()
}

// ---------------------------------------------------------------------------
// SqliteCollection
// ---------------------------------------------------------------------------

/// SQLite-backed [`Collection`] for the table named by `R::COLLECTION`.
pub struct SqliteCollection<R> {
    conn: Arc<Mutex<Connection>>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SqliteCollection<R> {
    fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record> Collection<R> for SqliteCollection<R> {
    async fn find_one(&self, filter: &R::Filter) -> Result<Option<R>, StorageError> {
        let (clause, value) = filter.sql();
        let sql = format!(
            "SELECT data FROM {} WHERE {clause} ORDER BY id ASC LIMIT 1",
            R::COLLECTION
        );

        blocking(&self.conn, move |conn| {
            let result = conn.query_row(&sql, params![value], |row| row.get::<_, String>(0));
            match result {
                Ok(data) => Ok(Some(serde_json::from_str(&data).map_err(map_json_err)?)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(map_err(e)),
            }
        })
        .await
    }

    async fn find_many(&self, filter: Option<&R::Filter>) -> Result<Vec<R>, StorageError> {
        let predicate = filter.map(|f| f.sql());

        blocking(&self.conn, move |conn| {
            let rows: Vec<String> = match predicate {
                Some((clause, value)) => {
                    let sql = format!(
                        "SELECT data FROM {} WHERE {clause} ORDER BY id ASC",
                        R::COLLECTION
                    );
                    let mut stmt = conn.prepare(&sql).map_err(map_err)?;
                    let rows = stmt
                        .query_map(params![value], |row| row.get::<_, String>(0))
                        .map_err(map_err)?
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(map_err)?;
                    rows
                }
                None => {
                    let sql = format!("SELECT data FROM {} ORDER BY id ASC", R::COLLECTION);
                    let mut stmt = conn.prepare(&sql).map_err(map_err)?;
                    let rows = stmt
                        .query_map([], |row| row.get::<_, String>(0))
                        .map_err(map_err)?
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(map_err)?;
                    rows
                }
            };
            decode(rows)
        })
        .await
    }

    async fn create(&self, data: R::New) -> Result<R, StorageError> {
        let record = R::build(socialgraph::new_id(), data);

        blocking(&self.conn, move |conn| {
            let json = serde_json::to_string(&record).map_err(map_json_err)?;
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, user_id, data) VALUES (?1, ?2, ?3)",
                    R::COLLECTION
                ),
                params![record.id(), record.owner_id(), json],
            )
            .map_err(map_err)?;
            Ok(record)
        })
        .await
    }

    async fn change(&self, id: &str, patch: R::Patch) -> Result<R, StorageError> {
        let id = id.to_string();

        blocking(&self.conn, move |conn| {
            let tx = conn.transaction().map_err(map_err)?;
            let data = match tx.query_row(
                &format!("SELECT data FROM {} WHERE id = ?1", R::COLLECTION),
                params![id],
                |row| row.get::<_, String>(0),
            ) {
                Ok(data) => data,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(StorageError::missing(R::COLLECTION, &id))
                }
                Err(e) => return Err(map_err(e)),
            };

            let mut record: R = serde_json::from_str(&data).map_err(map_json_err)?;
            record.apply_patch(patch);
            let json = serde_json::to_string(&record).map_err(map_json_err)?;

            tx.execute(
                &format!(
                    "UPDATE {} SET user_id = ?2, data = ?3 WHERE id = ?1",
                    R::COLLECTION
                ),
                params![id, record.owner_id(), json],
            )
            .map_err(map_err)?;
            tx.commit().map_err(map_err)?;
            Ok(record)
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<R, StorageError> {
        let id = id.to_string();

        blocking(&self.conn, move |conn| {
            let result = conn.query_row(
                &format!("DELETE FROM {} WHERE id = ?1 RETURNING data", R::COLLECTION),
                params![id],
                |row| row.get::<_, String>(0),
            );
            match result {
                Ok(data) => serde_json::from_str(&data).map_err(map_json_err),
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    Err(StorageError::missing(R::COLLECTION, &id))
                }
                Err(e) => Err(map_err(e)),
            }
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// SqliteStorage
// ---------------------------------------------------------------------------

/// SQLite-backed implementation of [`Storage`].
///
/// All three collections share a single database connection protected by a
/// `Mutex`.
pub struct SqliteStorage {
    users: SqliteCollection<User>,
    posts: SqliteCollection<Post>,
    profiles: SqliteCollection<Profile>,
}

impl SqliteStorage {
    /// Open (or create) the SQLite database at `path` and apply the schema.
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory SQLite database (data is lost when dropped).
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch(SCHEMA)?;
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self {
            users: SqliteCollection::new(Arc::clone(&conn)),
            posts: SqliteCollection::new(Arc::clone(&conn)),
            profiles: SqliteCollection::new(conn),
        })
    }
}

impl Storage for SqliteStorage {
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

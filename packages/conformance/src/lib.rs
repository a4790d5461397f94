//! Shared helpers for the SocialGraph conformance test suite.
//!
//! Provides [`spawn_node`] — a function that binds a `TcpListener` on an
//! ephemeral port, wires up an in-process node backed by `MemoryStorage`,
//! and returns both the local URL and a reference to the underlying storage
//! so tests can seed or inspect records without going through the HTTP layer.
//! [`spawn_sqlite_node`] does the same over an in-memory SQLite database.

use std::sync::Arc;

use socialgraph_node::{build_router, MemoryStorage, NodeConfig, SqliteStorage, Storage};

/// Start an ephemeral in-process node and return `(base_url, storage)`.
///
/// The node runs in a background `tokio` task and is bound to an OS-assigned
/// port on `127.0.0.1`. The returned `String` is the base URL, e.g.
/// `http://127.0.0.1:51234`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the node fails to start.
pub async fn spawn_node() -> (String, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let base_url = serve(Arc::clone(&storage) as Arc<dyn Storage>).await;
    (base_url, storage)
}

/// Like [`spawn_node`], backed by an in-memory SQLite database.
///
/// # Panics
///
/// Panics if the database cannot be opened or the listener cannot be bound.
pub async fn spawn_sqlite_node() -> (String, Arc<SqliteStorage>) {
    let storage = Arc::new(SqliteStorage::open_in_memory().expect("open in-memory sqlite"));
    let base_url = serve(Arc::clone(&storage) as Arc<dyn Storage>).await;
    (base_url, storage)
}

async fn serve(storage: Arc<dyn Storage>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    let config = NodeConfig {
        bind_addr: addr,
        db_path: None,
        name: Some("conformance-node".into()),
    };
    let router = build_router(storage, config);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance node error");
    });

    format!("http://{addr}")
}

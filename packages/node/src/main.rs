//! `socialgraph-node` — HTTP service for users, posts, profiles and
//! subscriptions.
//!
//! # Quick start
//!
//! ```sh
//! # In-memory node on the default port:
//! socialgraph-node
//!
//! # Persistent SQLite node:
//! SOCIALGRAPH_DB=./graph.db socialgraph-node
//!
//! # Custom bind address:
//! SOCIALGRAPH_BIND=127.0.0.1:8080 socialgraph-node
//! ```
//!
//! # Environment variables
//!
//! See [`NodeConfig::from_env`] for the full list.

use std::process::ExitCode;
use std::sync::Arc;

use socialgraph_node::{build_router, MemoryStorage, NodeConfig, SqliteStorage, Storage};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "socialgraph_node=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = match NodeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let storage: Arc<dyn Storage> = match &config.db_path {
        Some(path) => match SqliteStorage::open(path) {
            Ok(storage) => {
                tracing::info!("storage: SQLite at {path}");
                Arc::new(storage)
            }
            Err(e) => {
                tracing::error!("failed to open SQLite database at {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            tracing::info!("storage: in-memory (data will not survive restart)");
            Arc::new(MemoryStorage::new())
        }
    };

    let bind_addr = config.bind_addr;
    let app = build_router(storage, config);

    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {bind_addr}: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("listening on {bind_addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

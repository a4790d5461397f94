//! Public surface for the `socialgraph-node` crate.
//!
//! Exposes the router builder, config, engine and storage types so that
//! external crates (e.g. the conformance test suite) can spin up an
//! in-process node without spawning a subprocess.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod router;
pub mod storage;

pub use config::{ConfigError, NodeConfig};
pub use engine::{CascadeReport, Engine, EngineError};
pub use router::build_router;
pub use storage::{memory::MemoryStorage, sqlite::SqliteStorage, Storage, StorageError};

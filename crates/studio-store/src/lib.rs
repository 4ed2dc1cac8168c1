//! studio_store - Local persistence for the content studio
//!
//! Durable keys live as JSON documents in a data directory (`FileStore`);
//! session-scoped keys live in memory (`MemoryStore`). `Persisted` and
//! `HistoryList` keep in-memory values mirrored into either.

pub mod config;
pub mod error;
pub mod history;
pub mod keys;
pub mod paths;
pub mod persisted;
pub mod preferences;
pub mod storage;

pub use config::StudioConfig;
pub use error::{Result, StoreError};
pub use history::HistoryList;
pub use persisted::Persisted;
pub use preferences::Preferences;
pub use storage::{FileStore, KeyValueStore, MemoryStore};

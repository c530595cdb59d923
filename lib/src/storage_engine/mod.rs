// lib/src/storage_engine/mod.rs

pub mod collection;
pub mod config;
pub mod sled_storage;

pub use collection::Collection;
pub use config::{StorageConfig, StorageEngineType, DEFAULT_DATABASE_URL};
pub use sled_storage::SledDocumentStore;

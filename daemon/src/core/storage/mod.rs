mod memory;

pub use memory::MemoryStorer;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("key not found in storage")]
    KeyNotFound,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Key/value persistence boundary used for per-header scheduled state.
#[async_trait]
pub trait Storer: Send + Sync {
    async fn get(&self, key: &[u8]) -> Result<Vec<u8>, StorageError>;

    async fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;
}

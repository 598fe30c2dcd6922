use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StorageError, Storer};

/// In-memory storer backed by a hash map. Used as the default backend in
/// tests and for nodes that do not persist scheduled state across restarts.
#[derive(Debug, Default)]
pub struct MemoryStorer {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Storer for MemoryStorer {
    async fn get(&self, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        self.entries
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or(StorageError::KeyNotFound)
    }

    async fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let storer = MemoryStorer::new();
        storer.put(b"header hash", b"scheduled state").await.unwrap();

        assert_eq!(
            storer.get(b"header hash").await.unwrap(),
            b"scheduled state"
        );
        assert_eq!(storer.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let storer = MemoryStorer::new();
        assert!(matches!(
            storer.get(b"absent").await,
            Err(StorageError::KeyNotFound)
        ));
    }
}

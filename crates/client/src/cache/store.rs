//! Storage seam for the resource cache.

use async_trait::async_trait;
use datapak_core::{Error, KvStore};

/// Byte-oriented key-value storage as seen by the cache.
///
/// The cache borrows a store for all I/O and never assumes multi-key
/// atomicity: each get/set stands alone.
#[async_trait]
pub trait ByteStore: Send + Sync {
    /// Stored value for a key, or None if the key was never set.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Durably write a value, replacing any prior value for the key.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), Error>;
}

#[async_trait]
impl ByteStore for KvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        KvStore::get(self, key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        KvStore::set(self, key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_kv_store_through_trait() {
        let store = KvStore::in_memory("resources").await.unwrap();
        let dyn_store: &dyn ByteStore = &store;

        dyn_store.set("key", b"value").await.unwrap();
        let value = dyn_store.get("key").await.unwrap().unwrap();
        assert_eq!(value, b"value");
    }
}

use crate::domain::ports::CacheBackend;
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Process-local cache. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().await.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<String> {
        self.entries
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::CacheKeyNotFound {
                key: key.to_string(),
            })
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::new();
        assert!(!cache.exists("region|CZ").await.unwrap());

        cache.set("region|CZ", "[]".to_string()).await.unwrap();
        cache.set("region|CZ", "[1]".to_string()).await.unwrap();

        assert!(cache.exists("region|CZ").await.unwrap());
        assert_eq!(cache.get("region|CZ").await.unwrap(), "[1]");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = MemoryCache::new();
        let err = cache.get("point|X").await.unwrap_err();
        assert!(matches!(err, LookupError::CacheKeyNotFound { key } if key == "point|X"));
    }
}

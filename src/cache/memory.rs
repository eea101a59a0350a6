//! In-process cache backend

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{CacheBackend, CacheError, CacheResult};

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> CacheResult<usize> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Drop one entry, as an eviction would.
    pub fn evict(&self, key: &str) -> CacheResult<bool> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.remove(key).is_some())
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn set(&self, key: &str, value: String) -> CacheResult<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("k", "v1".to_string()).await.unwrap();
        cache.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_evict() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string()).await.unwrap();
        assert!(cache.evict("k").unwrap());
        assert!(!cache.evict("k").unwrap());
        assert!(cache.is_empty().unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let cache = std::sync::Arc::new(MemoryCache::new());
        let poisoner = std::sync::Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _entries = poisoner.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(cache.len(), Err(CacheError::Poisoned)));
        assert!(matches!(cache.is_empty(), Err(CacheError::Poisoned)));
        assert!(matches!(cache.evict("k"), Err(CacheError::Poisoned)));
    }
}

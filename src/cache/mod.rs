//! Advisory key-value cache shared by all stages.
//!
//! Backends implement [`CacheStore`] and may fail. Stages never talk to a
//! backend directly; they go through [`Cache`], which logs backend failures
//! and reports them as a miss (reads) or a dropped write.

pub mod keys;
mod memory;

pub use memory::MemoryCache;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::TARGET_CACHE;

/// A string-valued store with per-entry TTL.
///
/// Implementations must tolerate concurrent readers and writers. Last write
/// wins is acceptable.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

/// Fail-open, typed front end over a [`CacheStore`].
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// In-process cache, suitable for a single worker or for tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }

    /// Looks up and deserializes a cached value.
    ///
    /// Backend errors and undecodable entries are logged and treated as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(target: TARGET_CACHE, "Cache miss for {}", key);
                return None;
            }
            Err(e) => {
                warn!(target: TARGET_CACHE, "Cache read for {} failed, treating as miss: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(target: TARGET_CACHE, "Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                warn!(target: TARGET_CACHE, "Cached value for {} could not be decoded, treating as miss: {}", key, e);
                None
            }
        }
    }

    /// Serializes and stores a value. Failures are logged and dropped.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(target: TARGET_CACHE, "Failed to serialize cache value for {}: {}", key, CacheError::from(e));
                return;
            }
        };

        if let Err(e) = self.store.set(key, raw, ttl).await {
            warn!(target: TARGET_CACHE, "Cache write for {} failed, continuing without it: {}", key, e);
        }
    }
}

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::CacheStore;
use crate::error::CacheError;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local [`CacheStore`] backed by a sharded concurrent map.
///
/// Expired entries are dropped lazily on read, or in bulk with [`MemoryCache::purge_expired`].
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Ok(Some(entry.value.clone()));
            }
        } else {
            return Ok(None);
        }

        // The read guard is released above; only now is it safe to remove.
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Unavailable(format!("TTL {:?} overflows the clock", ttl)))?;
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }
}

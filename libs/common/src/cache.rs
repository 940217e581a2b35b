//! Key-value store with TTL support
//!
//! [`KeyValueStore`] is the contract the session layer depends on. Two
//! backends implement it: [`RedisPool`] for deployments and [`MemoryStore`]
//! for tests and single-process development runs.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::info;

use crate::error::{ConfigError, StoreResult};

/// Minimal key-value contract with per-key expiry
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl_seconds` when given
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()>;

    /// Fetch the value under `key`; expired keys read as absent
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Remove `key`; removing an absent key is not an error
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Check if the store is reachable
    async fn health_check(&self) -> StoreResult<bool>;
}

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Result<Self, ConfigError> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        Ok(RedisConfig { url })
    }
}

/// Redis-backed store
///
/// Holds one multiplexed connection; clones share it, and concurrent
/// commands are pipelined over it.
#[derive(Clone)]
pub struct RedisPool {
    connection: MultiplexedConnection,
}

impl RedisPool {
    /// Connect to Redis
    pub async fn new(config: &RedisConfig) -> StoreResult<Self> {
        let client = Client::open(config.url.clone())?;
        let connection = client.get_multiplexed_async_connection().await?;
        info!("Redis client connected");
        Ok(RedisPool { connection })
    }
}

#[async_trait]
impl KeyValueStore for RedisPool {
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()> {
        let mut conn = self.connection.clone();

        if let Some(ttl) = ttl_seconds {
            let _: () = conn.set_ex(key, value, ttl).await?;
        } else {
            let _: () = conn.set(key, value).await?;
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let _: u64 = conn.del(key).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// In-process store with Redis-like expiry semantics
///
/// Expiry uses `tokio::time`, so tests running on a paused clock can
/// advance past a TTL deterministically.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, MemoryEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()> {
        let now = Instant::now();
        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at: ttl_seconds.map(|ttl| now + Duration::from_secs(ttl)),
        };

        let mut entries = self.entries.write().await;
        // Expired keys are dropped lazily on write so the map stays bounded.
        entries.retain(|_, e| e.is_live(now));
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = MemoryStore::new();

        store.set("test_key", "test_value", Some(5)).await.unwrap();
        assert_eq!(
            store.get("test_key").await.unwrap(),
            Some("test_value".to_string())
        );

        store.delete("test_key").await.unwrap();
        assert_eq!(store.get("test_key").await.unwrap(), None);

        // Deleting again is fine
        store.delete("test_key").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let store = MemoryStore::new();
        store.set("short", "lived", Some(2)).await.unwrap();
        store.set("forever", "value", None).await.unwrap();

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert_eq!(store.get("short").await.unwrap(), Some("lived".to_string()));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("forever").await.unwrap(), Some("value".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_resets_ttl() {
        let store = MemoryStore::new();
        store.set("k", "v1", Some(1)).await.unwrap();
        tokio::time::advance(Duration::from_millis(900)).await;
        store.set("k", "v2", Some(1)).await.unwrap();
        tokio::time::advance(Duration::from_millis(900)).await;
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis at REDIS_URL"]
    async fn test_redis_set_get_delete() {
        let pool = RedisPool::new(&RedisConfig::from_env().unwrap())
            .await
            .unwrap();
        assert!(pool.health_check().await.unwrap());

        pool.set("test_key", "test_value", Some(5)).await.unwrap();
        assert_eq!(
            pool.get("test_key").await.unwrap(),
            Some("test_value".to_string())
        );

        pool.delete("test_key").await.unwrap();
        assert_eq!(pool.get("test_key").await.unwrap(), None);
    }
}

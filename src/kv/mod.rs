pub mod memory;
pub mod redis;

use crate::error::HubError;

/// Injected key-value interface shared by all route handlers.
///
/// The hosted store is the production backend; the in-memory one serves
/// local development (no KV URL configured) and tests. Both expose the
/// same four operations: plain get/set plus sorted-set add/range.
pub enum KvStore {
    Redis(redis::RedisKv),
    Memory(memory::MemoryKv),
}

impl KvStore {
    /// Build a store from a connection URL. Empty ⇒ in-memory.
    pub fn connect(url: &str) -> Result<Self, HubError> {
        if url.is_empty() {
            tracing::warn!("no KV URL configured, using in-memory store");
            return Ok(Self::Memory(memory::MemoryKv::new()));
        }
        Ok(Self::Redis(redis::RedisKv::new(url)?))
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, HubError> {
        match self {
            Self::Redis(kv) => kv.get(key).await,
            Self::Memory(kv) => Ok(kv.get(key).await),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), HubError> {
        match self {
            Self::Redis(kv) => kv.set(key, value).await,
            Self::Memory(kv) => {
                kv.set(key, value).await;
                Ok(())
            }
        }
    }

    /// Add `member` to the sorted set at `key`, scored by `score`.
    /// Re-adding an existing member moves it to the new score.
    pub async fn zadd(&self, key: &str, score: i64, member: &str) -> Result<(), HubError> {
        match self {
            Self::Redis(kv) => kv.zadd(key, score, member).await,
            Self::Memory(kv) => {
                kv.zadd(key, score, member).await;
                Ok(())
            }
        }
    }

    /// Full ascending range of the sorted set at `key`, with scores.
    pub async fn zrange_withscores(&self, key: &str) -> Result<Vec<(String, i64)>, HubError> {
        match self {
            Self::Redis(kv) => kv.zrange_withscores(key).await,
            Self::Memory(kv) => Ok(kv.zrange_withscores(key).await),
        }
    }
}

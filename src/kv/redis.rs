use redis::AsyncCommands;

use crate::error::HubError;

/// Thin client for the hosted KV store.
///
/// A connection is multiplexed per call; the client itself is cheap to
/// clone. Store failures propagate directly, no retries.
pub struct RedisKv {
    client: redis::Client,
}

impl RedisKv {
    pub fn new(url: &str) -> Result<Self, HubError> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, HubError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let v: Option<String> = conn.get(key).await?;
        Ok(v)
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), HubError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    pub async fn zadd(&self, key: &str, score: i64, member: &str) -> Result<(), HubError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.zadd(key, member, score).await?;
        Ok(())
    }

    pub async fn zrange_withscores(&self, key: &str) -> Result<Vec<(String, i64)>, HubError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let entries: Vec<(String, i64)> = conn.zrange_withscores(key, 0, -1).await?;
        Ok(entries)
    }
}

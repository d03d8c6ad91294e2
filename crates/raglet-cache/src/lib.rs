//! Redis-backed implementation of the [`Cache`] trait.
//!
//! A thin pass-through over a multiplexed connection; expiry and eviction
//! are fully owned by Redis.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use raglet_core::config::RedisConfig;
use raglet_core::error::{RagletError, Result};
use raglet_core::traits::Cache;

/// Cache client backed by Redis.
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect and build a reconnecting multiplexed connection.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.redis_url())
            .map_err(|e| RagletError::Cache(format!("invalid Redis URL: {e}")))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| RagletError::Cache(format!("Redis connect failed: {e}")))?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        conn.get(key)
            .await
            .map_err(|e| RagletError::Cache(format!("GET {key} failed: {e}")))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()> {
        let mut conn = self.manager.clone();
        match ttl_seconds {
            Some(ttl) => conn
                .set_ex::<_, _, ()>(key, value, ttl)
                .await
                .map_err(|e| RagletError::Cache(format!("SETEX {key} failed: {e}"))),
            None => conn
                .set::<_, _, ()>(key, value)
                .await
                .map_err(|e| RagletError::Cache(format!("SET {key} failed: {e}"))),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| RagletError::Cache(format!("DEL {key} failed: {e}")))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| RagletError::Cache(format!("Redis unreachable: {e}")))
    }
}

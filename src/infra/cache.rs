//! Redis cache implementation.
//!
//! Provides a type-safe caching layer with connection pooling plus the
//! advisory object-lock markers factories set around update spans. The
//! markers are hints for interested readers (admin surfaces, peer
//! processes); row locks inside transactions are the correctness
//! mechanism.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::config::{Config, CACHE_PREFIX_LOCK};
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
    default_ttl: u64,
    lock_ttl: u64,
}

impl Cache {
    /// Create a new cache instance and connect to Redis.
    ///
    /// # Panics
    /// Panics if Redis connection fails.
    pub async fn connect(config: &Config) -> Self {
        Self::try_connect(config)
            .await
            .expect("Failed to connect to Redis")
    }

    /// Try to connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self {
            connection,
            default_ttl: config.cache_ttl_seconds,
            lock_ttl: config.lock_ttl_seconds,
        })
    }

    /// Get the connection manager for direct Redis operations.
    pub fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json)
                    .map_err(|e| AppError::cache(format!("Cache deserialization error: {}", e)))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with default TTL.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Set a value in cache with custom TTL (in seconds).
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::cache(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    /// Delete a value from cache.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await.map_err(cache_error)?;
        Ok(exists)
    }

    // =========================================================================
    // Object Lock Markers
    // =========================================================================

    /// Set the advisory lock marker for a record. The marker expires on
    /// its own if the owning process dies mid-update.
    pub async fn set_object_lock(&self, factory: &str, id: i64) -> AppResult<()> {
        let key = object_lock_key(factory, id);
        let token = Uuid::new_v4().to_string();
        let mut conn = self.connection.clone();

        conn.set_ex::<_, _, ()>(&key, token, self.lock_ttl)
            .await
            .map_err(cache_error)?;

        tracing::debug!(factory = %factory, id, "Object lock marker set");
        Ok(())
    }

    /// Remove the advisory lock marker for a record.
    pub async fn remove_object_lock(&self, factory: &str, id: i64) -> AppResult<()> {
        let key = object_lock_key(factory, id);
        let mut conn = self.connection.clone();
        let _: () = conn.del(&key).await.map_err(cache_error)?;

        tracing::debug!(factory = %factory, id, "Object lock marker removed");
        Ok(())
    }

    /// Check whether a record currently carries a lock marker.
    pub async fn is_object_locked(&self, factory: &str, id: i64) -> AppResult<bool> {
        self.exists(&object_lock_key(factory, id)).await
    }
}

fn object_lock_key(factory: &str, id: i64) -> String {
    format!("{}{}:{}", CACHE_PREFIX_LOCK, factory, id)
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::cache(format!("Cache error: {}", e))
}

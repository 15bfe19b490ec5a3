//! Redis-backed user snapshot cache.
//!
//! Snapshots are JSON documents under namespaced keys with a bounded TTL.
//! The TTL carries a small random jitter so entries written together do
//! not expire together.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::domain::ports::{CacheError, UserCache};
use crate::domain::user::User;

/// Default snapshot lifetime.
pub const DEFAULT_USER_TTL: Duration = Duration::from_secs(5 * 60);

fn cache_key(id: i64) -> String {
    format!("user-{id}")
}

/// User cache adapter over a pooled Redis backend.
pub struct RedisUserCache {
    pool: Pool<RedisConnectionManager>,
    ttl: Duration,
    rng: Mutex<SmallRng>,
}

impl RedisUserCache {
    /// Create a cache over an existing pool with the given base TTL.
    pub fn new(pool: Pool<RedisConnectionManager>, ttl: Duration) -> Self {
        Self {
            pool,
            ttl,
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Build a connection pool for `redis_url` and wrap it with the
    /// default TTL.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| CacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;

        Ok(Self::new(pool, DEFAULT_USER_TTL))
    }

    /// Base TTL plus up to 10% jitter, in whole seconds.
    fn ttl_with_jitter(&self) -> u64 {
        let base = self.ttl.as_secs();
        let spread = base / 10;
        if spread == 0 {
            return base;
        }
        let jitter = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .gen_range(0..=spread);
        base + jitter
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, id: i64) -> Result<Option<User>, CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;

        let payload: Option<String> = conn
            .get(cache_key(id))
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;

        match payload {
            Some(json) => {
                let user = serde_json::from_str(&json)
                    .map_err(|err| CacheError::encoding(err.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, user: &User) -> Result<(), CacheError> {
        let payload =
            serde_json::to_string(user).map_err(|err| CacheError::encoding(err.to_string()))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;

        let () = conn
            .set_ex(cache_key(user.id), payload, self.ttl_with_jitter())
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;

        Ok(())
    }
}

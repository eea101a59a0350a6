//! Redis cache backend
//!
//! Uses a multiplexed connection manager: cloning it is cheap and every
//! clone shares one reconnecting connection.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{CacheBackend, CacheResult};

pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect to `address` (`host:port` or a full `redis://` URL).
    pub async fn connect(address: &str) -> CacheResult<Self> {
        let client = redis::Client::open(redis_url(address))?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }
}

fn redis_url(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("redis://{address}")
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn set(&self, key: &str, value: String) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }
}

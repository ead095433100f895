use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::Account;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Read-through cache of active accounts keyed by `account_id`.
#[async_trait]
pub trait AccountCache: Send + Sync {
    async fn get(&self, account_id: i64) -> Result<Option<Account>, CacheError>;
    async fn set(&self, account: &Account) -> Result<(), CacheError>;
    async fn invalidate(&self, account_id: i64) -> Result<(), CacheError>;
}

pub struct RedisAccountCache {
    conn: Arc<Mutex<MultiplexedConnection>>,
    ttl_seconds: u64,
    key_prefix: String,
}

impl RedisAccountCache {
    pub async fn new(
        redis_url: &str,
        ttl_seconds: u64,
        key_prefix: String,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            ttl_seconds,
            key_prefix,
        })
    }

    fn key(&self, account_id: i64) -> String {
        account_key(&self.key_prefix, account_id)
    }
}

fn account_key(prefix: &str, account_id: i64) -> String {
    format!("{}:account:{}", prefix, account_id)
}

#[async_trait]
impl AccountCache for RedisAccountCache {
    async fn get(&self, account_id: i64) -> Result<Option<Account>, CacheError> {
        let mut conn = self.conn.lock().await;
        let value: Option<String> = conn.get(self.key(account_id)).await?;
        let Some(value) = value else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&value)?))
    }

    async fn set(&self, account: &Account) -> Result<(), CacheError> {
        let value = serde_json::to_string(account)?;
        let mut conn = self.conn.lock().await;
        conn.set_ex::<_, _, ()>(self.key(account.account_id), value, self.ttl_seconds)
            .await?;
        Ok(())
    }

    async fn invalidate(&self, account_id: i64) -> Result<(), CacheError> {
        let mut conn = self.conn.lock().await;
        let _: () = conn.del(self.key(account_id)).await?;
        Ok(())
    }
}

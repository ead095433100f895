use anyhow::Context as _;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

use crate::{
    context::Context,
    service::{
        accounts::{AccountsService, AccountsServiceImpl},
        cache::{AccountCache, RedisAccountCache},
        config::ConfigService,
        security::Argon2HashingService,
    },
};

pub trait DatabaseClient: Send + Sync {
    fn conn(&self) -> &DatabaseConnection;
}

pub struct SeaOrmDatabaseClient {
    conn: DatabaseConnection,
}

impl SeaOrmDatabaseClient {
    pub async fn connect(config: &crate::config::Config) -> anyhow::Result<Self> {
        let conn = crate::db::connect(config)
            .await
            .context("database connection failed")?;
        crate::schema::apply(&conn)
            .await
            .context("schema apply failed")?;
        Ok(Self { conn })
    }

    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

impl DatabaseClient for SeaOrmDatabaseClient {
    fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

pub struct AppState {
    db: Arc<dyn DatabaseClient>,
    cache: Option<Arc<dyn AccountCache>>,
    accounts: Arc<dyn AccountsService>,
    config: Arc<dyn ConfigService>,
}

impl AppState {
    pub async fn new(config: Arc<dyn ConfigService>) -> anyhow::Result<Arc<Self>> {
        let values = config.values();
        let db = Arc::new(SeaOrmDatabaseClient::connect(values).await?);

        let cache = match values.redis_url.as_deref() {
            Some(redis_url) => {
                let cache = RedisAccountCache::new(
                    redis_url,
                    values.account_cache_ttl_seconds,
                    values.cache_key_prefix.clone(),
                )
                .await
                .context("redis connection failed")?;
                info!(ttl_seconds = values.account_cache_ttl_seconds, "account cache enabled");
                Some(Arc::new(cache) as Arc<dyn AccountCache>)
            }
            None => {
                info!("REDIS_URL not set, account cache disabled");
                None
            }
        };

        let accounts = Arc::new(AccountsServiceImpl::new(Arc::new(
            Argon2HashingService::new(),
        )));

        Ok(Self::from_parts(db, cache, accounts, config))
    }

    pub fn from_parts(
        db: Arc<dyn DatabaseClient>,
        cache: Option<Arc<dyn AccountCache>>,
        accounts: Arc<dyn AccountsService>,
        config: Arc<dyn ConfigService>,
    ) -> Arc<Self> {
        Arc::new(Self {
            db,
            cache,
            accounts,
            config,
        })
    }

    /// A fresh per-request context over the shared pool.
    pub fn context(&self) -> Context {
        Context::new(self.db.conn().clone()).with_cache(self.cache.clone())
    }

    pub fn db(&self) -> &dyn DatabaseClient {
        self.db.as_ref()
    }

    pub fn accounts(&self) -> &dyn AccountsService {
        self.accounts.as_ref()
    }

    pub fn config(&self) -> &dyn ConfigService {
        self.config.as_ref()
    }
}

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use std::sync::Arc;

use crate::service::cache::AccountCache;

/// Per-operation handle to the database pool and the optional account cache.
///
/// Handlers build one per request and pass it into every use case call.
/// A transaction opened here is owned by the caller; dropping it without
/// `commit` rolls it back, including when the request future is cancelled.
#[derive(Clone)]
pub struct Context {
    db: DatabaseConnection,
    cache: Option<Arc<dyn AccountCache>>,
}

impl Context {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, cache: None }
    }

    pub fn with_cache(mut self, cache: Option<Arc<dyn AccountCache>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn cache(&self) -> Option<&dyn AccountCache> {
        self.cache.as_deref()
    }

    pub async fn transaction(&self) -> Result<DatabaseTransaction, DbErr> {
        self.db.begin().await
    }
}

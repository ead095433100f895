use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

use crate::config::Config;

/// Replaces the password of a connection URL with `***` for logging.
pub fn redact_db_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    let Some((userinfo, host)) = authority.rsplit_once('@') else {
        return url.to_string();
    };

    let user = match userinfo.split_once(':') {
        Some((user, _)) => format!("{user}:***"),
        None => userinfo.to_string(),
    };
    format!("{scheme}://{user}@{host}{path}")
}

/// Opens the shared connection pool. Every request borrows from this pool.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        url = %redact_db_url(&config.database_url),
        min_connections = config.db_min_connections,
        max_connections = config.db_max_connections,
        "connecting to database"
    );

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .min_connections(config.db_min_connections)
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_seconds))
        .sqlx_logging(false);

    Database::connect(options).await
}

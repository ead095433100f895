use std::{env, sync::Arc};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

pub trait ConfigService: Send + Sync {
    fn port(&self) -> u16;
    fn values(&self) -> &Config;
}

pub struct ConfigServiceImpl {
    config: Arc<Config>,
}

impl ConfigServiceImpl {
    fn strip_wrapping_quotes(value: &str) -> &str {
        if value.len() >= 2 {
            let bytes = value.as_bytes();
            let first = bytes[0];
            let last = bytes[value.len() - 1];
            if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
                return &value[1..value.len() - 1];
            }
        }
        value
    }

    fn normalize(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = Self::strip_wrapping_quotes(trimmed).trim();
        if normalized.is_empty() {
            None
        } else {
            Some(normalized.to_string())
        }
    }

    fn env_nonempty(key: &str) -> Option<String> {
        env::var(key).ok().and_then(|value| Self::normalize(&value))
    }

    fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
        Self::env_nonempty(key).and_then(|value| value.parse::<T>().ok())
    }

    fn env_bool(key: &str, default: bool) -> bool {
        Self::env_nonempty(key)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(default)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            Self::env_nonempty("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self::new(Config {
            port: Self::env_parse("PORT").unwrap_or(3333),
            database_url,
            db_min_connections: Self::env_parse("DB_MIN_CONNECTIONS").unwrap_or(1),
            db_max_connections: Self::env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            db_acquire_timeout_seconds: Self::env_parse("DB_ACQUIRE_TIMEOUT_SECONDS")
                .unwrap_or(10),
            redis_url: Self::env_nonempty("REDIS_URL"),
            account_cache_ttl_seconds: Self::env_parse("ACCOUNT_CACHE_TTL_SECONDS")
                .unwrap_or(300),
            cache_key_prefix: Self::env_nonempty("CACHE_KEY_PREFIX")
                .unwrap_or_else(|| "accounts-api".to_string()),
            log_level: Self::env_nonempty("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: Self::env_bool("LOG_JSON", false),
        }))
    }

    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl ConfigService for ConfigServiceImpl {
    fn port(&self) -> u16 {
        self.config.port
    }

    fn values(&self) -> &Config {
        &self.config
    }
}

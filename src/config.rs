#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_min_connections: u32,
    pub db_max_connections: u32,
    pub db_acquire_timeout_seconds: u64,

    // The account cache is optional. Without REDIS_URL every read goes to the database.
    pub redis_url: Option<String>,
    pub account_cache_ttl_seconds: u64,
    pub cache_key_prefix: String,

    pub log_level: String,
    pub log_json: bool,
}

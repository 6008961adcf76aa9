// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

use crate::http::cache::{CachePolicy, CacheVisibility};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads, defaults to the number of CPU cores
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// `combined`, `common`, `json` or a custom `$variable` pattern
    pub access_log_format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

/// Connection handling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound on a connection's lifetime, in seconds
    pub connection_timeout: u64,
    pub max_connections: Option<u32>,
}

/// Response header configuration for served assets
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub cache_control: CacheVisibility,
    /// `max-age` in seconds for public/private caching
    pub cache_max_age: u32,
}

impl HttpConfig {
    pub const fn cache_policy(&self) -> CachePolicy {
        CachePolicy::new(self.cache_control, self.cache_max_age)
    }
}

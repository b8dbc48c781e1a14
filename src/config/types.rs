// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Where assets live and how they are served
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    /// Directory path, or a `bundle:subdir` asset spec
    pub root: String,
    /// Base directory for `bundle:` specs
    #[serde(default)]
    pub bundle_dir: Option<String>,
    /// File served when a directory is requested
    pub index: String,
    /// Seconds for Expires/Cache-Control; 0 disables both
    pub cache_max_age: u64,
    /// Streaming chunk size in bytes
    pub chunk_size: usize,
    /// Prefix stripped from the request path before traversal
    #[serde(default)]
    pub route_prefix: Option<String>,
    /// Capacity of the path resolution memo
    pub path_cache_capacity: usize,
}

// Configuration module entry point
// Loads config.toml, environment overrides, and coded defaults

mod types;

use std::net::SocketAddr;

// Re-export public types
pub use types::{AssetsConfig, Config, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from "config.toml" in the working directory,
    /// falling back to defaults when the file is absent.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("assets.root", "static")?
            .set_default("assets.index", "index.html")?
            .set_default("assets.cache_max_age", 3600)?
            .set_default("assets.chunk_size", 65536)? // 64 KiB
            .set_default("assets.path_cache_capacity", 1000)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.assets.index, "index.html");
        assert_eq!(cfg.assets.cache_max_age, 3600);
        assert_eq!(cfg.assets.chunk_size, 65536);
        assert_eq!(cfg.assets.path_cache_capacity, 1000);
        assert!(cfg.assets.route_prefix.is_none());
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(cfg.socket_addr().unwrap().port(), 8080);
    }
}
